//! # Core Application State
//!
//! Everything the kiosk knows at runtime, owned by the controller and
//! handed to handlers by reference.
//!
//! ## Responsibilities:
//! - Roster cache and attendance history cache
//! - Visible screen and its generation counter
//! - Admin mode and focus state
//! - Per-screen drafts (registration form, card swap, result list)
//!
//! Drafts belong to the screen they were typed on: every screen change
//! clears them and bumps the generation so late replies meant for the old
//! screen can be recognized and dropped.

use log::info;
use shared::StudentRecord;

use super::calendar_state::{CalendarState, HistoryCache};
use super::focus::FocusGuard;
use super::forms::{CardSwapDraft, RegisterDraft};
use super::roster_cache::RosterCache;
use super::screen::Screen;

#[derive(Debug)]
pub struct KioskState {
    pub roster: RosterCache,
    pub history: HistoryCache,

    pub screen: Screen,
    /// Bumped on every screen change
    pub generation: u64,

    pub admin: bool,
    pub focus: FocusGuard,

    /// Sheet headers from `getSchema`, empty until fetched
    pub schema_headers: Vec<String>,

    pub calendar: Option<CalendarState>,
    pub register: RegisterDraft,
    pub card_swap: CardSwapDraft,
    /// Students listed on the current screen
    pub results: Vec<StudentRecord>,
    /// Student picked by a reader lookup on the search and point screens
    pub selected: Option<String>,
}

impl KioskState {
    pub fn new(admin: bool) -> Self {
        Self {
            roster: RosterCache::new(),
            history: HistoryCache::default(),
            screen: Screen::CheckIn,
            generation: 0,
            admin,
            focus: FocusGuard::default(),
            schema_headers: Vec::new(),
            calendar: None,
            register: RegisterDraft::default(),
            card_swap: CardSwapDraft::default(),
            results: Vec::new(),
            selected: None,
        }
    }

    /// Switch screens, clearing per-screen drafts. Returns the new generation.
    pub fn enter_screen(&mut self, screen: Screen) -> u64 {
        self.screen = screen;
        self.generation += 1;
        self.calendar = None;
        self.register.clear();
        self.card_swap.clear();
        self.results.clear();
        self.selected = None;
        self.focus.release();
        info!("🖥️ Showing {} (generation {})", screen.name(), self.generation);
        self.generation
    }
}
