//! # State Module
//!
//! Runtime state of the kiosk, split by concern:
//! - **app_state**: `KioskState`, the single owner of everything below
//! - **roster_cache**: the card id → student map
//! - **calendar_state**: calendar navigation and the per-year history cache
//! - **screen**: the visible screen
//! - **focus**: reader vs. typed input
//! - **forms**: registration and card swap drafts

pub mod app_state;
pub mod calendar_state;
pub mod focus;
pub mod forms;
pub mod roster_cache;
pub mod screen;

pub use app_state::KioskState;
pub use calendar_state::{CalendarState, HistoryCache};
pub use focus::{FieldFocus, FocusGuard};
pub use forms::{CardSwapDraft, RegisterDraft};
pub use roster_cache::RosterCache;
pub use screen::Screen;
