//! # Controller Module
//!
//! `KioskController` owns the kiosk state and is the only thing that mutates
//! it. Input handlers run on the controller's task; background work reports
//! back through the completion channel returned by [`KioskController::new`]
//! and is applied with `apply_completion`.
//!
//! ## Submodules:
//! - **navigation**: screen changes, admin gating, view task cancellation
//! - **checkin** / **points**: optimistic writes with write-behind saves
//! - **roster**: refresh, schema, local and remote search
//! - **calendar**: per-student attendance calendar
//! - **admin**: admin mode, backend URL, sheet initialization
//! - **registration** / **card_swap**: staff forms
//! - **input**: reader lines and staff commands
//! - **completions**: applying background results

mod admin;
mod calendar;
mod card_swap;
mod checkin;
mod completions;
mod input;
mod navigation;
mod points;
mod registration;
mod roster;

#[cfg(test)]
mod tests;

use chrono::NaiveDate;
use log::{info, warn};
use shared::ApiResponse;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{KioskError, KioskResult};
use crate::services::{ApiClient, Clock, LoadingFlag};
use crate::settings::{KioskSettings, SettingsStore};
use crate::state::{KioskState, Screen};
use crate::tasks::{Completion, TaskTracker};
use crate::ui::StatusLine;

pub struct KioskController {
    state: KioskState,
    api: ApiClient,
    clock: Arc<dyn Clock>,
    settings: KioskSettings,
    store: Option<SettingsStore>,
    tasks: TaskTracker,
    /// (student, year) history fetches in flight
    history_requests: HashSet<(String, i32)>,
}

impl KioskController {
    pub fn new(
        mut api: ApiClient,
        clock: Arc<dyn Clock>,
        settings: KioskSettings,
        store: Option<SettingsStore>,
    ) -> (Self, UnboundedReceiver<Completion>) {
        let (tasks, completions) = TaskTracker::new();
        api.set_endpoint(settings.backend_url().map(str::to_string));

        let controller = Self {
            state: KioskState::new(settings.admin_mode),
            api,
            clock,
            settings,
            store,
            tasks,
            history_requests: HashSet::new(),
        };
        (controller, completions)
    }

    /// Load the sheet headers and the roster. Without a backend URL the
    /// kiosk opens on the settings screen instead.
    pub async fn start(&mut self) -> KioskResult<usize> {
        if !self.api.is_configured() {
            return Err(self.fail(&ApiResponse::not_configured()));
        }

        info!("🚀 Starting kiosk against {}", self.api.endpoint().unwrap_or("-"));
        if let Err(e) = self.ensure_schema().await {
            warn!("Schema not loaded at startup: {}", e);
        }
        self.refresh().await
    }

    pub fn state(&self) -> &KioskState {
        &self.state
    }

    pub fn settings(&self) -> &KioskSettings {
        &self.settings
    }

    pub fn is_loading(&self) -> bool {
        self.api.loading().is_loading()
    }

    /// Handle on the loading flag for readers running beside a blocking call
    pub fn loading_flag(&self) -> LoadingFlag {
        self.api.loading().clone()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn status_line(&self) -> StatusLine<'_> {
        StatusLine {
            screen: self.state.screen,
            admin: self.state.admin,
            indicator: self.state.focus.indicator(self.is_loading()),
            students: self.state.roster.len(),
            pending_tasks: self.tasks.pending(),
            backend: self.api.endpoint(),
        }
    }

    fn persist_settings(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.settings) {
            warn!("Failed to persist settings: {:#}", e);
        }
    }

    /// Turn a failed blocking call into an error; a missing backend URL
    /// also sends the kiosk to the settings screen
    fn fail(&mut self, response: &ApiResponse) -> KioskError {
        let error = KioskError::from_response(response);
        if error == KioskError::NotConfigured && self.state.screen != Screen::Settings {
            warn!("⚙️ No backend URL, showing settings");
            self.switch_to(Screen::Settings);
        }
        error
    }
}
