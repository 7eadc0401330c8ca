use log::{debug, info, warn};
use shared::{ApiResponse, CONNECTION_ERROR_MESSAGE};

use super::KioskController;
use crate::domain::{reconcile_award, rollback_award, rollback_checkin, AwardSnapshot, CheckinSnapshot};
use crate::error::KioskError;
use crate::settings::ReconcilePolicy;
use crate::state::Screen;
use crate::tasks::{Completion, CompletionEvent, TaskScope};
use crate::ui::{Notice, Update};

impl KioskController {
    /// Apply the result of a background task. View results from an earlier
    /// screen are dropped.
    pub fn apply_completion(&mut self, completion: Completion) -> Option<Update> {
        self.tasks.finish(completion.task_id);

        if let TaskScope::View(generation) = completion.scope {
            if generation != self.state.generation {
                debug!(
                    "Dropping stale completion {} (generation {} != {})",
                    completion.task_id, generation, self.state.generation
                );
                return None;
            }
        }

        match completion.event {
            CompletionEvent::CheckinSaved {
                id,
                snapshot,
                response,
            } => self.on_checkin_saved(&id, &snapshot, &response),
            CompletionEvent::PointsSaved {
                id,
                snapshot,
                response,
            } => self.on_points_saved(&id, &snapshot, &response),
            CompletionEvent::RosterRefreshed { response } => self.on_roster_refreshed(&response),
            CompletionEvent::HistoryLoaded {
                student_id,
                year,
                response,
            } => self.on_history_loaded(student_id, year, &response),
            CompletionEvent::RemoteSearch { query, response } => {
                self.on_remote_search(&query, &response)
            }
        }
    }

    /// Only a confirmed rejection undoes an optimistic change
    fn should_roll_back(&self, response: &ApiResponse) -> bool {
        self.settings.reconcile_policy == ReconcilePolicy::RollbackOnRejection
            && response.is_rejected()
    }

    fn on_checkin_saved(
        &mut self,
        id: &str,
        snapshot: &CheckinSnapshot,
        response: &ApiResponse,
    ) -> Option<Update> {
        if response.success {
            debug!("Check-in for {} saved", id);
            return None;
        }

        if self.should_roll_back(response) && rollback_checkin(&mut self.state.roster, id, snapshot) {
            info!("↩️ Rolled back check-in for {}", id);
        } else {
            warn!("Check-in for {} not confirmed, keeping local value", id);
        }

        let detail = response.message_or(CONNECTION_ERROR_MESSAGE);
        Some(Notice::save_failed(&self.student_name(id), &detail).into())
    }

    fn on_points_saved(
        &mut self,
        id: &str,
        snapshot: &AwardSnapshot,
        response: &ApiResponse,
    ) -> Option<Update> {
        if response.success {
            if let Some(total) = response.new_total() {
                if reconcile_award(&mut self.state.roster, id, snapshot, total) {
                    debug!("Balance of {} set to server total {}", id, total);
                    for shown in self.state.results.iter_mut().filter(|s| s.id == id) {
                        shown.points = total;
                    }
                }
            }
            return None;
        }

        if self.should_roll_back(response) && rollback_award(&mut self.state.roster, id, snapshot) {
            info!("↩️ Rolled back +{} for {}", snapshot.amount, id);
            for shown in self.state.results.iter_mut().filter(|s| s.id == id) {
                shown.points = snapshot.previous;
            }
        } else {
            warn!("Award for {} not confirmed, keeping local value", id);
        }

        let detail = response.message_or(CONNECTION_ERROR_MESSAGE);
        Some(Notice::save_failed(&self.student_name(id), &detail).into())
    }

    fn on_roster_refreshed(&mut self, response: &ApiResponse) -> Option<Update> {
        match self.apply_roster(response) {
            Ok(_) if self.state.screen == Screen::Schedule => {
                Some(Update::Schedule(self.schedule_board()))
            }
            Ok(_) => None,
            Err(e) => Some(Notice::warning("명단 갱신 실패", e.to_string()).into()),
        }
    }

    fn on_history_loaded(
        &mut self,
        student_id: String,
        year: i32,
        response: &ApiResponse,
    ) -> Option<Update> {
        self.history_requests.remove(&(student_id.clone(), year));

        if response.success {
            let entries = response.history().unwrap_or_default();
            debug!("History for {} in {}: {} entries", student_id, year, entries.len());
            self.state.history.insert(&student_id, year, entries);
        } else if response.is_rejected() {
            warn!("History for {} in {} rejected: {}", student_id, year, response.message_or("-"));
            self.state.history.insert(&student_id, year, Vec::new());
        } else {
            let error = self.fail(response);
            return Some(Notice::from(&error).into());
        }

        let calendar = self.state.calendar.as_ref()?;
        if calendar.student_id != student_id || calendar.year != year {
            return None;
        }
        self.calendar_view().map(Update::Calendar)
    }

    fn on_remote_search(&mut self, query: &str, response: &ApiResponse) -> Option<Update> {
        if !response.success {
            let error = self.fail(response);
            return Some(Notice::from(&error).into());
        }

        match response.search_hits() {
            Ok(mut hits) => {
                hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
                info!("🔎 Remote search '{}': {} hits", query, hits.len());
                self.state.results = hits.clone();
                Some(Update::Results(hits))
            }
            Err(e) => {
                warn!("Failed to decode search results: {}", e);
                let error = KioskError::Backend(CONNECTION_ERROR_MESSAGE.to_string());
                Some(Notice::from(&error).into())
            }
        }
    }
}
