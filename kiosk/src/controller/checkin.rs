use chrono::Datelike;
use log::{info, warn};
use shared::ApiRequest;

use super::KioskController;
use crate::domain::{apply_local_checkin, record_from_new_checkin, CheckinOutcome, LocalCheckin};
use crate::error::{KioskError, KioskResult};
use crate::tasks::{CompletionEvent, TaskScope};

impl KioskController {
    /// Check a card in. Known cards are answered from the cache and saved in
    /// the background; unknown cards wait for the backend.
    pub async fn check_in(&mut self, raw_id: &str) -> KioskResult<CheckinOutcome> {
        let id = raw_id.trim();
        if id.is_empty() {
            return Err(KioskError::EmptyId);
        }

        let today = self.today();
        let bonus = self.settings.checkin_bonus;

        match apply_local_checkin(&mut self.state.roster, id, today, bonus) {
            LocalCheckin::AlreadyCheckedIn(record) => {
                info!("🔁 {} already checked in today", record.name);
                Ok(CheckinOutcome::AlreadyCheckedIn {
                    name: record.name,
                    points: record.points,
                })
            }
            LocalCheckin::Applied { record, snapshot } => {
                info!("✅ Checked in {} ({} pt)", record.name, record.points);
                self.state.history.invalidate(id, today.year());

                let api = self.api.clone();
                let request = ApiRequest::Checkin {
                    id: id.to_string(),
                    row: record.row,
                };
                let student_id = id.to_string();
                self.tasks.spawn(TaskScope::Persistent, async move {
                    let response = api.call(request, false).await;
                    CompletionEvent::CheckinSaved {
                        id: student_id,
                        snapshot,
                        response,
                    }
                });

                Ok(CheckinOutcome::CheckedIn {
                    name: record.name,
                    points: record.points,
                })
            }
            LocalCheckin::Unknown => self.check_in_unknown(id).await,
        }
    }

    async fn check_in_unknown(&mut self, id: &str) -> KioskResult<CheckinOutcome> {
        let request = ApiRequest::Checkin {
            id: id.to_string(),
            row: None,
        };
        let response = self.api.call(request, true).await;

        if !response.success {
            let error = self.fail(&response);
            if error == KioskError::NotConfigured {
                return Err(error);
            }
            warn!("❓ Card {} is not registered", id);
            let message = if response.is_rejected() {
                response.message.clone()
            } else {
                None
            };
            return Ok(CheckinOutcome::Unregistered {
                id: id.to_string(),
                message,
            });
        }

        let today = self.today();
        let name = response.name().unwrap_or_else(|| id.to_string());
        let points = response.point().unwrap_or(0);
        self.state
            .roster
            .insert(record_from_new_checkin(id, &name, points, today));
        info!("🆕 Checked in uncached card {} as {}", id, name);

        self.spawn_refresh();
        Ok(CheckinOutcome::NewCheckIn { name, points })
    }
}
