use log::info;
use shared::ApiRequest;

use super::KioskController;
use crate::domain::{apply_local_award, parse_award_amount, PointOutcome};
use crate::error::{KioskError, KioskResult};
use crate::tasks::{CompletionEvent, TaskScope};

impl KioskController {
    /// Award points typed by staff. The amount is validated before anything
    /// changes; the balance moves at once and the write follows in the background.
    pub fn award_points(&mut self, id: &str, amount_text: &str) -> KioskResult<PointOutcome> {
        if !self.state.admin {
            return Err(KioskError::AdminRequired);
        }
        let amount = parse_award_amount(amount_text)?;
        let id = id.trim();
        let (record, snapshot) = apply_local_award(&mut self.state.roster, id, amount)?;

        for shown in self.state.results.iter_mut().filter(|s| s.id == id) {
            shown.points = record.points;
        }
        info!("⭐ +{} for {} ({} pt)", amount, record.name, record.points);

        let api = self.api.clone();
        let request = ApiRequest::UpdatePoint {
            id: id.to_string(),
            row: record.row,
            amount,
        };
        let student_id = id.to_string();
        self.tasks.spawn(TaskScope::Persistent, async move {
            let response = api.call(request, false).await;
            CompletionEvent::PointsSaved {
                id: student_id,
                snapshot,
                response,
            }
        });

        Ok(PointOutcome {
            id: record.id,
            name: record.name,
            amount,
            points: record.points,
        })
    }

    /// Award the n-th preset (1-based) to the student last looked up
    pub fn award_preset(&mut self, index: usize) -> KioskResult<PointOutcome> {
        let id = self.selected_student()?;
        let amount = index
            .checked_sub(1)
            .and_then(|i| self.settings.point_presets.get(i))
            .copied()
            .ok_or_else(|| KioskError::InvalidAmount(format!("#{}", index)))?;
        self.award_points(&id, &amount.to_string())
    }

    pub fn award_to_selected(&mut self, amount_text: &str) -> KioskResult<PointOutcome> {
        let id = self.selected_student()?;
        self.award_points(&id, amount_text)
    }

    pub(super) fn selected_student(&self) -> KioskResult<String> {
        self.state
            .selected
            .clone()
            .ok_or(KioskError::NoStudentSelected)
    }
}
