use log::info;
use shared::{ApiRequest, StudentRecord};

use super::KioskController;
use crate::domain::{plan_card_swap, CardSwapPlan};
use crate::error::{KioskError, KioskResult};
use crate::state::Screen;

impl KioskController {
    /// Pick the student whose card is being replaced
    pub fn select_card_target(&mut self, id: &str) -> KioskResult<StudentRecord> {
        let record = self
            .state
            .roster
            .find_by_card(id)
            .ok_or_else(|| KioskError::UnknownStudent(id.trim().to_string()))?;

        self.state.card_swap.select_target(&record.id);
        self.state.results = vec![record.clone()];
        Ok(record)
    }

    pub fn fill_replacement_card(&mut self, id: &str) -> KioskResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(KioskError::NoReplacementCard);
        }
        if self.state.card_swap.target.is_none() {
            return Err(KioskError::NoCardTarget);
        }
        self.state.card_swap.set_replacement(id);
        Ok(())
    }

    /// Carry out the swap staff confirmed
    pub async fn confirm_card_swap(&mut self) -> KioskResult<CardSwapPlan> {
        if !self.state.admin {
            return Err(KioskError::AdminRequired);
        }

        let plan = plan_card_swap(&self.state.roster, &self.state.card_swap)?;
        let request = ApiRequest::UpdateId {
            old_id: plan.old_id.clone(),
            new_id: plan.new_id.clone(),
            row: plan.row,
        };

        let response = self.api.call(request, true).await;
        if !response.success {
            return Err(self.fail(&response));
        }
        info!("💳 {} now uses card {}", plan.name, plan.new_id);

        self.state.history.forget_student(&plan.old_id);
        self.refresh().await?;
        self.switch_to(Screen::CheckIn);
        Ok(plan)
    }
}
