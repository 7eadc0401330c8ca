use log::warn;

use super::KioskController;
use crate::domain::{build_schedule_board, form_fields, ScheduleBoard};
use crate::error::{KioskError, KioskResult};
use crate::state::Screen;
use crate::ui::{Notice, Update};

impl KioskController {
    /// Staff screens need admin mode; settings stay open while no backend is configured
    pub fn can_show(&self, screen: Screen) -> bool {
        !screen.requires_admin()
            || self.state.admin
            || (screen == Screen::Settings && !self.api.is_configured())
    }

    pub async fn show_screen(&mut self, screen: Screen) -> KioskResult<Vec<Update>> {
        if !self.can_show(screen) {
            warn!("🔒 {} requires admin mode", screen.name());
            if self.state.screen != Screen::CheckIn {
                self.switch_to(Screen::CheckIn);
            }
            return Err(KioskError::AdminRequired);
        }

        self.switch_to(screen);
        let mut updates = vec![Update::Screen(screen)];

        match screen {
            Screen::Schedule => updates.push(Update::Schedule(self.schedule_board())),
            Screen::Register => {
                if let Err(e) = self.ensure_schema().await {
                    updates.push(Notice::from(&e).into());
                }
                updates.push(Update::RegisterForm(self.register_form()));
            }
            _ => {}
        }
        Ok(updates)
    }

    /// Change screens: aborts view-scoped work and clears per-screen drafts
    pub(super) fn switch_to(&mut self, screen: Screen) -> u64 {
        self.tasks.cancel_view_tasks();
        self.history_requests.clear();
        self.state.enter_screen(screen)
    }

    pub fn schedule_board(&self) -> ScheduleBoard {
        build_schedule_board(&self.state.roster, self.today())
    }

    /// Registration fields paired with what has been entered so far
    pub fn register_form(&self) -> Vec<(String, String)> {
        form_fields(&self.state.schema_headers)
            .into_iter()
            .map(|field| {
                let value = self.state.register.get(&field).unwrap_or_default().to_string();
                (field, value)
            })
            .collect()
    }
}
