use shared::ApiRequest;

use super::KioskController;
use crate::domain::{build_calendar_view, CalendarView};
use crate::error::{KioskError, KioskResult};
use crate::state::CalendarState;
use crate::tasks::{CompletionEvent, TaskScope};
use crate::ui::Update;

impl KioskController {
    /// Open a student's calendar on the current month
    pub fn open_calendar(&mut self, id: &str) -> KioskResult<Update> {
        let id = id.trim();
        if !self.state.roster.contains(id) {
            return Err(KioskError::UnknownStudent(id.to_string()));
        }

        let calendar = CalendarState::new(id, self.today());
        self.state.calendar = Some(calendar.clone());
        Ok(self.load_calendar(calendar))
    }

    /// Move the open calendar by `delta` months
    pub fn change_month(&mut self, delta: i32) -> Option<Update> {
        let calendar = self.state.calendar.as_mut()?;
        if delta < 0 {
            calendar.navigate_to_previous_month();
        } else {
            calendar.navigate_to_next_month();
        }
        let calendar = calendar.clone();
        Some(self.load_calendar(calendar))
    }

    /// Calendar for the open month, if that year's history is cached
    pub fn calendar_view(&self) -> Option<CalendarView> {
        let calendar = self.state.calendar.as_ref()?;
        let entries = self
            .state
            .history
            .get(&calendar.student_id, calendar.year)?;

        Some(build_calendar_view(
            &calendar.student_id,
            &self.student_name(&calendar.student_id),
            calendar.year,
            calendar.month,
            entries,
            self.today(),
        ))
    }

    fn load_calendar(&mut self, calendar: CalendarState) -> Update {
        if let Some(view) = self.calendar_view() {
            return Update::Calendar(view);
        }

        let key = (calendar.student_id.clone(), calendar.year);
        if self.history_requests.insert(key) {
            let api = self.api.clone();
            let request = ApiRequest::GetHistory {
                id: calendar.student_id.clone(),
                year: calendar.year,
            };
            let student_id = calendar.student_id.clone();
            let year = calendar.year;
            self.tasks
                .spawn(TaskScope::View(self.state.generation), async move {
                    let mut response = api.call(request, false).await;
                    if response.is_rejected() {
                        // Older sheet scripts only know the long action name
                        let alias = ApiRequest::GetAttendanceHistory {
                            id: student_id.clone(),
                            year,
                        };
                        let retry = api.call(alias, false).await;
                        if retry.success {
                            response = retry;
                        }
                    }
                    CompletionEvent::HistoryLoaded {
                        student_id,
                        year,
                        response,
                    }
                });
        }

        Update::CalendarLoading {
            student_name: self.student_name(&calendar.student_id),
            label: calendar.label(),
        }
    }

    pub(super) fn student_name(&self, id: &str) -> String {
        self.state
            .roster
            .get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
