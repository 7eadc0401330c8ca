use log::debug;

use super::KioskController;
use crate::cli::Command;
use crate::domain::ID_HEADER;
use crate::error::{KioskError, KioskResult};
use crate::router::{route, RouteContext, ScanAction};
use crate::state::{FieldFocus, Screen};
use crate::ui::{Notice, Update};

fn report<T>(result: KioskResult<T>, present: impl FnOnce(T) -> Vec<Update>) -> Vec<Update> {
    match result {
        Ok(value) => present(value),
        Err(e) => vec![Notice::from(&e).into()],
    }
}

impl KioskController {
    /// Handle one line from the reader (or typed into a focused field)
    pub async fn handle_scan(&mut self, raw: &str) -> Vec<Update> {
        let context = RouteContext {
            screen: self.state.screen,
            focus: self.state.focus.focused(),
            card_target_selected: self.state.card_swap.target.is_some(),
            loading: self.is_loading(),
        };
        let action = route(context, raw);
        debug!("📡 {:?} on {}", action, self.state.screen.name());

        match action {
            ScanAction::CheckIn(id) => {
                let result = self.check_in(&id).await;
                report(result, |outcome| vec![Notice::from(&outcome).into()])
            }
            ScanAction::FillRegisterId(id) => {
                self.state.register.set(ID_HEADER, &id);
                vec![Update::RegisterForm(self.register_form())]
            }
            ScanAction::SelectCardTarget(id) => {
                let result = self.select_card_target(&id);
                report(result, |record| {
                    vec![Notice::info(record.name, "새 카드를 태그하세요.").into()]
                })
            }
            ScanAction::FillReplacementCard(id) => {
                let result = self.fill_replacement_card(&id);
                let name = self
                    .state
                    .card_swap
                    .target
                    .as_deref()
                    .map(|target| self.student_name(target))
                    .unwrap_or_default();
                report(result, |_| {
                    vec![Notice::info(
                        name.clone(),
                        format!("{} 학생의 카드를 {}(으)로 교체하려면 /confirm", name, id),
                    )
                    .into()]
                })
            }
            ScanAction::Lookup(id) => {
                let result = self.lookup_card(&id);
                report(result, |record| vec![Update::Results(vec![record])])
            }
            ScanAction::FieldInput { field, value } => {
                self.state.focus.release();
                self.fill_focused_field(field, &value)
            }
            ScanAction::Suspended => vec![Notice::busy().into()],
            ScanAction::Ignore => Vec::new(),
        }
    }

    fn fill_focused_field(&mut self, field: FieldFocus, value: &str) -> Vec<Update> {
        match field {
            FieldFocus::RegisterField(name) => {
                let result = self.set_register_field(&name, value);
                report(result, |_| vec![Update::RegisterForm(self.register_form())])
            }
            FieldFocus::PointAmount(id) => {
                let result = self.award_points(&id, value);
                report(result, |outcome| vec![Notice::from(&outcome).into()])
            }
        }
    }

    /// Give the next input line to a form field instead of the reader
    pub fn focus_field(&mut self, name: &str) -> KioskResult<FieldFocus> {
        let field = if name.eq_ignore_ascii_case("point") {
            FieldFocus::PointAmount(self.selected_student()?)
        } else if self.state.screen == Screen::Register {
            let name = name.trim();
            let is_form_field = self.register_form().iter().any(|(f, _)| f == name);
            if !is_form_field {
                return Err(KioskError::UnknownField(name.to_string()));
            }
            FieldFocus::RegisterField(name.to_string())
        } else {
            return Err(KioskError::UnknownField(name.to_string()));
        };

        self.state.focus.focus(field.clone());
        Ok(field)
    }

    /// Run a staff command. Status, help and quit are handled by the caller.
    pub async fn execute(&mut self, command: Command) -> Vec<Update> {
        match command {
            Command::Page(screen) => {
                let result = self.show_screen(screen).await;
                report(result, |updates| updates)
            }
            Command::Search(query) => vec![Update::Results(self.search(&query))],
            Command::RemoteSearch(query) => {
                let result = self.search_remote(&query);
                report(result, |_| {
                    vec![Notice::info("검색", format!("'{}' 검색 중...", query)).into()]
                })
            }
            Command::Calendar(id) => {
                let result = self.open_calendar(&id);
                report(result, |update| vec![update])
            }
            Command::PreviousMonth => self.change_month(-1).into_iter().collect(),
            Command::NextMonth => self.change_month(1).into_iter().collect(),
            Command::CheckIn(id) => {
                let result = self.check_in(&id).await;
                report(result, |outcome| vec![Notice::from(&outcome).into()])
            }
            Command::Award { id, amount } => {
                let result = match id {
                    Some(id) => self.award_points(&id, &amount),
                    None => self.award_to_selected(&amount),
                };
                report(result, |outcome| vec![Notice::from(&outcome).into()])
            }
            Command::Preset(index) => {
                let result = self.award_preset(index);
                report(result, |outcome| vec![Notice::from(&outcome).into()])
            }
            Command::Focus(name) => {
                let result = self.focus_field(&name);
                report(result, |field| {
                    let label = match field {
                        FieldFocus::RegisterField(name) => name,
                        FieldFocus::PointAmount(_) => "포인트".to_string(),
                    };
                    vec![Notice::info("입력", format!("{} 값을 입력하세요.", label)).into()]
                })
            }
            Command::Set { field, value } => {
                let result = self.set_register_field(&field, &value);
                report(result, |_| vec![Update::RegisterForm(self.register_form())])
            }
            Command::Submit => {
                let result = self.register_student().await;
                report(result, |name| {
                    vec![
                        Notice::success(name, "등록 완료!").into(),
                        Update::Screen(Screen::CheckIn),
                    ]
                })
            }
            Command::Confirm => {
                let result = self.confirm_card_swap().await;
                report(result, |plan| {
                    vec![Notice::from(&plan).into(), Update::Screen(Screen::CheckIn)]
                })
            }
            Command::Admin(password) => {
                let result = self.enable_admin(&password).await;
                report(result, |_| {
                    vec![Notice::success("관리자", "관리자 모드 활성화").into()]
                })
            }
            Command::AdminOff => {
                self.disable_admin();
                vec![
                    Notice::info("관리자", "관리자 모드를 종료했습니다.").into(),
                    Update::Screen(Screen::CheckIn),
                ]
            }
            Command::Url(url) => {
                let result = self.save_backend_url(&url).await;
                report(result, |count| {
                    vec![
                        Notice::success("연결 성공!", format!("학생 {}명", count)).into(),
                        Update::Screen(Screen::CheckIn),
                    ]
                })
            }
            Command::Refresh => {
                let result = self.refresh().await;
                report(result, |count| {
                    vec![Notice::info("새로고침", format!("학생 {}명", count)).into()]
                })
            }
            Command::InitSheet => {
                let result = self.init_sheet().await;
                report(result, |count| {
                    vec![Notice::success("시트 초기화", format!("학생 {}명", count)).into()]
                })
            }
            Command::Status | Command::Help | Command::Quit => Vec::new(),
        }
    }
}
