use chrono::NaiveDate;
use serde_json::json;
use shared::{ApiRequest, ApiResponse, AttendanceMark};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use super::KioskController;
use crate::cli::Command;
use crate::domain::{CheckinOutcome, PointOutcome};
use crate::error::KioskError;
use crate::services::{ApiClient, FixedClock};
use crate::settings::{KioskSettings, ReconcilePolicy, SettingsStore};
use crate::state::Screen;
use crate::tasks::Completion;
use crate::test_utils::{quick_map_response, MockGateway};
use crate::ui::{Tone, Update};

const ENDPOINT: &str = "http://kiosk.test/exec";

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn settings(admin: bool) -> KioskSettings {
    KioskSettings {
        backend_url: Some(ENDPOINT.to_string()),
        admin_mode: admin,
        ..Default::default()
    }
}

fn build(
    gateway: &Arc<MockGateway>,
    settings: KioskSettings,
    store: Option<SettingsStore>,
) -> (KioskController, UnboundedReceiver<Completion>) {
    let api = ApiClient::new(gateway.clone(), None);
    KioskController::new(api, Arc::new(FixedClock(june_first())), settings, store)
}

/// Controller with Kim (A1) and Lee (B2) loaded
async fn loaded(
    gateway: &Arc<MockGateway>,
    admin: bool,
) -> (KioskController, UnboundedReceiver<Completion>) {
    gateway.respond(
        "getQuickMap",
        quick_map_response(&[("A1", "Kim", 0, ""), ("B2", "Lee", 40, "2025-05-30")]),
    );
    let (mut controller, completions) = build(gateway, settings(admin), None);
    assert_eq!(controller.refresh().await, Ok(2));
    (controller, completions)
}

fn notice_tone(updates: &[Update]) -> Option<Tone> {
    updates.iter().find_map(|update| match update {
        Update::Notice(notice) => Some(notice.tone),
        _ => None,
    })
}

#[tokio::test]
async fn test_known_card_checks_in_once_per_day() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.respond("checkin", ApiResponse::ok());

    let outcome = controller.check_in("A1").await.unwrap();
    assert_eq!(
        outcome,
        CheckinOutcome::CheckedIn {
            name: "Kim".to_string(),
            points: 10
        }
    );
    let cached = controller.state().roster.get("A1").unwrap().clone();
    assert_eq!(cached.last_attendance, Some(june_first()));

    let again = controller.check_in("A1").await.unwrap();
    assert_eq!(
        again,
        CheckinOutcome::AlreadyCheckedIn {
            name: "Kim".to_string(),
            points: 10
        }
    );
    assert_eq!(controller.state().roster.get("A1").unwrap(), &cached);

    let completion = completions.recv().await.unwrap();
    assert_eq!(controller.apply_completion(completion), None);
    assert_eq!(controller.pending_tasks(), 0);
    assert_eq!(
        gateway.calls_for("checkin"),
        vec![ApiRequest::Checkin {
            id: "A1".to_string(),
            row: None
        }]
    );
}

#[tokio::test]
async fn test_empty_id_is_rejected_locally() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;

    assert_eq!(controller.check_in("  ").await, Err(KioskError::EmptyId));
    assert!(gateway.calls_for("checkin").is_empty());
}

#[tokio::test]
async fn test_unknown_card_round_trips_once() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;
    gateway.respond(
        "checkin",
        ApiResponse::ok()
            .with_field("name", "Park")
            .with_field("point", 10),
    );

    let outcome = controller.check_in("Z9").await.unwrap();
    assert_eq!(
        outcome,
        CheckinOutcome::NewCheckIn {
            name: "Park".to_string(),
            points: 10
        }
    );
    assert_eq!(gateway.calls_for("checkin").len(), 1);

    let cached = controller.state().roster.get("Z9").unwrap();
    assert_eq!(cached.name, "Park");
    assert!(cached.checked_in_on(june_first()));
    // background refresh scheduled
    assert_eq!(controller.pending_tasks(), 1);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_unknown_card_rejected_is_unregistered() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;
    gateway.respond("checkin", ApiResponse::rejected("미등록 카드"));

    let outcome = controller.check_in("Z9").await.unwrap();
    assert_eq!(
        outcome,
        CheckinOutcome::Unregistered {
            id: "Z9".to_string(),
            message: Some("미등록 카드".to_string())
        }
    );
    assert!(!controller.state().roster.contains("Z9"));
}

#[tokio::test]
async fn test_rejected_checkin_is_rolled_back() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.respond("checkin", ApiResponse::rejected("시트 잠김"));

    controller.check_in("A1").await.unwrap();
    let completion = completions.recv().await.unwrap();
    let update = controller.apply_completion(completion);

    match update {
        Some(Update::Notice(notice)) => {
            assert_eq!(notice.tone, Tone::Warning);
            assert!(notice.message.contains("서버 저장 실패"));
        }
        other => panic!("expected a warning, got {:?}", other),
    }
    let cached = controller.state().roster.get("A1").unwrap();
    assert_eq!(cached.last_attendance, None);
    assert_eq!(cached.points, 0);
}

#[tokio::test]
async fn test_transport_failure_keeps_optimistic_checkin() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    // nothing queued for checkin: the mock answers like an unreachable server

    controller.check_in("A1").await.unwrap();
    let completion = completions.recv().await.unwrap();
    assert!(controller.apply_completion(completion).is_some());

    let cached = controller.state().roster.get("A1").unwrap();
    assert_eq!(cached.last_attendance, Some(june_first()));
    assert_eq!(cached.points, 10);
}

#[tokio::test]
async fn test_keep_optimistic_policy_never_rolls_back() {
    let gateway = MockGateway::new();
    gateway.respond("getQuickMap", quick_map_response(&[("A1", "Kim", 0, "")]));
    let mut settings = settings(false);
    settings.reconcile_policy = ReconcilePolicy::KeepOptimistic;
    let (mut controller, mut completions) = build(&gateway, settings, None);
    controller.refresh().await.unwrap();
    gateway.respond("checkin", ApiResponse::rejected("시트 잠김"));

    controller.check_in("A1").await.unwrap();
    let completion = completions.recv().await.unwrap();
    assert!(controller.apply_completion(completion).is_some());
    assert_eq!(controller.state().roster.get("A1").unwrap().points, 10);
}

#[tokio::test]
async fn test_invalid_amount_makes_no_call() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, true).await;

    assert_eq!(
        controller.award_points("A1", "abc"),
        Err(KioskError::InvalidAmount("abc".to_string()))
    );
    assert_eq!(
        controller.award_points("A1", "-10"),
        Err(KioskError::InvalidAmount("-10".to_string()))
    );
    assert!(gateway.calls_for("updatePoint").is_empty());
    assert_eq!(controller.pending_tasks(), 0);
    assert_eq!(controller.state().roster.get("A1").unwrap().points, 0);
}

#[tokio::test]
async fn test_award_requires_admin() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;

    assert_eq!(
        controller.award_points("A1", "50"),
        Err(KioskError::AdminRequired)
    );
}

#[tokio::test]
async fn test_award_adopts_server_total() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, true).await;
    gateway.respond("updatePoint", ApiResponse::ok().with_field("newTotal", 95));

    let outcome = controller.award_points("B2", "50").unwrap();
    assert_eq!(
        outcome,
        PointOutcome {
            id: "B2".to_string(),
            name: "Lee".to_string(),
            amount: 50,
            points: 90
        }
    );
    assert_eq!(controller.state().roster.get("B2").unwrap().points, 90);

    let completion = completions.recv().await.unwrap();
    assert_eq!(controller.apply_completion(completion), None);
    assert_eq!(controller.state().roster.get("B2").unwrap().points, 95);
    assert_eq!(
        gateway.calls_for("updatePoint"),
        vec![ApiRequest::UpdatePoint {
            id: "B2".to_string(),
            row: None,
            amount: 50
        }]
    );
}

#[tokio::test]
async fn test_rejected_award_is_rolled_back() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, true).await;
    gateway.respond("updatePoint", ApiResponse::rejected("권한 없음"));

    controller.award_points("B2", "50").unwrap();
    let completion = completions.recv().await.unwrap();
    assert!(controller.apply_completion(completion).is_some());
    assert_eq!(controller.state().roster.get("B2").unwrap().points, 40);
}

#[tokio::test]
async fn test_preset_awards_selected_student() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, true).await;

    assert_eq!(
        controller.award_preset(1),
        Err(KioskError::NoStudentSelected)
    );

    controller.show_screen(Screen::Point).await.unwrap();
    controller.handle_scan("B2").await;
    assert_eq!(controller.state().selected.as_deref(), Some("B2"));

    let outcome = controller.award_preset(2).unwrap();
    assert_eq!(outcome.amount, 50);
    assert_eq!(outcome.points, 90);
    assert!(controller.award_preset(9).is_err());
}

#[tokio::test]
async fn test_focused_point_field_takes_next_line() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, true).await;
    controller.show_screen(Screen::Point).await.unwrap();
    controller.handle_scan("A1").await;

    controller
        .execute(Command::Focus("point".to_string()))
        .await;
    assert!(controller.state().focus.is_typing());

    let updates = controller.handle_scan("100").await;
    assert_eq!(notice_tone(&updates), Some(Tone::Success));
    assert!(!controller.state().focus.is_typing());
    assert_eq!(controller.state().roster.get("A1").unwrap().points, 100);
    assert_eq!(controller.state().results[0].points, 100);
}

#[tokio::test]
async fn test_search_is_local_and_case_insensitive() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;
    let calls_before = gateway.calls().len();

    let hits = controller.search("kIM");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "A1");
    assert_eq!(controller.search("").len(), 2);
    assert_eq!(gateway.calls().len(), calls_before);
}

#[tokio::test]
async fn test_remote_search_results() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    controller.show_screen(Screen::Search).await.unwrap();
    gateway.respond(
        "searchName",
        ApiResponse::ok().with_data(json!([
            {"id": "C3", "name": "Kim Dohyun", "point": 5},
            {"id": "A1", "name": "Kim", "point": "10"}
        ])),
    );

    controller.search_remote("Kim").unwrap();
    let completion = completions.recv().await.unwrap();
    match controller.apply_completion(completion) {
        Some(Update::Results(hits)) => {
            assert_eq!(hits.len(), 2);
            assert_eq!(hits[0].id, "A1");
            assert_eq!(hits[0].points, 10);
        }
        other => panic!("expected results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_history_is_fetched_once_per_year() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.respond(
        "getHistory",
        ApiResponse::ok().with_field(
            "history",
            json!([
                "2025-05-02",
                {"date": "2025-06-02", "status": "출석"},
                {"date": "2025-06-02", "status": "결석"}
            ]),
        ),
    );
    gateway.respond("getHistory", ApiResponse::ok().with_field("history", json!([])));

    let update = controller.open_calendar("A1").unwrap();
    assert!(matches!(update, Update::CalendarLoading { .. }));

    let completion = completions.recv().await.unwrap();
    let Some(Update::Calendar(view)) = controller.apply_completion(completion) else {
        panic!("expected the calendar once history arrived");
    };
    assert_eq!(view.label, "2025년 6월");
    let june_second = view.month.month_days().find(|d| d.day == 2).unwrap();
    assert_eq!(june_second.mark, Some(AttendanceMark::Absent));

    // Same year: served from the cache
    let Some(Update::Calendar(may)) = controller.change_month(-1) else {
        panic!("expected a cached month");
    };
    assert_eq!(may.month.count(AttendanceMark::Present), 1);
    assert_eq!(gateway.calls_for("getHistory").len(), 1);

    for _ in 0..4 {
        assert!(matches!(
            controller.change_month(-1),
            Some(Update::Calendar(_))
        ));
    }

    // Crossing into 2024 needs another fetch
    let update = controller.change_month(-1).unwrap();
    assert!(matches!(update, Update::CalendarLoading { .. }));
    let completion = completions.recv().await.unwrap();
    assert!(matches!(
        controller.apply_completion(completion),
        Some(Update::Calendar(_))
    ));
    assert_eq!(
        gateway.calls_for("getHistory")[1],
        ApiRequest::GetHistory {
            id: "A1".to_string(),
            year: 2024
        }
    );
}

#[tokio::test]
async fn test_rejected_history_retries_long_action_name() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.respond("getHistory", ApiResponse::rejected("Unknown action"));
    gateway.respond(
        "getAttendanceHistory",
        ApiResponse::ok().with_field("history", json!(["2025-06-01"])),
    );

    controller.open_calendar("A1").unwrap();
    let completion = completions.recv().await.unwrap();
    let Some(Update::Calendar(view)) = controller.apply_completion(completion) else {
        panic!("expected the calendar from the alias reply");
    };
    assert_eq!(view.month.count(AttendanceMark::Present), 1);
    assert_eq!(
        gateway.calls_for("getAttendanceHistory"),
        vec![ApiRequest::GetAttendanceHistory {
            id: "A1".to_string(),
            year: 2025
        }]
    );
}

#[tokio::test]
async fn test_stale_history_completion_is_dropped() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.respond("getHistory", ApiResponse::ok().with_field("history", json!([])));

    controller.open_calendar("A1").unwrap();
    let completion = completions.recv().await.unwrap();

    controller.show_screen(Screen::Search).await.unwrap();
    assert_eq!(controller.apply_completion(completion), None);
    assert!(!controller.state().history.contains("A1", 2025));
}

#[tokio::test]
async fn test_screen_change_aborts_history_fetch() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.hold("getHistory");

    controller.open_calendar("A1").unwrap();
    tokio::task::yield_now().await;
    assert_eq!(controller.pending_tasks(), 1);
    assert_eq!(gateway.calls_for("getHistory").len(), 1);

    controller.show_screen(Screen::Search).await.unwrap();
    assert_eq!(controller.pending_tasks(), 0);
    tokio::task::yield_now().await;
    assert!(completions.try_recv().is_err());
}

#[tokio::test]
async fn test_checkin_invalidates_current_year_history() {
    let gateway = MockGateway::new();
    let (mut controller, mut completions) = loaded(&gateway, false).await;
    gateway.respond("getHistory", ApiResponse::ok().with_field("history", json!([])));

    controller.open_calendar("A1").unwrap();
    let completion = completions.recv().await.unwrap();
    controller.apply_completion(completion);
    assert!(controller.state().history.contains("A1", 2025));

    controller.show_screen(Screen::CheckIn).await.unwrap();
    controller.check_in("A1").await.unwrap();
    assert!(!controller.state().history.contains("A1", 2025));
}

#[tokio::test]
async fn test_non_admin_cannot_open_staff_screens() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;

    for screen in [Screen::Point, Screen::Card, Screen::Register, Screen::Settings] {
        assert_eq!(
            controller.show_screen(screen).await,
            Err(KioskError::AdminRequired)
        );
        assert_eq!(controller.state().screen, Screen::CheckIn);
    }
    assert!(controller.show_screen(Screen::Schedule).await.is_ok());
    assert!(controller.show_screen(Screen::Search).await.is_ok());
}

#[tokio::test]
async fn test_unconfigured_kiosk_opens_settings_without_traffic() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = build(&gateway, KioskSettings::default(), None);

    assert_eq!(controller.start().await, Err(KioskError::NotConfigured));
    assert_eq!(controller.state().screen, Screen::Settings);
    assert!(gateway.calls().is_empty());

    // Settings stays reachable for a non-admin until a URL is saved
    assert!(controller.show_screen(Screen::Settings).await.is_ok());
}

#[tokio::test]
async fn test_save_backend_url_persists_and_loads_roster() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.yaml"));
    let gateway = MockGateway::new();
    gateway.respond(
        "getSchema",
        ApiResponse::ok().with_field("headers", json!(["ID", "이름", "포인트"])),
    );
    gateway.respond("getQuickMap", quick_map_response(&[("A1", "Kim", 0, "")]));
    let (mut controller, _completions) =
        build(&gateway, KioskSettings::default(), Some(store.clone()));

    assert_eq!(controller.save_backend_url("  ").await, Err(KioskError::EmptyUrl));
    assert_eq!(controller.save_backend_url(ENDPOINT).await, Ok(1));

    assert_eq!(controller.state().screen, Screen::CheckIn);
    assert_eq!(controller.state().schema_headers, vec!["ID", "이름", "포인트"]);
    assert_eq!(store.load().unwrap().backend_url(), Some(ENDPOINT));
}

#[tokio::test]
async fn test_configured_kiosk_keeps_url_outside_admin_mode() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.yaml"));
    let gateway = MockGateway::new();
    let (mut controller, _completions) = build(&gateway, settings(false), Some(store.clone()));

    let updates = controller
        .execute(Command::Url("http://other.test/exec".to_string()))
        .await;

    assert_eq!(notice_tone(&updates), Some(Tone::Error));
    assert_eq!(controller.settings().backend_url(), Some(ENDPOINT));
    assert_eq!(controller.status_line().backend, Some(ENDPOINT));
    assert!(gateway.calls().is_empty());
    assert!(!store.path().exists());

    assert_eq!(
        controller.save_backend_url("http://other.test/exec").await,
        Err(KioskError::AdminRequired)
    );
}

#[tokio::test]
async fn test_admin_can_change_configured_url() {
    let gateway = MockGateway::new();
    gateway.respond(
        "getSchema",
        ApiResponse::ok().with_field("headers", json!(["ID", "이름"])),
    );
    gateway.respond("getQuickMap", quick_map_response(&[("A1", "Kim", 0, "")]));
    let (mut controller, _completions) = build(&gateway, settings(true), None);

    assert_eq!(controller.save_backend_url("http://other.test/exec").await, Ok(1));
    assert_eq!(
        controller.settings().backend_url(),
        Some("http://other.test/exec")
    );
}

#[tokio::test]
async fn test_bad_backend_url_is_reported() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = build(&gateway, KioskSettings::default(), None);
    gateway.respond("getSchema", ApiResponse::ok());

    assert_eq!(
        controller.save_backend_url(ENDPOINT).await,
        Err(KioskError::UrlCheckFailed)
    );
    assert!(gateway.calls_for("getQuickMap").is_empty());
}

#[tokio::test]
async fn test_admin_mode_needs_password() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.yaml"));
    let gateway = MockGateway::new();
    let (mut controller, _completions) = build(&gateway, settings(false), Some(store.clone()));
    gateway.respond("verifyPw", ApiResponse::rejected("틀림"));
    gateway.respond("verifyPw", ApiResponse::ok());

    assert_eq!(
        controller.enable_admin("0000").await,
        Err(KioskError::WrongPassword)
    );
    assert!(!controller.state().admin);

    controller.enable_admin("1234").await.unwrap();
    assert!(controller.state().admin);
    assert!(store.load().unwrap().admin_mode);

    controller.show_screen(Screen::Point).await.unwrap();
    controller.disable_admin();
    assert!(!controller.state().admin);
    assert_eq!(controller.state().screen, Screen::CheckIn);
    assert!(!store.load().unwrap().admin_mode);
}

#[tokio::test]
async fn test_register_scan_fills_id_and_submits() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, true).await;
    gateway.respond(
        "getSchema",
        ApiResponse::ok().with_field(
            "headers",
            json!(["ID", "이름", "포인트", "연락처", "상태", "등록일"]),
        ),
    );
    gateway.respond("add", ApiResponse::ok());
    gateway.respond("getQuickMap", quick_map_response(&[("NEW2", "Choi", 0, "")]));

    controller.show_screen(Screen::Register).await.unwrap();
    controller.handle_scan("NEW2").await;
    assert_eq!(controller.state().register.get("ID"), Some("NEW2"));

    let updates = controller.execute(Command::Submit).await;
    assert_eq!(notice_tone(&updates), Some(Tone::Error));
    assert!(gateway.calls_for("add").is_empty());

    controller.execute(Command::Focus("이름".to_string())).await;
    controller.handle_scan("Choi").await;
    controller
        .execute(Command::Set {
            field: "연락처".to_string(),
            value: "010-0000-0000".to_string(),
        })
        .await;
    assert!(controller
        .set_register_field("포인트", "100")
        .is_err());

    let updates = controller.execute(Command::Submit).await;
    assert_eq!(notice_tone(&updates), Some(Tone::Success));
    assert_eq!(controller.state().screen, Screen::CheckIn);
    assert!(controller.state().roster.contains("NEW2"));

    let ApiRequest::Add { fields } = &gateway.calls_for("add")[0] else {
        panic!("expected an add request");
    };
    assert_eq!(fields["ID"], "NEW2");
    assert_eq!(fields["이름"], "Choi");
    assert_eq!(fields["연락처"], "010-0000-0000");
    assert!(!fields.contains_key("포인트"));
}

#[tokio::test]
async fn test_card_screen_selects_target_then_replacement() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, true).await;
    gateway.respond("updateId", ApiResponse::ok());
    gateway.respond("getQuickMap", quick_map_response(&[("NEW1", "Kim", 0, "")]));

    controller.show_screen(Screen::Card).await.unwrap();
    let updates = controller.execute(Command::Confirm).await;
    assert_eq!(notice_tone(&updates), Some(Tone::Error));

    controller.handle_scan("A1").await;
    assert_eq!(controller.state().card_swap.target.as_deref(), Some("A1"));

    // A card already in use is refused at confirmation
    controller.handle_scan("B2").await;
    let updates = controller.execute(Command::Confirm).await;
    assert_eq!(notice_tone(&updates), Some(Tone::Error));
    assert!(gateway.calls_for("updateId").is_empty());

    controller.handle_scan("NEW1").await;
    assert_eq!(
        controller.state().card_swap.replacement.as_deref(),
        Some("NEW1")
    );

    let updates = controller.execute(Command::Confirm).await;
    assert_eq!(notice_tone(&updates), Some(Tone::Success));
    assert_eq!(
        gateway.calls_for("updateId"),
        vec![ApiRequest::UpdateId {
            old_id: "A1".to_string(),
            new_id: "NEW1".to_string(),
            row: None
        }]
    );
    assert_eq!(controller.state().screen, Screen::CheckIn);
    assert!(controller.state().roster.contains("NEW1"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_roster() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;
    gateway.respond("getQuickMap", ApiResponse::rejected("시트 없음"));

    assert_eq!(
        controller.refresh().await,
        Err(KioskError::Backend("시트 없음".to_string()))
    );
    assert_eq!(controller.state().roster.len(), 2);
}

#[tokio::test]
async fn test_schedule_screen_shows_board() {
    let gateway = MockGateway::new();
    let (mut controller, _completions) = loaded(&gateway, false).await;

    let updates = controller.show_screen(Screen::Schedule).await.unwrap();
    assert!(updates
        .iter()
        .any(|update| matches!(update, Update::Schedule(board) if board.total() == 0)));
    // Reader input is ignored here
    assert!(controller.handle_scan("A1").await.is_empty());
}
