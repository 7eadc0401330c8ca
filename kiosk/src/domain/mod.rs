//! # Domain Module
//!
//! Pure rules over the kiosk state. Nothing in here talks to the backend;
//! the controller decides when to call these and what to send afterwards.

pub mod calendar;
pub mod card_swap;
pub mod checkin;
pub mod points;
pub mod registration;
pub mod schedule;

pub use calendar::{aggregate_marks, build_calendar_month, build_calendar_view, CalendarView};
pub use card_swap::{plan_card_swap, CardSwapPlan};
pub use checkin::{
    apply_local_checkin, record_from_new_checkin, rollback_checkin, CheckinOutcome,
    CheckinSnapshot, LocalCheckin,
};
pub use points::{
    apply_local_award, parse_award_amount, reconcile_award, rollback_award, AwardSnapshot,
    PointOutcome,
};
pub use registration::{form_fields, validate_registration, ID_HEADER, NAME_HEADER};
pub use schedule::{build_schedule_board, ScheduleBoard, ScheduleSlotEntry};
