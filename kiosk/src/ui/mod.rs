//! # UI Module
//!
//! Text presentation of the kiosk for a terminal attached to the card reader.
//!
//! ## Key Types:
//! - `Update` - something the display should show after an input or a completion
//! - `Notice` - short result message with an optional point balance
//!
//! ## Rendering:
//! All `render_*` functions are pure and return the text to print, so they
//! can be tested without a terminal.

pub mod notice;
pub mod render;

pub use notice::{Notice, Tone};
pub use render::*;

use shared::StudentRecord;

use crate::domain::{CalendarView, ScheduleBoard};
use crate::state::Screen;

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Notice(Notice),
    Results(Vec<StudentRecord>),
    Calendar(CalendarView),
    /// Calendar requested, history still on its way
    CalendarLoading { student_name: String, label: String },
    Schedule(ScheduleBoard),
    Screen(Screen),
    /// Registration form fields with their current values
    RegisterForm(Vec<(String, String)>),
}

impl From<Notice> for Update {
    fn from(notice: Notice) -> Self {
        Update::Notice(notice)
    }
}
