//! # Calendar Module
//!
//! Turns a year of attendance history into the month grid shown for a
//! student. Several events on one date collapse into the one with the
//! highest priority: absence, then early leave, then presence.

use chrono::NaiveDate;
use log::debug;
use shared::{AttendanceMark, CalendarDay, CalendarDayType, CalendarMonth, HistoryEntry};
use std::collections::HashMap;

use crate::services::date_utils::{days_in_month, first_day_of_month, month_label};

/// Calendar ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub student_id: String,
    pub student_name: String,
    pub label: String,
    pub month: CalendarMonth,
}

/// Highest-priority mark per `yyyy-MM-dd` key
pub fn aggregate_marks(entries: &[HistoryEntry]) -> HashMap<String, AttendanceMark> {
    let mut marks: HashMap<String, AttendanceMark> = HashMap::new();
    for entry in entries {
        marks
            .entry(entry.date.clone())
            .and_modify(|current| {
                if entry.mark.priority() > current.priority() {
                    *current = entry.mark;
                }
            })
            .or_insert(entry.mark);
    }
    marks
}

pub fn build_calendar_month(
    year: i32,
    month: u32,
    entries: &[HistoryEntry],
    today: NaiveDate,
) -> CalendarMonth {
    let marks = aggregate_marks(entries);
    let today_key = shared::date_key(today);
    let first_day_of_week = first_day_of_month(year, month);
    let days_in_current_month = days_in_month(year, month);

    debug!(
        "📅 Building {}-{:02}: {} marked dates, first weekday {}",
        year,
        month,
        marks.len(),
        first_day_of_week
    );

    let mut days = Vec::with_capacity((first_day_of_week + days_in_current_month) as usize);

    for _ in 0..first_day_of_week {
        days.push(CalendarDay {
            day: 0,
            mark: None,
            is_today: false,
            day_type: CalendarDayType::PaddingBefore,
        });
    }

    for day in 1..=days_in_current_month {
        let key = format!("{:04}-{:02}-{:02}", year, month, day);
        days.push(CalendarDay {
            day,
            mark: marks.get(&key).copied(),
            is_today: key == today_key,
            day_type: CalendarDayType::MonthDay,
        });
    }

    CalendarMonth {
        year,
        month,
        days,
        first_day_of_week,
    }
}

pub fn build_calendar_view(
    student_id: &str,
    student_name: &str,
    year: i32,
    month: u32,
    entries: &[HistoryEntry],
    today: NaiveDate,
) -> CalendarView {
    CalendarView {
        student_id: student_id.to_string(),
        student_name: student_name.to_string(),
        label: month_label(year, month),
        month: build_calendar_month(year, month, entries, today),
    }
}
