//! Today's class dashboard: who is expected, grouped by class time, and
//! who has already checked in.

use chrono::{Datelike, NaiveDate};
use shared::{korean_weekday, StudentStatus};
use std::collections::BTreeMap;

use crate::state::RosterCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlotEntry {
    pub id: String,
    pub name: String,
    pub checked_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBoard {
    pub date: NaiveDate,
    pub weekday: char,
    /// Class time label → students, both sorted
    pub slots: BTreeMap<String, Vec<ScheduleSlotEntry>>,
}

impl ScheduleBoard {
    pub fn total(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn present(&self) -> usize {
        self.slots
            .values()
            .flatten()
            .filter(|entry| entry.checked_in)
            .count()
    }

    pub fn absent(&self) -> usize {
        self.total() - self.present()
    }
}

/// Build the board for `today`. Withdrawn students are left out.
pub fn build_schedule_board(roster: &RosterCache, today: NaiveDate) -> ScheduleBoard {
    let weekday = today.weekday();
    let mut slots: BTreeMap<String, Vec<ScheduleSlotEntry>> = BTreeMap::new();

    for student in roster.iter() {
        if student.status == StudentStatus::Withdrawn {
            continue;
        }
        let Some(time) = student.schedule.class_time_on(weekday) else {
            continue;
        };
        slots
            .entry(time.to_string())
            .or_default()
            .push(ScheduleSlotEntry {
                id: student.id.clone(),
                name: student.name.clone(),
                checked_in: student.checked_in_on(today),
            });
    }

    for entries in slots.values_mut() {
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }

    ScheduleBoard {
        date: today,
        weekday: korean_weekday(weekday),
        slots,
    }
}
