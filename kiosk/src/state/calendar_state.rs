//! # Calendar State Module
//!
//! Navigation state of the attendance calendar and the per-year history
//! cache behind it.
//!
//! History is fetched one calendar year at a time and cached per
//! (student, year), so moving between months of the same year never goes
//! back to the backend.

use chrono::{Datelike, NaiveDate};
use log::info;
use shared::HistoryEntry;
use std::collections::HashMap;

use crate::services::date_utils::{month_label, shift_month};

/// The calendar currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarState {
    pub student_id: String,
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl CalendarState {
    /// Open on the month containing `today`
    pub fn new(student_id: &str, today: NaiveDate) -> Self {
        Self {
            student_id: student_id.to_string(),
            year: today.year(),
            month: today.month(),
        }
    }

    /// Navigate to the previous month
    pub fn navigate_to_previous_month(&mut self) {
        self.shift(-1);
        info!("📅 Navigated to previous month: {}/{}", self.month, self.year);
    }

    /// Navigate to the next month
    pub fn navigate_to_next_month(&mut self) {
        self.shift(1);
        info!("📅 Navigated to next month: {}/{}", self.month, self.year);
    }

    pub fn shift(&mut self, delta: i32) {
        let (year, month) = shift_month(self.year, self.month, delta);
        self.year = year;
        self.month = month;
    }

    pub fn label(&self) -> String {
        month_label(self.year, self.month)
    }
}

/// Attendance history per (student, year)
#[derive(Debug, Default)]
pub struct HistoryCache {
    years: HashMap<(String, i32), Vec<HistoryEntry>>,
}

impl HistoryCache {
    pub fn get(&self, student_id: &str, year: i32) -> Option<&[HistoryEntry]> {
        self.years
            .get(&(student_id.to_string(), year))
            .map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn contains(&self, student_id: &str, year: i32) -> bool {
        self.years.contains_key(&(student_id.to_string(), year))
    }

    pub fn insert(&mut self, student_id: &str, year: i32, entries: Vec<HistoryEntry>) {
        self.years.insert((student_id.to_string(), year), entries);
    }

    /// Drop a cached year, e.g. after the student checked in today
    pub fn invalidate(&mut self, student_id: &str, year: i32) {
        self.years.remove(&(student_id.to_string(), year));
    }

    /// Forget every year of a student, e.g. after the card id changed
    pub fn forget_student(&mut self, student_id: &str) {
        self.years.retain(|(id, _), _| id != student_id);
    }
}
