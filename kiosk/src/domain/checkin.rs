//! Check-in rules applied to the local roster.
//!
//! A known card is acknowledged immediately: the cache records today's
//! attendance and the check-in bonus before the backend hears about it. A
//! second tag on the same day is reported and changes nothing.

use chrono::NaiveDate;
use shared::StudentRecord;

use crate::state::RosterCache;

/// What the kiosk shows after a card is tagged on the check-in screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinOutcome {
    AlreadyCheckedIn { name: String, points: u64 },
    CheckedIn { name: String, points: u64 },
    /// Card was not cached; the backend checked it in and told us the name
    NewCheckIn { name: String, points: u64 },
    Unregistered { id: String, message: Option<String> },
}

/// Values before and after an optimistic check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinSnapshot {
    pub previous_date: Option<NaiveDate>,
    pub previous_points: u64,
    pub applied_date: NaiveDate,
    pub applied_points: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocalCheckin {
    AlreadyCheckedIn(StudentRecord),
    Applied {
        record: StudentRecord,
        snapshot: CheckinSnapshot,
    },
    /// Not in the cache, needs a round trip
    Unknown,
}

pub fn apply_local_checkin(
    roster: &mut RosterCache,
    id: &str,
    today: NaiveDate,
    bonus: u64,
) -> LocalCheckin {
    let Some(student) = roster.get_mut(id) else {
        return LocalCheckin::Unknown;
    };

    if student.checked_in_on(today) {
        return LocalCheckin::AlreadyCheckedIn(student.clone());
    }

    let snapshot = CheckinSnapshot {
        previous_date: student.last_attendance,
        previous_points: student.points,
        applied_date: today,
        applied_points: student.points.saturating_add(bonus),
    };
    student.last_attendance = Some(today);
    student.points = snapshot.applied_points;

    LocalCheckin::Applied {
        record: student.clone(),
        snapshot,
    }
}

/// Undo an optimistic check-in. Each field is restored only while it still
/// holds the optimistic value; anything newer (a refresh, an award) wins.
pub fn rollback_checkin(roster: &mut RosterCache, id: &str, snapshot: &CheckinSnapshot) -> bool {
    let Some(student) = roster.get_mut(id) else {
        return false;
    };

    let mut restored = false;
    if student.last_attendance == Some(snapshot.applied_date) {
        student.last_attendance = snapshot.previous_date;
        restored = true;
    }
    if student.points == snapshot.applied_points {
        student.points = snapshot.previous_points;
        restored = true;
    }
    restored
}

/// Cache entry for a card the backend just checked in for the first time
pub fn record_from_new_checkin(id: &str, name: &str, points: u64, today: NaiveDate) -> StudentRecord {
    let mut record = StudentRecord::new(id, name);
    record.points = points;
    record.last_attendance = Some(today);
    record
}
