//! Point awards applied to the local roster ahead of the backend write.

use shared::StudentRecord;

use crate::error::{KioskError, KioskResult};
use crate::state::RosterCache;

/// Shown after an award was applied locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOutcome {
    pub id: String,
    pub name: String,
    pub amount: u64,
    pub points: u64,
}

/// Balance before and after an optimistic award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardSnapshot {
    pub amount: u64,
    pub previous: u64,
    pub optimistic: u64,
}

/// Parse a typed award amount: a finite, positive whole number
pub fn parse_award_amount(input: &str) -> KioskResult<u64> {
    let trimmed = input.trim();
    let invalid = || KioskError::InvalidAmount(trimmed.to_string());

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(invalid());
    }
    Ok(value as u64)
}

pub fn apply_local_award(
    roster: &mut RosterCache,
    id: &str,
    amount: u64,
) -> KioskResult<(StudentRecord, AwardSnapshot)> {
    let student = roster
        .get_mut(id)
        .ok_or_else(|| KioskError::UnknownStudent(id.to_string()))?;

    let snapshot = AwardSnapshot {
        amount,
        previous: student.points,
        optimistic: student.points.saturating_add(amount),
    };
    student.points = snapshot.optimistic;
    Ok((student.clone(), snapshot))
}

/// Undo an award whose write was rejected, unless the balance moved since
pub fn rollback_award(roster: &mut RosterCache, id: &str, snapshot: &AwardSnapshot) -> bool {
    match roster.get_mut(id) {
        Some(student) if student.points == snapshot.optimistic => {
            student.points = snapshot.previous;
            true
        }
        _ => false,
    }
}

/// Adopt the backend's total after a successful write, unless the balance moved since
pub fn reconcile_award(
    roster: &mut RosterCache,
    id: &str,
    snapshot: &AwardSnapshot,
    server_total: u64,
) -> bool {
    match roster.get_mut(id) {
        Some(student) if student.points == snapshot.optimistic => {
            student.points = server_total;
            true
        }
        _ => false,
    }
}
