//! Replacing a lost card: the student keeps their row, only the id changes.

use crate::error::{KioskError, KioskResult};
use crate::state::{CardSwapDraft, RosterCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSwapPlan {
    pub old_id: String,
    pub new_id: String,
    pub name: String,
    pub row: Option<u32>,
}

pub fn plan_card_swap(roster: &RosterCache, draft: &CardSwapDraft) -> KioskResult<CardSwapPlan> {
    let old_id = draft.target.as_deref().ok_or(KioskError::NoCardTarget)?;
    let student = roster
        .get(old_id)
        .ok_or_else(|| KioskError::UnknownStudent(old_id.to_string()))?;

    let new_id = draft
        .replacement
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(KioskError::NoReplacementCard)?;

    if roster.contains(new_id) {
        return Err(KioskError::CardInUse(new_id.to_string()));
    }

    Ok(CardSwapPlan {
        old_id: old_id.to_string(),
        new_id: new_id.to_string(),
        name: student.name.clone(),
        row: student.row,
    })
}
