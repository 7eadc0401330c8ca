//! New-student registration form built from the sheet headers.

use std::collections::BTreeMap;

use crate::error::{KioskError, KioskResult};
use crate::state::{RegisterDraft, RosterCache};

pub const ID_HEADER: &str = "ID";
pub const NAME_HEADER: &str = "이름";

/// Columns the backend fills in itself
pub const SKIPPED_HEADERS: [&str; 4] = ["포인트", "상태", "마지막출석", "등록일"];

/// Fields shown on the registration form, in sheet order
pub fn form_fields(headers: &[String]) -> Vec<String> {
    if headers.is_empty() {
        return vec![ID_HEADER.to_string(), NAME_HEADER.to_string()];
    }
    headers
        .iter()
        .filter(|header| !SKIPPED_HEADERS.contains(&header.as_str()))
        .cloned()
        .collect()
}

/// Check the draft and collect the `add` payload
pub fn validate_registration(
    headers: &[String],
    draft: &RegisterDraft,
    roster: &RosterCache,
) -> KioskResult<BTreeMap<String, String>> {
    let mut fields: BTreeMap<String, String> = form_fields(headers)
        .into_iter()
        .map(|field| {
            let value = draft.get(&field).unwrap_or_default().to_string();
            (field, value)
        })
        .collect();

    for required in [ID_HEADER, NAME_HEADER] {
        let value = fields.entry(required.to_string()).or_insert_with(|| {
            draft.get(required).unwrap_or_default().to_string()
        });
        if value.is_empty() {
            return Err(KioskError::MissingField(required.to_string()));
        }
    }

    let id = &fields[ID_HEADER];
    if roster.contains(id) {
        return Err(KioskError::CardInUse(id.clone()));
    }
    Ok(fields)
}
