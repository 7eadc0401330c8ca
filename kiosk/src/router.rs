//! # Input Router
//!
//! Decides what a line from the card reader means on the current screen.
//! Routing is pure: it looks at the screen, focus and loading state and
//! returns a [`ScanAction`] for the controller to carry out.
//!
//! ## Order:
//! 1. A focused field takes the line as typed input
//! 2. While a blocking call is in flight reader input is refused
//! 3. Otherwise the screen's handler decides

use crate::state::{FieldFocus, Screen};

/// What a screen does with a scanned card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanHandler {
    CheckIn,
    RegisterId,
    CardSwap,
    Lookup,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanAction {
    CheckIn(String),
    FillRegisterId(String),
    SelectCardTarget(String),
    FillReplacementCard(String),
    Lookup(String),
    FieldInput { field: FieldFocus, value: String },
    Suspended,
    Ignore,
}

pub fn handler_for(screen: Screen) -> ScanHandler {
    match screen {
        Screen::CheckIn => ScanHandler::CheckIn,
        Screen::Register => ScanHandler::RegisterId,
        Screen::Card => ScanHandler::CardSwap,
        Screen::Search | Screen::Point => ScanHandler::Lookup,
        Screen::Schedule | Screen::Settings => ScanHandler::Ignore,
    }
}

/// Snapshot of the state routing depends on
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    pub screen: Screen,
    pub focus: Option<&'a FieldFocus>,
    pub card_target_selected: bool,
    pub loading: bool,
}

pub fn route(context: RouteContext<'_>, raw: &str) -> ScanAction {
    let value = raw.trim();

    if let Some(field) = context.focus {
        return ScanAction::FieldInput {
            field: field.clone(),
            value: value.to_string(),
        };
    }

    if context.loading {
        return ScanAction::Suspended;
    }

    if value.is_empty() {
        return ScanAction::Ignore;
    }

    let id = value.to_string();
    match handler_for(context.screen) {
        ScanHandler::CheckIn => ScanAction::CheckIn(id),
        ScanHandler::RegisterId => ScanAction::FillRegisterId(id),
        ScanHandler::CardSwap if context.card_target_selected => {
            ScanAction::FillReplacementCard(id)
        }
        ScanHandler::CardSwap => ScanAction::SelectCardTarget(id),
        ScanHandler::Lookup => ScanAction::Lookup(id),
        ScanHandler::Ignore => ScanAction::Ignore,
    }
}
