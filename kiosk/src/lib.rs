//! NFC attendance kiosk for a sheet-backed tutoring roster.
//!
//! Cards are read as lines on stdin. Known cards are checked in against an
//! in-memory roster right away and saved in the background; everything else
//! goes through a single JSON action endpoint.

pub mod cli;
pub mod console;
pub mod controller;
pub mod domain;
pub mod error;
pub mod router;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod ui;

#[cfg(test)]
pub mod test_utils;

pub use controller::KioskController;
pub use error::{KioskError, KioskResult};
