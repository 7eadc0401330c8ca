//! # Services
//!
//! Outward-facing helpers used by the controller:
//! - **api**: the backend gateway and the loader-aware API client
//! - **date_utils**: the kiosk clock and calendar arithmetic
//! - **logging**: env_logger setup for the binary

pub mod api;
pub mod date_utils;
pub mod logging;

pub use api::{ApiClient, Gateway, HttpGateway, LoadingFlag};
pub use date_utils::{Clock, FixedClock, SystemClock};
