//! TimeSolv API Client Library
//!
//! This library wraps TimeSolv's REST API for timekeeping and
//! employee-tracking data: it performs the OAuth2 authorization-code
//! exchange, keeps the token pair fresh, and exposes typed access to
//! firm users and timecards.

pub mod error;
pub mod helpers;
pub mod models;
pub mod service;

pub use service::{TimeSolvConfig, TimeSolvService};

// Re-export key types for convenience
pub use error::ApiError;
pub use helpers::oauth::oauth_client_init;
pub use models::firm::FirmUser;
pub use models::timecard::{Timecard, TimecardQuery};
pub use models::token::{TokenResponse, TokenSet};
