//! Device Registry Library
//!
//! Check-out registry for physical devices tracked by serial number.
//!
//! ## Components
//!
//! 1. DeviceRegistry - device inventory and take/return rules over MySQL
//! 2. WebAPI - REST API endpoints
//!
//! All state lives in the `devices` table; handlers share one pool
//! through [`AppState`].

pub mod device_registry;
pub mod error;
pub mod models;
pub mod state;
pub mod web_api;

pub use error::{Error, Result};
pub use state::AppState;
