//! Device Registry
//!
//! ## Responsibilities
//!
//! - Device inventory keyed by serial number
//! - Check-out state (`user_name`), taken and returned through
//!   conditional updates so concurrent callers cannot both win
//! - Storage schema bootstrap

mod repository;
mod service;
mod types;

#[cfg(test)]
pub(crate) mod memory;

pub use repository::{DeviceRepository, MySqlDeviceRepository};
pub use service::DeviceRegistryService;
pub use types::*;
