//! Device Registry Types
//!
//! Device entity, list/status projections and request schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};

/// Column width of the string fields in the `devices` table
pub const MAX_FIELD_LEN: usize = 255;

// ============================================================================
// Database Entities
// ============================================================================

/// Device entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub id: i32,
    pub device_name: String,
    pub serial_number: String,
    /// `None` while the device is available
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row shape returned by `GET /devices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DeviceSummary {
    pub device_name: String,
    pub serial_number: String,
}

/// Row shape returned by `GET /devices/:serial_number`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_name: String,
    pub user_name: Option<String>,
}

impl From<Device> for DeviceStatus {
    fn from(device: Device) -> Self {
        Self {
            device_name: device.device_name,
            user_name: device.user_name,
        }
    }
}

// ============================================================================
// API Request Types
// ============================================================================

/// Register device request
#[derive(Debug, Default, Deserialize)]
pub struct RegisterDeviceRequest {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Take device request
#[derive(Debug, Default, Deserialize)]
pub struct TakeDeviceRequest {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Return device request
#[derive(Debug, Default, Deserialize)]
pub struct ReturnDeviceRequest {
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Validated register input
#[derive(Debug, Clone, PartialEq)]
pub struct NewDevice {
    pub device_name: String,
    pub serial_number: String,
}

/// Validated take input
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub user_name: String,
    pub serial_number: String,
}

impl RegisterDeviceRequest {
    pub fn validate(self) -> Result<NewDevice> {
        match (non_empty(self.device_name), non_empty(self.serial_number)) {
            (Some(device_name), Some(serial_number)) => {
                check_len("device_name", &device_name)?;
                check_len("serial_number", &serial_number)?;
                Ok(NewDevice {
                    device_name,
                    serial_number,
                })
            }
            _ => Err(Error::Validation(
                "device_name and serial_number are required".to_string(),
            )),
        }
    }
}

impl TakeDeviceRequest {
    pub fn validate(self) -> Result<Assignment> {
        match (non_empty(self.user_name), non_empty(self.serial_number)) {
            (Some(user_name), Some(serial_number)) => {
                check_len("user_name", &user_name)?;
                check_len("serial_number", &serial_number)?;
                Ok(Assignment {
                    user_name,
                    serial_number,
                })
            }
            _ => Err(Error::Validation(
                "user_name and serial_number are required".to_string(),
            )),
        }
    }
}

impl ReturnDeviceRequest {
    /// Returns the serial number to release
    pub fn validate(self) -> Result<String> {
        let serial_number = non_empty(self.serial_number)
            .ok_or_else(|| Error::Validation("serial_number is required".to_string()))?;
        check_len("serial_number", &serial_number)?;
        Ok(serial_number)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_len(field: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_FIELD_LEN
        )));
    }
    Ok(())
}

// ============================================================================
// Mutation Outcomes
// ============================================================================

/// Result of a conditional assignment update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row matched and was changed
    Applied,
    /// No row matched the serial number and state precondition
    Unchanged,
}

impl UpdateOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            UpdateOutcome::Applied
        } else {
            UpdateOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_requires_both_fields() {
        let req: RegisterDeviceRequest =
            serde_json::from_str(r#"{"device_name": "Laptop-1"}"#).unwrap();
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let req: RegisterDeviceRequest =
            serde_json::from_str(r#"{"device_name": "", "serial_number": "SN100"}"#).unwrap();
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let req: RegisterDeviceRequest =
            serde_json::from_str(r#"{"device_name": null, "serial_number": "SN100"}"#).unwrap();
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_register_request_valid() {
        let req: RegisterDeviceRequest =
            serde_json::from_str(r#"{"device_name": "Laptop-1", "serial_number": "SN100"}"#)
                .unwrap();
        assert_eq!(
            req.validate().unwrap(),
            NewDevice {
                device_name: "Laptop-1".to_string(),
                serial_number: "SN100".to_string(),
            }
        );
    }

    #[test]
    fn test_take_request_validation() {
        let req: TakeDeviceRequest = serde_json::from_str(r#"{"serial_number": "SN100"}"#).unwrap();
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let req: TakeDeviceRequest =
            serde_json::from_str(r#"{"user_name": "alice", "serial_number": "SN100"}"#).unwrap();
        let assignment = req.validate().unwrap();
        assert_eq!(assignment.user_name, "alice");
        assert_eq!(assignment.serial_number, "SN100");
    }

    #[test]
    fn test_return_request_validation() {
        let req: ReturnDeviceRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let req: ReturnDeviceRequest = serde_json::from_str(r#"{"serial_number": "SN100"}"#).unwrap();
        assert_eq!(req.validate().unwrap(), "SN100");
    }

    #[test]
    fn test_overlong_field_rejected() {
        let req = RegisterDeviceRequest {
            device_name: Some("x".repeat(MAX_FIELD_LEN + 1)),
            serial_number: Some("SN100".to_string()),
        };
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_status_projection_keeps_null_user() {
        let device = Device {
            id: 1,
            device_name: "Laptop-1".to_string(),
            serial_number: "SN100".to_string(),
            user_name: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(DeviceStatus::from(device)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"device_name": "Laptop-1", "user_name": null})
        );
    }
}
