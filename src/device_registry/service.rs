//! Device Registry Service
//!
//! Business rules for registering, taking and returning devices.

use std::sync::Arc;

use sqlx::MySqlPool;
use tracing::{debug, info};

use super::repository::{DeviceRepository, MySqlDeviceRepository};
use super::types::*;
use crate::error::{Error, Result};

/// Device registry service
pub struct DeviceRegistryService {
    repo: Arc<dyn DeviceRepository>,
}

impl DeviceRegistryService {
    /// Create service backed by MySQL
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_repository(Arc::new(MySqlDeviceRepository::new(pool)))
    }

    pub fn with_repository(repo: Arc<dyn DeviceRepository>) -> Self {
        Self { repo }
    }

    /// Ensure the storage schema exists. Safe to call on every startup.
    pub async fn init(&self) -> Result<()> {
        self.repo.ensure_schema().await?;
        info!("Device table ready");
        Ok(())
    }

    /// Register a new, available device
    pub async fn register_device(&self, req: RegisterDeviceRequest) -> Result<()> {
        let device = req.validate()?;

        if self.repo.find_by_serial(&device.serial_number).await?.is_some() {
            return Err(Error::Conflict("Device already exists".to_string()));
        }

        // The unique index still rejects a concurrent insert of the same serial
        self.repo.insert_device(&device).await?;

        info!(
            serial_number = %device.serial_number,
            device_name = %device.device_name,
            "Device registered"
        );
        Ok(())
    }

    /// List all devices
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let devices = self.repo.list_devices().await?;
        debug!(count = devices.len(), "Listed devices");
        Ok(devices)
    }

    /// Get name and current holder of one device
    pub async fn get_device(&self, serial_number: &str) -> Result<DeviceStatus> {
        self.repo
            .find_by_serial(serial_number)
            .await?
            .map(DeviceStatus::from)
            .ok_or_else(device_not_found)
    }

    /// Assign an available device to a user
    pub async fn take_device(&self, req: TakeDeviceRequest) -> Result<()> {
        let assignment = req.validate()?;

        let outcome = self
            .repo
            .assign_user(&assignment.serial_number, &assignment.user_name)
            .await?;

        if outcome == UpdateOutcome::Unchanged {
            // Precondition failed: either no such device or someone holds it
            return match self.repo.find_by_serial(&assignment.serial_number).await? {
                None => Err(device_not_found()),
                Some(_) => Err(Error::Conflict("Device is already taken".to_string())),
            };
        }

        info!(
            serial_number = %assignment.serial_number,
            user_name = %assignment.user_name,
            "Device taken"
        );
        Ok(())
    }

    /// Release a taken device
    pub async fn return_device(&self, req: ReturnDeviceRequest) -> Result<()> {
        let serial_number = req.validate()?;

        let outcome = self.repo.release_user(&serial_number).await?;

        if outcome == UpdateOutcome::Unchanged {
            return match self.repo.find_by_serial(&serial_number).await? {
                None => Err(device_not_found()),
                Some(_) => Err(Error::Conflict("Device is not taken".to_string())),
            };
        }

        info!(serial_number = %serial_number, "Device returned");
        Ok(())
    }

    /// Whether the store answers
    pub async fn store_reachable(&self) -> bool {
        match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store ping failed");
                false
            }
        }
    }
}

fn device_not_found() -> Error {
    Error::NotFound("Device not found".to_string())
}
