//! In-memory `DeviceRepository` for tests

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::repository::DeviceRepository;
use super::types::*;
use crate::error::{Error, Result};

/// In-memory stand-in for the `devices` table
#[derive(Default)]
pub struct InMemoryDeviceRepository {
    rows: Mutex<Vec<Device>>,
}

impl InMemoryDeviceRepository {
    pub async fn count(&self, serial_number: &str) -> usize {
        self.rows
            .lock()
            .await
            .iter()
            .filter(|d| d.serial_number == serial_number)
            .count()
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .map(|d| DeviceSummary {
                device_name: d.device_name.clone(),
                serial_number: d.serial_number.clone(),
            })
            .collect())
    }

    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<Device>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|d| d.serial_number == serial_number)
            .cloned())
    }

    async fn insert_device(&self, device: &NewDevice) -> Result<()> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|d| d.serial_number == device.serial_number) {
            return Err(Error::Conflict("Device already exists".to_string()));
        }
        let id = rows.len() as i32 + 1;
        rows.push(Device {
            id,
            device_name: device.device_name.clone(),
            serial_number: device.serial_number.clone(),
            user_name: None,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn assign_user(&self, serial_number: &str, user_name: &str) -> Result<UpdateOutcome> {
        let mut rows = self.rows.lock().await;
        match rows
            .iter_mut()
            .find(|d| d.serial_number == serial_number && d.user_name.is_none())
        {
            Some(d) => {
                d.user_name = Some(user_name.to_string());
                Ok(UpdateOutcome::Applied)
            }
            None => Ok(UpdateOutcome::Unchanged),
        }
    }

    async fn release_user(&self, serial_number: &str) -> Result<UpdateOutcome> {
        let mut rows = self.rows.lock().await;
        match rows
            .iter_mut()
            .find(|d| d.serial_number == serial_number && d.user_name.is_some())
        {
            Some(d) => {
                d.user_name = None;
                Ok(UpdateOutcome::Applied)
            }
            None => Ok(UpdateOutcome::Unchanged),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

