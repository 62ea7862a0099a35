//! Device Registry Repository
//!
//! Database access layer for the `devices` table.

use async_trait::async_trait;
use sqlx::MySqlPool;

use super::types::*;
use crate::error::{Error, Result};

/// MySQL error number for a duplicate key on a unique index
const ER_DUP_ENTRY: &str = "1062";

const CREATE_DEVICES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS devices (
        id INT AUTO_INCREMENT PRIMARY KEY,
        device_name VARCHAR(255) NOT NULL,
        serial_number VARCHAR(255) UNIQUE NOT NULL,
        user_name VARCHAR(255) NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Storage operations the registry service depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Create the `devices` table if it is absent
    async fn ensure_schema(&self) -> Result<()>;

    /// All devices in insertion order
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>>;

    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<Device>>;

    /// Insert an available device. A duplicate serial number yields `Error::Conflict`.
    async fn insert_device(&self, device: &NewDevice) -> Result<()>;

    /// Set `user_name` only if the device is currently available
    async fn assign_user(&self, serial_number: &str, user_name: &str) -> Result<UpdateOutcome>;

    /// Clear `user_name` only if the device is currently taken
    async fn release_user(&self, serial_number: &str) -> Result<UpdateOutcome>;

    /// Round-trip to the store
    async fn ping(&self) -> Result<()>;
}

/// MySQL implementation of [`DeviceRepository`]
#[derive(Clone)]
pub struct MySqlDeviceRepository {
    pool: MySqlPool,
}

impl MySqlDeviceRepository {
    /// Create new repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRepository for MySqlDeviceRepository {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_DEVICES_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let devices = sqlx::query_as::<_, DeviceSummary>(
            "SELECT device_name, serial_number FROM devices ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(devices)
    }

    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            r#"SELECT id, device_name, serial_number, user_name, created_at
               FROM devices WHERE serial_number = ?"#,
        )
        .bind(serial_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(device)
    }

    async fn insert_device(&self, device: &NewDevice) -> Result<()> {
        let result = sqlx::query("INSERT INTO devices (device_name, serial_number) VALUES (?, ?)")
            .bind(&device.device_name)
            .bind(&device.serial_number)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(ER_DUP_ENTRY) =>
            {
                Err(Error::Conflict("Device already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn assign_user(&self, serial_number: &str, user_name: &str) -> Result<UpdateOutcome> {
        let result = sqlx::query(
            "UPDATE devices SET user_name = ? WHERE serial_number = ? AND user_name IS NULL",
        )
        .bind(user_name)
        .bind(serial_number)
        .execute(&self.pool)
        .await?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    async fn release_user(&self, serial_number: &str) -> Result<UpdateOutcome> {
        let result = sqlx::query(
            "UPDATE devices SET user_name = NULL WHERE serial_number = ? AND user_name IS NOT NULL",
        )
        .bind(serial_number)
        .execute(&self.pool)
        .await?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
