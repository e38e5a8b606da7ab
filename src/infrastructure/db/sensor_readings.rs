use crate::domain::error::{AppError, Result};
use crate::domain::sensor::{SensorAverages, SensorReading};
use sqlx::SqlitePool;
use tracing::warn;

pub struct SensorReadingRepository {
    pool: SqlitePool,
}

impl SensorReadingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, reading: &mut SensorReading) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO sensor_data (timestamp, salinity, ph, soil_moisture, organic_matter)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&reading.timestamp)
        .bind(reading.salinity)
        .bind(reading.ph)
        .bind(reading.soil_moisture)
        .bind(reading.organic_matter)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save sensor reading: {}", e)))?;

        reading.id = Some(result.last_insert_rowid());
        Ok(())
    }

    /// Newest first. Timestamps are zero-padded so text order is time order.
    /// Rows with NULL columns, left by older databases, are skipped.
    pub async fn latest(&self, limit: i64) -> Result<Vec<SensorReading>> {
        let entities = sqlx::query_as::<_, SensorReadingEntity>(
            "SELECT id, timestamp, salinity, ph, soil_moisture, organic_matter
             FROM sensor_data ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch sensor data: {}", e)))?;

        Ok(entities
            .into_iter()
            .filter_map(|entity| {
                let id = entity.id;
                let reading = entity.into_reading();
                if reading.is_none() {
                    warn!(id, "Skipping incomplete sensor row");
                }
                reading
            })
            .collect())
    }

    pub async fn averages(&self) -> Result<SensorAverages> {
        let (salinity, ph, soil_moisture, organic_matter) =
            sqlx::query_as::<_, (Option<f64>, Option<f64>, Option<f64>, Option<f64>)>(
                "SELECT AVG(salinity), AVG(ph), AVG(soil_moisture), AVG(organic_matter)
                 FROM sensor_data",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to compute sensor averages: {}", e))
            })?;

        Ok(SensorAverages {
            salinity,
            ph,
            soil_moisture,
            organic_matter,
        })
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sensor_data")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count sensor data: {}", e)))
    }
}

#[derive(sqlx::FromRow)]
struct SensorReadingEntity {
    id: i64,
    timestamp: Option<String>,
    salinity: Option<f64>,
    ph: Option<f64>,
    soil_moisture: Option<f64>,
    organic_matter: Option<f64>,
}

impl SensorReadingEntity {
    fn into_reading(self) -> Option<SensorReading> {
        Some(SensorReading {
            id: Some(self.id),
            timestamp: self.timestamp?,
            salinity: self.salinity?,
            ph: self.ph?,
            soil_moisture: self.soil_moisture?,
            organic_matter: self.organic_matter?,
        })
    }
}
