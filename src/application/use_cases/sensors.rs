use crate::domain::error::Result;
use crate::domain::sensor::{
    SensorReading, ORGANIC_MATTER_RANGE, PH_RANGE, SALINITY_RANGE, SOIL_MOISTURE_RANGE,
    TIMESTAMP_FORMAT,
};
use crate::infrastructure::db::sensor_readings::SensorReadingRepository;
use chrono::Local;
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;

pub const DEFAULT_DASHBOARD_LIMIT: i64 = 10;
pub const MAX_DASHBOARD_LIMIT: i64 = 100;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sample<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<f64>) -> f64 {
    round2(rng.random_range(range.clone()))
}

/// One simulated soil reading stamped with the local time.
pub fn simulate_reading() -> SensorReading {
    let mut rng = rand::rng();
    SensorReading::new(
        Local::now().format(TIMESTAMP_FORMAT).to_string(),
        sample(&mut rng, &SALINITY_RANGE),
        sample(&mut rng, &PH_RANGE),
        sample(&mut rng, &SOIL_MOISTURE_RANGE),
        sample(&mut rng, &ORGANIC_MATTER_RANGE),
    )
}

pub struct SensorUseCase {
    repository: Arc<SensorReadingRepository>,
}

impl SensorUseCase {
    pub fn new(repository: Arc<SensorReadingRepository>) -> Self {
        Self { repository }
    }

    /// Simulates a reading, stores it and hands it back.
    pub async fn read_current(&self) -> Result<SensorReading> {
        let mut reading = simulate_reading();
        self.repository.insert(&mut reading).await?;
        Ok(reading)
    }

    pub async fn dashboard(&self, limit: Option<i64>) -> Result<Vec<SensorReading>> {
        let limit = limit
            .unwrap_or(DEFAULT_DASHBOARD_LIMIT)
            .clamp(1, MAX_DASHBOARD_LIMIT);
        self.repository.latest(limit).await
    }
}
