use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Salinity, dS/m.
pub const SALINITY_RANGE: RangeInclusive<f64> = 0.1..=2.5;
pub const PH_RANGE: RangeInclusive<f64> = 5.5..=8.5;
/// Soil moisture, %.
pub const SOIL_MOISTURE_RANGE: RangeInclusive<f64> = 10.0..=45.0;
/// Organic matter, %.
pub const ORGANIC_MATTER_RANGE: RangeInclusive<f64> = 1.0..=8.0;

/// A single soil reading. `id` is only set once the row is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub timestamp: String,
    pub salinity: f64,
    pub ph: f64,
    pub soil_moisture: f64,
    pub organic_matter: f64,
}

impl SensorReading {
    pub fn new(
        timestamp: impl Into<String>,
        salinity: f64,
        ph: f64,
        soil_moisture: f64,
        organic_matter: f64,
    ) -> Self {
        Self {
            id: None,
            timestamp: timestamp.into(),
            salinity,
            ph,
            soil_moisture,
            organic_matter,
        }
    }
}

/// Readings inserted into an empty `sensor_data` table on first start.
pub fn seed_readings() -> Vec<SensorReading> {
    [
        ("2025-06-28 08:52:01", 1.2, 6.8, 22.5, 3.1),
        ("2025-06-28 09:23:16", 1.1, 6.7, 23.0, 3.2),
        ("2025-06-28 10:22:56", 1.3, 6.9, 21.8, 3.0),
        ("2025-06-28 11:28:55", 1.4, 7.0, 24.0, 3.3),
        ("2025-06-28 12:11:02", 1.2, 7.1, 22.2, 3.4),
        ("2025-06-28 13:45:11", 1.5, 7.2, 23.5, 3.1),
        ("2025-06-28 14:34:06", 1.3, 7.3, 25.1, 3.6),
        ("2025-06-28 15:11:11", 1.4, 7.2, 24.0, 3.5),
        ("2025-06-28 16:53:56", 1.2, 7.0, 23.2, 3.3),
        ("2025-06-28 17:22:45", 1.3, 6.9, 22.0, 3.2),
    ]
    .into_iter()
    .map(|(ts, salinity, ph, moisture, organic)| {
        SensorReading::new(ts, salinity, ph, moisture, organic)
    })
    .collect()
}

/// Column averages over the whole history; `None` when there are no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorAverages {
    pub salinity: Option<f64>,
    pub ph: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub organic_matter: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub data: Vec<SensorReading>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}
