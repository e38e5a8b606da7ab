use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct CarbonInput {
    /// Grain produced, kg.
    #[validate(range(min = 0.0))]
    pub grano_kg: f64,
    /// Vegetables produced, kg.
    #[validate(range(min = 0.0))]
    pub verdura_kg: f64,
    /// Electricity consumed, kWh.
    #[validate(range(min = 0.0))]
    pub energia_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintLine {
    #[serde(rename = "parametro")]
    pub parameter: String,
    #[serde(rename = "quantità")]
    pub quantity: f64,
    #[serde(rename = "fattore")]
    pub factor: f64,
    pub co2: f64,
    #[serde(rename = "descrizione")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonFootprint {
    #[serde(rename = "dettaglio")]
    pub lines: Vec<FootprintLine>,
    #[serde(rename = "totale_kgCO2eq")]
    pub total_kg_co2eq: f64,
}
