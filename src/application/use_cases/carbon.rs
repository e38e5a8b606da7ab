//! Company carbon footprint from cradle-to-gate emission factors.

use crate::domain::carbon::{CarbonFootprint, CarbonInput, FootprintLine};
use crate::domain::error::{AppError, Result};
use validator::Validate;

/// kgCO2e per kg of grain, including soil storage.
pub const GRAIN_FACTOR: f64 = 0.528;
/// kgCO2eq per kg of vegetables, production and distribution.
pub const VEGETABLE_FACTOR: f64 = 0.65;
/// kgCO2eq per kWh, national medium-voltage grid mix.
pub const ELECTRICITY_FACTOR: f64 = 0.471;

const INVALID_INPUT: &str = "Tutti i valori devono essere numeri validi maggiori o uguali a zero.";

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn compute_footprint(input: &CarbonInput) -> Result<CarbonFootprint> {
    let finite = [input.grano_kg, input.verdura_kg, input.energia_kwh]
        .iter()
        .all(|v| v.is_finite());
    if !finite || input.validate().is_err() {
        return Err(AppError::ValidationError(INVALID_INPUT.to_string()));
    }

    let grain = input.grano_kg * GRAIN_FACTOR;
    let vegetables = input.verdura_kg * VEGETABLE_FACTOR;
    let electricity = input.energia_kwh * ELECTRICITY_FACTOR;

    let lines = vec![
        FootprintLine {
            parameter: "Grano (kg)".to_string(),
            quantity: input.grano_kg,
            factor: GRAIN_FACTOR,
            co2: round3(grain),
            description: "Grano, dalla cradle-to-gate, include stoccaggio suolo, pesticidi, fertilizzanti, irrigazione, raccolta".to_string(),
        },
        FootprintLine {
            parameter: "Verdura (kg)".to_string(),
            quantity: input.verdura_kg,
            factor: VEGETABLE_FACTOR,
            co2: round3(vegetables),
            description: "Verdura, dalla cradle-to-gate, include produzione e distribuzione"
                .to_string(),
        },
        FootprintLine {
            parameter: "Energia elettrica (kWh)".to_string(),
            quantity: input.energia_kwh,
            factor: ELECTRICITY_FACTOR,
            co2: round3(electricity),
            description: "Rete elettrica media tensione, mix nazionale medio".to_string(),
        },
    ];

    Ok(CarbonFootprint {
        lines,
        total_kg_co2eq: round3(grain + vegetables + electricity),
    })
}
