use crate::domain::error::Result;
use crate::domain::sensor::SensorAverages;
use crate::infrastructure::db::sensor_readings::SensorReadingRepository;
use std::sync::Arc;

pub const SALINITY_HIGH: f64 = 2.0;
pub const PH_LOW: f64 = 6.0;
pub const PH_HIGH: f64 = 7.5;
pub const MOISTURE_LOW: f64 = 20.0;
pub const MOISTURE_HIGH: f64 = 40.0;
pub const ORGANIC_MATTER_LOW: f64 = 2.0;

pub const ALL_GOOD: &str = "Le risorse sono ottimizzate.";

/// Threshold tips over the historical averages. Missing averages trigger nothing.
pub fn rule_based_suggestions(averages: &SensorAverages) -> Vec<String> {
    let mut suggestions = Vec::new();

    if averages.salinity.is_some_and(|v| v > SALINITY_HIGH) {
        suggestions.push(
            "Riduci la salinità con irrigazioni di lavaggio e un drenaggio adeguato.".to_string(),
        );
    }
    if let Some(ph) = averages.ph {
        if ph < PH_LOW {
            suggestions.push("Correggi l'acidità del suolo con ammendanti calcarei.".to_string());
        } else if ph > PH_HIGH {
            suggestions.push(
                "Riduci l'alcalinità con sostanza organica o zolfo elementare.".to_string(),
            );
        }
    }
    if let Some(moisture) = averages.soil_moisture {
        if moisture < MOISTURE_LOW {
            suggestions.push(
                "Riduci le perdite d'acqua con irrigazione a goccia e pacciamatura.".to_string(),
            );
        } else if moisture > MOISTURE_HIGH {
            suggestions.push(
                "Riduci l'uso di acqua: il suolo è vicino alla saturazione.".to_string(),
            );
        }
    }
    if averages
        .organic_matter
        .is_some_and(|v| v < ORGANIC_MATTER_LOW)
    {
        suggestions.push(
            "Aumenta la sostanza organica con compost e sovesci, ottimizzando la fertilizzazione."
                .to_string(),
        );
    }

    if suggestions.is_empty() {
        suggestions.push(ALL_GOOD.to_string());
    }
    suggestions
}

pub struct AdvisoryUseCase {
    repository: Arc<SensorReadingRepository>,
}

impl AdvisoryUseCase {
    pub fn new(repository: Arc<SensorReadingRepository>) -> Self {
        Self { repository }
    }

    pub async fn suggestions(&self) -> Result<Vec<String>> {
        let averages = self.repository.averages().await?;
        Ok(rule_based_suggestions(&averages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::memory_pool;

    #[test]
    fn test_no_data_means_optimized() {
        assert_eq!(
            rule_based_suggestions(&SensorAverages::default()),
            vec![ALL_GOOD.to_string()]
        );
    }

    #[test]
    fn test_each_rule_fires() {
        let averages = SensorAverages {
            salinity: Some(2.4),
            ph: Some(5.6),
            soil_moisture: Some(12.0),
            organic_matter: Some(1.1),
        };
        let suggestions = rule_based_suggestions(&averages);
        assert_eq!(suggestions.len(), 4);
        assert!(!suggestions.contains(&ALL_GOOD.to_string()));
    }

    #[test]
    fn test_boundaries_do_not_fire() {
        let averages = SensorAverages {
            salinity: Some(SALINITY_HIGH),
            ph: Some(PH_HIGH),
            soil_moisture: Some(MOISTURE_LOW),
            organic_matter: Some(ORGANIC_MATTER_LOW),
        };
        assert_eq!(rule_based_suggestions(&averages), vec![ALL_GOOD.to_string()]);
    }

    #[tokio::test]
    async fn test_seed_history_is_balanced() {
        let advisory = AdvisoryUseCase::new(Arc::new(SensorReadingRepository::new(
            memory_pool().await,
        )));
        assert_eq!(advisory.suggestions().await.unwrap(), vec![ALL_GOOD.to_string()]);
    }
}
