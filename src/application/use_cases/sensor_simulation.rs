use crate::application::use_cases::sensors::simulate_reading;
use crate::infrastructure::db::sensor_readings::SensorReadingRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Inserts one simulated reading. Errors are logged, never propagated.
pub async fn simulation_tick(repository: &SensorReadingRepository) -> bool {
    let mut reading = simulate_reading();
    match repository.insert(&mut reading).await {
        Ok(()) => {
            debug!(id = ?reading.id, timestamp = %reading.timestamp, "Stored simulated reading");
            true
        }
        Err(e) => {
            error!("Periodic sensor simulation failed: {}", e);
            false
        }
    }
}

/// Spawns the background simulator. The first reading lands one full
/// period after start. Returns `None` when `period_secs` is zero.
pub fn spawn_sensor_simulation(
    repository: Arc<SensorReadingRepository>,
    period_secs: u64,
) -> Option<JoinHandle<()>> {
    if period_secs == 0 {
        info!("Periodic sensor simulation disabled");
        return None;
    }

    let period = Duration::from_secs(period_secs);
    info!(period_secs, "Starting periodic sensor simulation");

    Some(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            simulation_tick(&repository).await;
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::memory_pool;

    #[tokio::test]
    async fn test_tick_inserts_a_reading() {
        let repository = SensorReadingRepository::new(memory_pool().await);
        assert!(simulation_tick(&repository).await);
        assert_eq!(repository.count().await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_tick_survives_storage_failure() {
        let pool = memory_pool().await;
        sqlx::query("DROP TABLE sensor_data").execute(&pool).await.unwrap();
        let repository = SensorReadingRepository::new(pool);
        assert!(!simulation_tick(&repository).await);
    }

    #[tokio::test]
    async fn test_zero_period_disables_task() {
        let repository = Arc::new(SensorReadingRepository::new(memory_pool().await));
        assert!(spawn_sensor_simulation(repository, 0).is_none());
    }

    #[tokio::test]
    async fn test_first_insert_after_one_period() {
        let repository = Arc::new(SensorReadingRepository::new(memory_pool().await));
        let handle = spawn_sensor_simulation(repository.clone(), 1).unwrap();

        assert_eq!(repository.count().await.unwrap(), 10);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(repository.count().await.unwrap(), 11);
        handle.abort();
    }
}
