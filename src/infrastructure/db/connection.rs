use crate::domain::error::{AppError, Result};
use crate::domain::sensor::seed_readings;
use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::db::sensor_readings::SensorReadingRepository;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const SCHEMA: &str = include_str!("../../resources/schema.sql");

/// Opens the pool, applies the schema and seeds an empty sensor history.
pub async fn init_db(config: &DatabaseConfig) -> Result<SqlitePool> {
    let in_memory = config.url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse connection string: {}", e)))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    // An in-memory database lives as long as its single connection.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

    apply_schema(&pool).await?;
    seed_sensor_data(&pool).await?;

    Ok(pool)
}

async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA.split(';') {
        let stmt = statement.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to apply schema: {}", e)))?;
    }
    Ok(())
}

async fn seed_sensor_data(pool: &SqlitePool) -> Result<()> {
    let repository = SensorReadingRepository::new(pool.clone());
    if repository.count().await? > 0 {
        return Ok(());
    }

    let seed = seed_readings();
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to open transaction: {}", e)))?;
    for reading in &seed {
        sqlx::query(
            "INSERT INTO sensor_data (timestamp, salinity, ph, soil_moisture, organic_matter)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&reading.timestamp)
        .bind(reading.salinity)
        .bind(reading.ph)
        .bind(reading.soil_moisture)
        .bind(reading.organic_matter)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to seed sensor data: {}", e)))?;
    }
    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit seed data: {}", e)))?;

    info!(rows = seed.len(), "Seeded sensor_data with example readings");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    init_db(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("in-memory database")
}
