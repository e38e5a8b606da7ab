use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::sensor_simulation::spawn_sensor_simulation;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, start_server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = AppConfig::load().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let state = Arc::new(crate::infrastructure::bootstrap::setup(&config).await?);
    let logs = Arc::new(Mutex::new(Vec::new()));

    let simulation = spawn_sensor_simulation(
        state.sensor_repository.clone(),
        config.simulation.interval_secs,
    );

    let server = start_server(state, logs.clone(), &config.server)?;
    add_log(
        &logs,
        "INFO",
        "System",
        &format!(
            "HTTP server listening on {}:{} (llm provider={:?} model={})",
            config.server.host, config.server.port, config.llm.provider, config.llm.model
        ),
    );

    let result = server.await;

    if let Some(handle) = simulation {
        handle.abort();
    }
    info!("Server stopped");

    result.map_err(AppError::from)
}
