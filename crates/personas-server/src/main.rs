//! Main entry point for the Personas server.
//!
//! Loads configuration, prepares logging, metrics and the database, then
//! serves the HTTP API until a shutdown signal arrives.

use std::sync::Arc;

use personas_migration::{Migrator, MigratorTrait};
use personas_server::{
    metrics,
    model::{AppState, Configuration},
    service::{generator::PersonaGenerator, persona},
    startup::{self, GracefulShutdown},
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let prometheus = metrics::install_prometheus_recorder();
    metrics::init_metrics();

    let database_connection = configuration.database_connection().await?;
    if configuration.auto_migrate() {
        Migrator::up(&database_connection, None).await?;
        info!("Database migrations applied");
    }

    let locale = configuration.generator_locale()?;
    let seed = configuration.generator_seed();
    let generator = PersonaGenerator::new(locale, seed);
    info!(%locale, seeded = seed.is_some(), "Synthetic persona generator ready");

    let stored = persona::count(&database_connection).await?;
    info!(stored, "Persona store opened");

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let context_path = configuration.server_context_path();
    let workers = configuration.server_workers();
    let shutdown_timeout = configuration.shutdown_timeout();

    let app_state = Arc::new(AppState::new(
        configuration,
        database_connection.clone(),
        generator,
        prometheus,
    ));

    let shutdown_signal = startup::wait_for_shutdown_signal();
    let graceful_shutdown = GracefulShutdown::new(shutdown_signal, shutdown_timeout);

    info!(
        "Starting Personas server on {}:{}{}",
        server_address, server_port, context_path
    );
    let server = startup::main_server(
        app_state,
        context_path,
        server_address,
        server_port,
        workers,
        shutdown_timeout,
    )?;
    let handle = server.handle();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = graceful_shutdown.wait_for_shutdown() => {
            graceful_shutdown.stop_server(&handle).await;
        }
    }

    if let Err(e) = database_connection.close().await {
        error!("Failed to close database connection: {}", e);
    }

    Ok(())
}
