//! Application state management
//!
//! This module defines the state shared across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;

use crate::service::generator::PersonaGenerator;

use super::config::Configuration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    pub database_connection: DatabaseConnection,
    /// Synthetic persona generator, built once from configuration
    pub generator: Arc<PersonaGenerator>,
    /// Prometheus handle, absent when no recorder was installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        database_connection: DatabaseConnection,
        generator: PersonaGenerator,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            configuration,
            database_connection,
            generator: Arc::new(generator),
            prometheus,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.database_connection
    }

    pub fn generator(&self) -> &PersonaGenerator {
        &self.generator
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("database_connection", &"<DatabaseConnection>")
            .field("generator", &self.generator.locale())
            .field("prometheus", &self.prometheus.is_some())
            .finish()
    }
}
