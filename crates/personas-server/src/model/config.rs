//! Configuration management for the Personas server
//!
//! This module handles loading and accessing application configuration.
//! Sources are layered: the YAML file first, then `PERSONAS__*` environment
//! variables, then command line overrides.

use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment};
use personas_common::PersonaError;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::service::generator::Locale;
use crate::startup::LoggingConfig;

use super::constants::{
    DB_AUTO_MIGRATE, DB_POOL_ACQUIRE_TIMEOUT, DB_POOL_CONNECT_TIMEOUT, DB_POOL_IDLE_TIMEOUT,
    DB_POOL_MAX_CONNECTIONS, DB_POOL_MAX_LIFETIME, DB_POOL_MIN_CONNECTIONS, DB_POOL_SQLX_LOGGING,
    DB_URL, DEFAULT_CONFIG_FILE, DEFAULT_DB_URL, DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS, ENV_PREFIX, ENV_SEPARATOR, GENERATOR_LOCALE, GENERATOR_SEED,
    LOGGING_CONSOLE, LOGGING_DIR, LOGGING_FILE, LOGGING_LEVEL, LOGGING_ROTATION, SERVER_ADDRESS,
    SERVER_CONTEXT_PATH, SERVER_PORT, SERVER_WORKERS, SHUTDOWN_TIMEOUT_SECS,
};

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "personas-server", version, about = "Personas CRUD service")]
pub struct Cli {
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Loads configuration using the process command line.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> Result<Self, ConfigError> {
        let config_file = if args.config_file.is_empty() {
            DEFAULT_CONFIG_FILE.to_string()
        } else {
            args.config_file
        };

        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&config_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );

        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override(DB_URL, v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT, i64::from(v))?;
        }
        if let Some(v) = args.seed {
            config_builder = config_builder.set_override(GENERATOR_SEED, v.to_string())?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Context path prefix for every route, normalized to `""` or `/segment`.
    pub fn server_context_path(&self) -> String {
        let path = self
            .config
            .get_string(SERVER_CONTEXT_PATH)
            .unwrap_or_default();
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    pub fn server_workers(&self) -> Option<usize> {
        self.config
            .get_int(SERVER_WORKERS)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        let secs = self
            .config
            .get_int(SHUTDOWN_TIMEOUT_SECS)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_url(&self) -> String {
        self.config
            .get_string(DB_URL)
            .unwrap_or(DEFAULT_DB_URL.to_string())
    }

    pub fn auto_migrate(&self) -> bool {
        self.config.get_bool(DB_AUTO_MIGRATE).unwrap_or(true)
    }

    fn pool_setting(&self, key: &str, default: u64) -> u64 {
        self.config
            .get_int(key)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(default)
    }

    fn pool_size(&self, key: &str, default: u32) -> u32 {
        self.config
            .get_int(key)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub async fn database_connection(&self) -> Result<DatabaseConnection, sea_orm::DbErr> {
        let max_connections = self.pool_size(DB_POOL_MAX_CONNECTIONS, 10);
        let min_connections = self.pool_size(DB_POOL_MIN_CONNECTIONS, 1);
        let connect_timeout = self.pool_setting(DB_POOL_CONNECT_TIMEOUT, 30);
        let acquire_timeout = self.pool_setting(DB_POOL_ACQUIRE_TIMEOUT, 8);
        let idle_timeout = self.pool_setting(DB_POOL_IDLE_TIMEOUT, 600);
        let max_lifetime = self.pool_setting(DB_POOL_MAX_LIFETIME, 1800);
        let sqlx_logging = self.config.get_bool(DB_POOL_SQLX_LOGGING).unwrap_or(false);

        let url = self.database_url();

        let mut opt = ConnectOptions::new(url);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        Database::connect(opt).await
    }

    // ========================================================================
    // Generator Configuration
    // ========================================================================

    pub fn generator_locale(&self) -> Result<Locale, PersonaError> {
        match self.config.get_string(GENERATOR_LOCALE) {
            Ok(v) => v.parse(),
            Err(_) => Ok(Locale::default()),
        }
    }

    pub fn generator_seed(&self) -> Option<u64> {
        self.config.get::<u64>(GENERATOR_SEED).ok()
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGGING_DIR).ok(),
            self.config.get_bool(LOGGING_CONSOLE).unwrap_or(true),
            self.config.get_bool(LOGGING_FILE).unwrap_or(false),
            self.config
                .get_string(LOGGING_LEVEL)
                .unwrap_or("info".to_string()),
            self.config.get_string(LOGGING_ROTATION).ok(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration(overrides: &[(&str, &str)]) -> Configuration {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Configuration::from_config(builder.build().unwrap())
    }

    #[test]
    fn test_defaults() {
        let configuration = Configuration::default();
        assert_eq!(configuration.server_address(), "0.0.0.0");
        assert_eq!(configuration.server_port(), 8000);
        assert_eq!(configuration.server_context_path(), "");
        assert_eq!(configuration.server_workers(), None);
        assert_eq!(configuration.database_url(), DEFAULT_DB_URL);
        assert!(configuration.auto_migrate());
        assert_eq!(configuration.generator_locale().unwrap(), Locale::EsEs);
        assert_eq!(configuration.generator_seed(), None);
        assert_eq!(configuration.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let configuration = configuration(&[
            (SERVER_PORT, "9090"),
            (DB_URL, "sqlite::memory:"),
            (GENERATOR_LOCALE, "en_US"),
            (GENERATOR_SEED, "42"),
            (DB_AUTO_MIGRATE, "false"),
            (SERVER_WORKERS, "2"),
        ]);
        assert_eq!(configuration.server_port(), 9090);
        assert_eq!(configuration.database_url(), "sqlite::memory:");
        assert_eq!(configuration.generator_locale().unwrap(), Locale::EnUs);
        assert_eq!(configuration.generator_seed(), Some(42));
        assert!(!configuration.auto_migrate());
        assert_eq!(configuration.server_workers(), Some(2));
    }

    #[test]
    fn test_pool_size_out_of_range_uses_default() {
        let oversized = configuration(&[
            (DB_POOL_MAX_CONNECTIONS, "4294967297"),
            (DB_POOL_MIN_CONNECTIONS, "-3"),
        ]);
        assert_eq!(oversized.pool_size(DB_POOL_MAX_CONNECTIONS, 10), 10);
        assert_eq!(oversized.pool_size(DB_POOL_MIN_CONNECTIONS, 1), 1);

        let sized = configuration(&[(DB_POOL_MAX_CONNECTIONS, "25")]);
        assert_eq!(sized.pool_size(DB_POOL_MAX_CONNECTIONS, 10), 25);
    }

    #[test]
    fn test_logging_rotation_key() {
        let configuration = configuration(&[(LOGGING_ROTATION, "never")]);
        assert_eq!(
            configuration.logging_config().rotation,
            crate::startup::LogRotation::Never
        );
        assert_eq!(
            Configuration::default().logging_config().rotation,
            crate::startup::LogRotation::Daily
        );
    }

    #[test]
    fn test_context_path_normalization() {
        assert_eq!(
            configuration(&[(SERVER_CONTEXT_PATH, "api/")]).server_context_path(),
            "/api"
        );
        assert_eq!(
            configuration(&[(SERVER_CONTEXT_PATH, "/")]).server_context_path(),
            ""
        );
        assert_eq!(
            configuration(&[(SERVER_CONTEXT_PATH, "/v1")]).server_context_path(),
            "/v1"
        );
    }

    #[test]
    fn test_invalid_locale_is_rejected() {
        let configuration = configuration(&[(GENERATOR_LOCALE, "xx_XX")]);
        assert!(matches!(
            configuration.generator_locale(),
            Err(PersonaError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let configuration = Configuration::from_cli(Cli {
            config_file: "does/not/exist.yml".to_string(),
            database_url: Some("sqlite://cli.db?mode=rwc".to_string()),
            port: Some(8181),
            seed: Some(9),
        })
        .unwrap();
        assert_eq!(configuration.database_url(), "sqlite://cli.db?mode=rwc");
        assert_eq!(configuration.server_port(), 8181);
        assert_eq!(configuration.generator_seed(), Some(9));
    }
}
