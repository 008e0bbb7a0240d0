//! Common constants for the Personas server
//!
//! Configuration property keys, their defaults, and user-facing messages.

// ============================================================================
// Server properties
// ============================================================================

pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const SERVER_CONTEXT_PATH: &str = "server.context_path";
pub const SERVER_WORKERS: &str = "server.workers";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// ============================================================================
// Database properties
// ============================================================================

pub const DB_URL: &str = "db.url";
pub const DB_AUTO_MIGRATE: &str = "db.auto_migrate";
pub const DB_POOL_MAX_CONNECTIONS: &str = "db.pool.max_connections";
pub const DB_POOL_MIN_CONNECTIONS: &str = "db.pool.min_connections";
pub const DB_POOL_CONNECT_TIMEOUT: &str = "db.pool.connect_timeout";
pub const DB_POOL_ACQUIRE_TIMEOUT: &str = "db.pool.acquire_timeout";
pub const DB_POOL_IDLE_TIMEOUT: &str = "db.pool.idle_timeout";
pub const DB_POOL_MAX_LIFETIME: &str = "db.pool.max_lifetime";
pub const DB_POOL_SQLX_LOGGING: &str = "db.pool.sqlx_logging";

pub const DEFAULT_DB_URL: &str = "sqlite://personas.db?mode=rwc";

// ============================================================================
// Synthetic data generator properties
// ============================================================================

pub const GENERATOR_LOCALE: &str = "generator.locale";
pub const GENERATOR_SEED: &str = "generator.seed";

// ============================================================================
// Logging & lifecycle properties
// ============================================================================

pub const LOGGING_DIR: &str = "logging.dir";
pub const LOGGING_CONSOLE: &str = "logging.console";
pub const LOGGING_FILE: &str = "logging.file";
pub const LOGGING_LEVEL: &str = "logging.level";
pub const LOGGING_ROTATION: &str = "logging.rotation";

pub const SHUTDOWN_TIMEOUT_SECS: &str = "shutdown.timeout_secs";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Environment
// ============================================================================

pub const ENV_PREFIX: &str = "PERSONAS";
pub const ENV_SEPARATOR: &str = "__";
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

// ============================================================================
// HTTP surface
// ============================================================================

pub const PERSONAS_BASE_PATH: &str = "/personas";

pub const POPULATE_OUT_OF_RANGE_MESSAGE: &str =
    "La cantidad debe ser mayor a 0 y menor o igual a 1000.";
pub const RESET_MESSAGE: &str = "Base de datos limpiada. Se eliminaron todos los registros.";

pub fn populate_message(count: u64) -> String {
    format!("Se insertaron {} registros ficticios en la base de datos.", count)
}
