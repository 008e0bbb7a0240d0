// Metrics module for observability
// Provides counters and histograms for HTTP traffic and persona storage operations

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize all metric descriptions
/// Should be called once at application startup, after the recorder is installed
pub fn init_metrics() {
    // HTTP request metrics
    describe_counter!(
        "http_requests_total",
        "Total number of HTTP requests received"
    );
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Database metrics
    describe_histogram!(
        "db_query_duration_seconds",
        "Database query duration in seconds"
    );
    describe_counter!("db_queries_total", "Total number of database queries");
    describe_counter!(
        "db_query_errors_total",
        "Total number of database query errors"
    );

    // Persona metrics
    describe_counter!("personas_created_total", "Total number of personas created");
    describe_counter!("personas_deleted_total", "Total number of personas deleted");

    tracing::info!("Metrics initialized");
}

/// Install the Prometheus recorder as the global metrics recorder.
///
/// Returns `None` when a recorder is already installed.
pub fn install_prometheus_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method.to_string(), "path" => path.to_string()).record(duration_secs);

    if status >= 400 {
        counter!("http_requests_errors_total", "method" => method.to_string(), "path" => path.to_string(), "status" => status.to_string()).increment(1);
    }
}

/// Record a database query
pub fn record_db_query(operation: &str, table: &str, duration_secs: f64, success: bool) {
    counter!("db_queries_total", "operation" => operation.to_string(), "table" => table.to_string()).increment(1);
    histogram!("db_query_duration_seconds", "operation" => operation.to_string(), "table" => table.to_string()).record(duration_secs);

    if !success {
        counter!("db_query_errors_total", "operation" => operation.to_string(), "table" => table.to_string()).increment(1);
    }
}

/// Record created personas (single create or bulk populate)
pub fn record_personas_created(source: &str, count: u64) {
    counter!("personas_created_total", "source" => source.to_string()).increment(count);
}

/// Record deleted personas (single delete or reset)
pub fn record_personas_deleted(source: &str, count: u64) {
    counter!("personas_deleted_total", "source" => source.to_string()).increment(count);
}
