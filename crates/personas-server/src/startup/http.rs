//! HTTP server setup module.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api, middleware::tracing::TracingMiddleware, model::AppState};

/// Creates and binds the main HTTP server.
///
/// Signal handling is left to [`super::GracefulShutdown`], so actix's own
/// handlers are disabled.
pub fn main_server(
    app_state: Arc<AppState>,
    context_path: String,
    address: String,
    port: u16,
    workers: Option<usize>,
    shutdown_timeout: Duration,
) -> Result<Server, std::io::Error> {
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(TracingMiddleware::new())
            .app_data(web::Data::from(app_state.clone()))
            .service(web::scope(&context_path).configure(api::configure))
    })
    .disable_signals()
    .shutdown_timeout(shutdown_timeout.as_secs());

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    Ok(server.bind((address, port))?.run())
}
