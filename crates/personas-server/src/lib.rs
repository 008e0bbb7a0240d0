// Main library module for Personas - a CRUD, search and statistics service for people records

// Module declarations
pub mod api; // API handlers and models
pub mod error; // Error handling and types
pub mod metrics; // Metrics and observability
pub mod middleware; // HTTP middleware
pub mod model; // Configuration, application state and response types
pub mod service; // Business services
pub mod startup; // Application startup utilities

pub use model::{AppState, Configuration};
