//! # TaskGroup API
//!
//! HTTP edge of the TaskGroup backend: the composition root that wires
//! configuration, storage, mail and the use-case services together, the
//! `/health` endpoint and the mapping from domain errors to HTTP responses.

pub mod app;
pub mod handlers;
pub mod state;
pub mod telemetry;

pub use app::configure;
pub use handlers::error::ApiError;
pub use state::{AppState, DependencyCheck, HealthState};
