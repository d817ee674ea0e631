//! Type definitions shared between the HTTP edge and the infrastructure
//!
//! - `response` - health check responses

pub mod response;

pub use response::{HealthResponse, HealthStatus, ServiceHealth};
