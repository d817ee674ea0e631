pub mod error;
pub mod health;

pub use error::{json_error_handler, not_found, status_for, ApiError};
pub use health::health_check;
