//! Route table
//!
//! Shared by the binary and the endpoint tests so both serve the same app.

use actix_web::web;

use crate::handlers::{health_check, json_error_handler, not_found};

/// Register routes, the JSON error envelope and the 404 fallback
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .default_service(web::route().to(not_found));
}
