//! Health check endpoint

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use tg_shared::{HealthResponse, HealthStatus};

use crate::state::HealthState;

/// `GET /health`
///
/// 200 while every critical dependency answers, 503 otherwise. The body
/// lists each dependency either way.
pub async fn health_check(state: web::Data<HealthState>) -> HttpResponse {
    let mut services = HashMap::with_capacity(state.checks.len());
    let mut critical_failure = false;

    for check in &state.checks {
        let health = check.check().await;

        if health.status != HealthStatus::Healthy {
            tracing::warn!(
                service = check.name(),
                status = ?health.status,
                message = health.message.as_deref().unwrap_or(""),
                "Dependency not healthy"
            );
        }
        if check.is_critical() && health.status == HealthStatus::Unhealthy {
            critical_failure = true;
        }

        services.insert(check.name().to_string(), health);
    }

    let response = HealthResponse::from_services(services, state.version.clone());
    if critical_failure {
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}
