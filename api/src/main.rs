use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;

use tg_api::state::{
    mail_service, AppState, DatabaseCheck, DependencyCheck, HealthState, MailCheck,
};
use tg_api::{configure, telemetry};
use tg_infra::database::DatabasePool;
use tg_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = tg_infra::load_dotenv();
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    match dotenv {
        Ok(Some(path)) => info!(path = %path.display(), "Loaded environment file"),
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Starting TaskGroup API server"
    );

    let warnings = config.production_warnings();
    if config.environment.is_production() && !warnings.is_empty() {
        for warning in &warnings {
            error!("{}", warning);
        }
        anyhow::bail!("refusing to start in production with unsafe configuration");
    }
    for warning in &warnings {
        warn!("{}", warning);
    }

    let pool = DatabasePool::new(config.database.clone()).await?;
    if config.database.run_migrations {
        pool.run_migrations().await?;
    }

    let mail = mail_service(&config)?;
    info!(provider = mail.provider_name(), "Mail service ready");

    let state = web::Data::new(AppState::build(&config, &pool, mail.clone()));
    let checks: Vec<Arc<dyn DependencyCheck>> = vec![
        Arc::new(DatabaseCheck::new(pool.clone())),
        Arc::new(MailCheck::new(mail)),
    ];
    let health = web::Data::new(HealthState::new(checks));

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server listening");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(health.clone())
            .configure(configure)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    info!("Server stopped, closing database pool");
    pool.close().await;
    Ok(())
}
