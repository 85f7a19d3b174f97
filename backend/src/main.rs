//! Service entry-point: loads settings, prepares storage and messaging,
//! starts the expiry scanner and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use medcycle::domain::{NotificationDispatcher, TokioSleeper};
use medcycle::inbound::http::health::HealthState;
use medcycle::outbound::credentials::Argon2CredentialHasher;
use medcycle::outbound::messaging::{TwilioCredentials, TwilioHttpSender};
use medcycle::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use medcycle::settings::Settings;

use server::{
    ServerConfig, ServiceDependencies, build_expiry_scanner, build_http_state, create_server,
};

fn build_dispatcher(settings: &Settings) -> color_eyre::Result<NotificationDispatcher> {
    let Some(messaging) = settings.messaging()? else {
        warn!("messaging credentials incomplete; notifications will be skipped");
        return Ok(NotificationDispatcher::disabled());
    };
    let sender = TwilioHttpSender::new(
        &messaging.api_base,
        TwilioCredentials {
            account_sid: messaging.account_sid,
            auth_token: messaging.auth_token,
            from_number: messaging.from_number,
        },
        messaging.timeout,
    )?;
    info!(api_base = %messaging.api_base, "messaging enabled");
    Ok(NotificationDispatcher::new(Arc::new(sender)))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?;

    run_pending_migrations(database_url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("database pool unavailable")?;

    let deps = ServiceDependencies::with_diesel(
        &pool,
        Arc::new(Argon2CredentialHasher::default()),
        Arc::new(build_dispatcher(&settings)?),
        Arc::new(DefaultClock),
    );
    let http_state = build_http_state(&deps);
    let scanner = build_expiry_scanner(&deps, settings.scan_interval()).spawn(Arc::new(TokioSleeper));

    let bind_addr = settings.bind_addr()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        http_state,
        ServerConfig::new(bind_addr),
    )?;
    info!(%bind_addr, "listening");

    let served = server.await;
    health_state.mark_unhealthy();
    let cycles = scanner.stop().await.wrap_err("expiry scanner task failed")?;
    info!(cycles, "shutdown complete");
    served.wrap_err("HTTP server failed")
}
