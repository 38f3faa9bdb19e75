//! Service entry-point: loads settings, runs migrations, wires adapters and
//! serves the dashboard API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shems::domain::ports::LockStore;
use shems::inbound::http::health::HealthState;
use shems::outbound::crypto::{Argon2CredentialHasher, Argon2Cost};
use shems::outbound::lock::{InMemoryLockStore, RedisLockStore};
use shems::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use shems::settings::AppSettings;

use server::{Adapters, ServerConfig, build_http_state, create_server};

async fn lock_store(settings: &AppSettings) -> io::Result<Arc<dyn LockStore>> {
    match settings.redis_url() {
        Some(url) => {
            let store = RedisLockStore::connect(url).await.map_err(io::Error::other)?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("no Redis URL configured; advisory locks are process-local");
            Ok(Arc::new(InMemoryLockStore::new()))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let database_url = settings
        .database_url()
        .ok_or_else(|| io::Error::other("SHEMS_DATABASE_URL must be set"))?
        .to_owned();

    run_pending_migrations(&database_url)
        .await
        .map_err(io::Error::other)?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(io::Error::other)?;

    let hasher = Argon2CredentialHasher::new(Argon2Cost {
        memory_kib: settings.password_memory_kib(),
        iterations: settings.password_iterations(),
        ..Argon2Cost::default()
    })
    .map_err(io::Error::other)?;

    let http_state = build_http_state(Adapters {
        pool,
        lock_store: lock_store(&settings).await?,
        lock_ttl: settings.lock_ttl(),
        hasher,
    });

    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(bind_addr).with_cors_origin(settings.cors_allowed_origin());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
