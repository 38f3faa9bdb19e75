//! Service configuration loaded via OrthoConfig.
//!
//! Values layer CLI flags over `SHEMS_*` environment variables over an
//! optional config file. Every field except the database URL has a default.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8000);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOCK_TTL_SECS: u64 = 3600;
const DEFAULT_PASSWORD_MEMORY_KIB: u32 = 65_536;
const DEFAULT_PASSWORD_ITERATIONS: u32 = 3;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHEMS")]
pub struct AppSettings {
    /// PostgreSQL connection URL. Required.
    pub database_url: Option<String>,
    /// Redis URL for the advisory lock; the in-process store is used when unset.
    pub redis_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Advisory lock expiry in seconds.
    pub lock_ttl_secs: Option<u64>,
    /// Argon2 memory cost in KiB.
    pub password_memory_kib: Option<u32>,
    /// Argon2 iteration count.
    pub password_iterations: Option<u32>,
    /// Origin allowed by the CORS policy.
    pub cors_allowed_origin: Option<String>,
}

impl AppSettings {
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs.unwrap_or(DEFAULT_LOCK_TTL_SECS))
    }

    pub fn password_memory_kib(&self) -> u32 {
        self.password_memory_kib
            .unwrap_or(DEFAULT_PASSWORD_MEMORY_KIB)
    }

    pub fn password_iterations(&self) -> u32 {
        self.password_iterations
            .unwrap_or(DEFAULT_PASSWORD_ITERATIONS)
    }

    pub fn cors_allowed_origin(&self) -> &str {
        self.cors_allowed_origin
            .as_deref()
            .unwrap_or(DEFAULT_CORS_ORIGIN)
    }
}
