//! HTTP server configuration object.

use std::net::SocketAddr;

/// Listener and CORS settings for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_allowed_origin: String,
}

impl ServerConfig {
    /// Construct a configuration that only allows the local dashboard origin.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cors_allowed_origin: "http://localhost:3000".to_owned(),
        }
    }

    /// Replace the single origin allowed by the CORS policy.
    #[must_use]
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_allowed_origin = origin.into();
        self
    }
}
