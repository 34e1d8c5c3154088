//! Shared application state for the server.
//!
//! Built once at startup and handed to every handler through `Arc`. Nothing
//! in here changes after construction.

use std::net::IpAddr;
use std::sync::Arc;

use crate::introspect::Introspector;
use crate::navigator::Navigator;
use crate::render::Renderers;

/// Server configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

/// Shared application state.
pub struct AppState {
    pub navigator: Navigator,
    pub renderers: Renderers,
}

impl AppState {
    pub fn new(introspector: Arc<dyn Introspector>) -> Self {
        Self {
            navigator: Navigator::new(introspector),
            renderers: Renderers::new(),
        }
    }
}
