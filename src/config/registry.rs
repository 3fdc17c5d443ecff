use crate::config::{Config, ServerConfig};
use crate::error::{Error, Result};

/// Source of known servers and their launch configuration.
///
/// The lifecycle controller and the `server-list` command only ever see
/// servers through this trait, so tests can substitute their own registry.
pub trait ServerRegistry: Send + Sync {
    /// Names of every known server, in definition order.
    fn server_names(&self) -> Vec<String>;

    /// Launch configuration for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServerNotRegistered`] when no server has that name.
    fn resolve_config(&self, name: &str) -> Result<ServerConfig>;
}

impl ServerRegistry for Config {
    fn server_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    fn resolve_config(&self, name: &str) -> Result<ServerConfig> {
        self.servers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ServerNotRegistered(name.to_string()))
    }
}
