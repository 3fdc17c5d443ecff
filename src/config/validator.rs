use crate::config::{Config, ServerConfig};
use crate::error::{Error, Result};

/// Validates a single server's launch configuration
pub fn validate_server_config(name: &str, config: &ServerConfig) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::ConfigInvalid("Server names must not be empty".to_string()));
    }

    if config.command.trim().is_empty() {
        return Err(Error::ConfigInvalid(format!(
            "Server '{}' has empty command",
            name
        )));
    }

    if config.stop_timeout_secs == Some(0) {
        return Err(Error::ConfigInvalid(format!(
            "Server '{}' has a stop timeout of zero seconds",
            name
        )));
    }

    if let Some(dir) = &config.working_dir {
        if !dir.is_dir() {
            return Err(Error::ConfigInvalid(format!(
                "Server '{}' has a working directory that does not exist: {}",
                name,
                dir.display()
            )));
        }
    }

    Ok(())
}

/// Full configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    if config.servers.is_empty() {
        return Err(Error::ConfigInvalid("No servers configured".to_string()));
    }

    for (name, server) in &config.servers {
        validate_server_config(name, server)?;
    }

    Ok(())
}
