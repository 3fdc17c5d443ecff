use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a graceful stop may take before a restart gives up.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Launch configuration for a single server.
///
/// This structure defines how to start a specific server process: the
/// command to execute, its arguments, the directory to run it in and any
/// extra environment variables.
///
/// # Examples
///
/// ```
/// use server_runner::config::ServerConfig;
/// use std::collections::HashMap;
///
/// let server_config = ServerConfig {
///     command: "java".to_string(),
///     args: vec!["-jar".to_string(), "server.jar".to_string(), "nogui".to_string()],
///     env: HashMap::new(),
///     working_dir: Some("/srv/survival".into()),
///     stop_timeout_secs: Some(30),
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Command to execute when starting the server.
    /// This can be an absolute path or a command available in the PATH.
    pub command: String,

    /// Command-line arguments to pass to the server.
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variables to set when launching the server.
    /// These will be combined with the current environment.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Directory the server process runs in. Defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Seconds a restart waits for the server to exit after `stop`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_timeout_secs: Option<u64>,
}

impl ServerConfig {
    /// Bounded wait used by restart, falling back to [`DEFAULT_STOP_TIMEOUT`].
    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_STOP_TIMEOUT)
    }
}

/// Registry of known servers.
///
/// Servers keep the order in which they appear in the file, which is the
/// order `server-list` reports them in.
///
/// # JSON Schema
///
/// ```json
/// {
///   "servers": {
///     "survival": {
///       "command": "java",
///       "args": ["-jar", "server.jar", "nogui"],
///       "workingDir": "/srv/survival",
///       "stopTimeoutSecs": 30
///     },
///     "creative": {
///       "command": "./run.sh",
///       "env": { "MEMORY": "2G" }
///     }
///   }
/// }
/// ```
///
/// # Examples
///
/// ```
/// use server_runner::config::Config;
///
/// let config = Config::parse_from_str(r#"{ "servers": { "lobby": { "command": "./lobby.sh" } } }"#).unwrap();
/// assert!(config.servers.contains_key("lobby"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Map of server names to their launch configurations, in definition order.
    #[serde(default)]
    pub servers: IndexMap<String, ServerConfig>,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything
    /// else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if:
    /// * The file cannot be read
    /// * The contents are not valid JSON/YAML
    /// * The document does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigParse(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::parse_from_yaml_str(&content)
        } else {
            Self::parse_from_str(&content)
        }
    }

    /// Parses a configuration from a JSON string.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Parses a configuration from a YAML string.
    pub fn parse_from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse YAML config: {}", e)))
    }
}
