//! Configuration module for Server Runner.
//!
//! This module handles parsing, validation, and lookup of the server
//! registry: the set of known servers and how to launch each one. Registries
//! are loaded from JSON or YAML files.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use server_runner::config::Config;
//!
//! let config = Config::from_file("servers.json").unwrap();
//! println!("Loaded configuration with {} servers", config.servers.len());
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use server_runner::config::{Config, ServerConfig, ServerRegistry};
//!
//! let mut config = Config::default();
//! config.servers.insert(
//!     "lobby".to_string(),
//!     ServerConfig {
//!         command: "./lobby.sh".to_string(),
//!         ..Default::default()
//!     },
//! );
//! assert_eq!(config.server_names(), vec!["lobby".to_string()]);
//! ```
mod parser;
mod registry;
pub mod validator;

pub use parser::{Config, DEFAULT_STOP_TIMEOUT, ServerConfig};
pub use registry::ServerRegistry;
pub use validator::validate_config;
