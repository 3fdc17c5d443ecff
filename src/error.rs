//! Error handling module for Server Runner.
//!
//! This module defines the error types used throughout the library.
//! Every variant is recoverable: the command dispatcher reports it to the
//! output sink and the invocation returns normally.
//!
//! # Example
//!
//! ```
//! use server_runner::error::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(_) => println!("Operation succeeded"),
//!         Err(Error::NotRunning(name)) => println!("Server '{}' is not running", name),
//!         Err(Error::ServerNotRegistered(name)) => println!("Unknown server '{}'", name),
//!         Err(e) => println!("Other error: {}", e),
//!     }
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in the server-runner library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or parse the server registry file.
    ///
    /// This error occurs when:
    /// - The file cannot be read
    /// - The JSON or YAML is malformed
    /// - Field types are incorrect
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains invalid values.
    ///
    /// This error occurs when:
    /// - A server has an empty command
    /// - A working directory does not exist
    /// - A stop timeout of zero is configured
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// No command is registered under the requested name.
    #[error("Command '{0}' not found. Use 'help' for a list of possible commands.")]
    CommandNotFound(String),

    /// A command with the same canonical name was registered twice.
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),

    /// A handler did not find a flag it needs.
    #[error("Missing required parameter '--{0}'")]
    MissingParameter(String),

    /// The server is already running.
    ///
    /// This error occurs when:
    /// - Attempting to start a server that has a live process
    #[error("Server '{0}' is already running")]
    AlreadyRunning(String),

    /// The server is not running.
    ///
    /// This error occurs when:
    /// - Attempting to stop, kill, restart or message a server without a live process
    #[error("Server '{0}' is not running")]
    NotRunning(String),

    /// The graceful stop during a restart did not finish in time.
    ///
    /// The original process is left untouched and no new instance is started.
    #[error("Server '{server}' did not stop within {timeout:?}; restart aborted. Please try again.")]
    RestartAborted {
        /// Server that was being restarted.
        server: String,
        /// How long the restart waited for the process to exit.
        timeout: Duration,
    },

    /// The server executable could not be launched.
    #[error("Failed to start server process: {0}")]
    ProcessSpawn(String),

    /// I/O with a live server process failed.
    ///
    /// This error occurs when:
    /// - Writing to the server's stdin fails
    /// - Killing or waiting on the process fails
    #[error("Server process error: {0}")]
    Process(String),

    /// Requested server was not found in the registry.
    #[error("Server '{0}' is not registered")]
    ServerNotRegistered(String),

    /// Any other error not covered by the above categories.
    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Stable, kebab-case name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ConfigParse(_) => "config-parse",
            Error::ConfigInvalid(_) => "config-invalid",
            Error::CommandNotFound(_) => "command-not-found",
            Error::DuplicateCommand(_) => "duplicate-command",
            Error::MissingParameter(_) => "missing-parameter",
            Error::AlreadyRunning(_) => "already-running",
            Error::NotRunning(_) => "not-running",
            Error::RestartAborted { .. } => "restart-aborted",
            Error::ProcessSpawn(_) => "process-spawn",
            Error::Process(_) => "process",
            Error::ServerNotRegistered(_) => "server-not-registered",
            Error::Other(_) => "other",
        }
    }
}

/// Result type for server-runner operations.
pub type Result<T> = std::result::Result<T, Error>;
