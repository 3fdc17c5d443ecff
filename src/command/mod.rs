//! Command resolution and dispatch.
//!
//! A [`Command`] is the parsed form of one invocation: a name plus the raw
//! argument tokens. The [`CommandRegistry`] maps names to handlers, and the
//! [`CommandDispatcher`] runs the matching handler and reports whatever goes
//! wrong.
//!
//! # Examples
//!
//! ```no_run
//! use server_runner::command::{Command, CommandDispatcher, builtin_commands};
//! use server_runner::config::{Config, ServerRegistry};
//! use server_runner::output::{ConsoleSink, OutputSink};
//! use server_runner::server::LifecycleController;
//! use std::sync::Arc;
//!
//! # async fn run() -> server_runner::Result<()> {
//! let servers: Arc<dyn ServerRegistry> = Arc::new(Config::from_file("servers.json")?);
//! let output: Arc<dyn OutputSink> = Arc::new(ConsoleSink::new());
//! let controller = Arc::new(LifecycleController::new(servers.clone(), output.clone()));
//! let dispatcher = CommandDispatcher::new(builtin_commands()?, controller, servers, output);
//!
//! let command = Command::from_tokens(["start", "--server", "survival"]).unwrap();
//! dispatcher.execute(&command).await;
//! # Ok(())
//! # }
//! ```
mod dispatcher;
pub mod handlers;
mod registry;

pub use dispatcher::{CommandContext, CommandDispatcher, Outcome};
pub use handlers::builtin_commands;
pub use registry::{CommandHandler, CommandRegistry, CommandSpec, canonical_name};

use std::collections::HashMap;

/// One parsed invocation.
///
/// Flags are `--name value` pairs taken from the arguments. A flag directly
/// followed by another flag (or by nothing) has an empty value, and a
/// repeated flag keeps its last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    arguments: Vec<String>,
    flags: HashMap<String, String>,
}

impl Command {
    /// Build a command from its name and the tokens that followed it.
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        let flags = parse_flags(&arguments);
        Self {
            name: name.into(),
            arguments,
            flags,
        }
    }

    /// Build a command from raw tokens, the first being the name.
    ///
    /// Returns `None` when there are no tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let name = tokens.next()?;
        Some(Self::new(name, tokens.collect()))
    }

    /// Name as typed by the user
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw argument tokens, in order
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Value of `--field`, if the flag was given.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.flags.get(field).map(String::as_str)
    }

    /// Every token after the first `--flag`, joined with single spaces.
    ///
    /// This is how multi-word values such as chat messages are read.
    pub fn text_after(&self, flag: &str) -> Option<String> {
        let marker = format!("--{}", flag);
        let start = self.arguments.iter().position(|token| *token == marker)?;
        Some(self.arguments[start + 1..].join(" "))
    }
}

fn parse_flags(arguments: &[String]) -> HashMap<String, String> {
    let mut flags = HashMap::new();
    let mut tokens = arguments.iter().peekable();

    while let Some(token) = tokens.next() {
        let Some(key) = token.strip_prefix("--") else {
            continue;
        };
        if key.is_empty() {
            continue;
        }

        let value = match tokens.peek() {
            Some(next) if !next.starts_with("--") => {
                let value = next.to_string();
                tokens.next();
                value
            }
            _ => String::new(),
        };
        flags.insert(key.to_string(), value);
    }

    flags
}
