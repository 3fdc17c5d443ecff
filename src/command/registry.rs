use crate::command::{Command, CommandContext};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Code run for one command name.
///
/// Handlers validate their own parameters and report progress through
/// `ctx.output`. Returning an error hands it to the dispatcher, which
/// reports it once and carries on.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    async fn handle(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<()>;
}

/// Normalises a command name for lookup.
///
/// Lower-cases it and treats `-`, `_` and whitespace as the same word
/// separator, so `Force-Stop`, `force_stop` and `Force Stop` all become
/// `force stop`.
pub fn canonical_name(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A registered command.
#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    handler: Arc<dyn CommandHandler>,
    description: String,
    usage: String,
}

impl CommandSpec {
    /// Canonical name, lower-case and space separated
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handler bound to the name
    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }

    /// One-line description shown by `help`
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Usage string shown by `help` and on missing parameters
    pub fn usage(&self) -> &str {
        &self.usage
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Table of commands, in registration order.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCommand`] when a command with the same
    /// canonical name exists.
    pub fn register(
        &mut self,
        name: &str,
        handler: impl CommandHandler + 'static,
        description: impl Into<String>,
        usage: impl Into<String>,
    ) -> Result<()> {
        let name = canonical_name(name);
        if name.is_empty() {
            return Err(Error::Other("Command names must not be empty".to_string()));
        }
        if self.index.contains_key(&name) {
            return Err(Error::DuplicateCommand(name));
        }

        tracing::trace!(command = %name, "Registering command");
        self.index.insert(name.clone(), self.specs.len());
        self.specs.push(CommandSpec {
            name,
            handler: Arc::new(handler),
            description: description.into(),
            usage: usage.into(),
        });
        Ok(())
    }

    /// Look up a command by any spelling of its name.
    pub fn resolve(&self, name: &str) -> Option<&CommandSpec> {
        self.index
            .get(&canonical_name(name))
            .map(|&position| &self.specs[position])
    }

    /// All commands, in registration order
    pub fn list_all(&self) -> &[CommandSpec] {
        &self.specs
    }
}
