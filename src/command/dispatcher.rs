use crate::command::{Command, CommandRegistry, CommandSpec};
use crate::config::ServerRegistry;
use crate::error::Error;
use crate::output::{Emphasis, OutputSink};
use crate::server::LifecycleController;
use std::sync::Arc;

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    /// All registered commands, for `help`
    pub commands: &'a CommandRegistry,
    /// Server lifecycle operations
    pub controller: &'a LifecycleController,
    /// Known servers
    pub servers: &'a dyn ServerRegistry,
    /// User-facing messages
    pub output: &'a dyn OutputSink,
}

/// How a dispatched command ended.
#[derive(Debug)]
pub enum Outcome {
    /// The handler ran to completion
    Completed,
    /// No command matched the name
    NotFound,
    /// The handler failed; the error has already been reported
    Failed(Error),
}

impl Outcome {
    /// Whether the handler ran to completion
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Runs commands against a [`CommandRegistry`].
///
/// Each invocation is isolated: an unknown name or a failing handler is
/// reported to the output sink and never ends the process.
pub struct CommandDispatcher {
    commands: CommandRegistry,
    controller: Arc<LifecycleController>,
    servers: Arc<dyn ServerRegistry>,
    output: Arc<dyn OutputSink>,
}

impl CommandDispatcher {
    /// Create a dispatcher over `commands`
    pub fn new(
        commands: CommandRegistry,
        controller: Arc<LifecycleController>,
        servers: Arc<dyn ServerRegistry>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            commands,
            controller,
            servers,
            output,
        }
    }

    /// Registered commands
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Controller the handlers act on
    pub fn controller(&self) -> &Arc<LifecycleController> {
        &self.controller
    }

    /// Resolve `command`, run its handler and report any failure.
    #[tracing::instrument(skip(self, command), fields(command = %command.name()))]
    pub async fn execute(&self, command: &Command) -> Outcome {
        let Some(spec) = self.commands.resolve(command.name()) else {
            let error = Error::CommandNotFound(command.name().to_string());
            tracing::debug!(kind = error.kind(), "Unknown command");
            self.output.write(&error.to_string(), Emphasis::Warning);
            return Outcome::NotFound;
        };

        let ctx = CommandContext {
            commands: &self.commands,
            controller: self.controller.as_ref(),
            servers: self.servers.as_ref(),
            output: self.output.as_ref(),
        };

        tracing::debug!(resolved = %spec.name(), "Running command");
        match spec.handler().handle(&ctx, command).await {
            Ok(()) => Outcome::Completed,
            Err(error) => {
                self.report(spec, &error);
                Outcome::Failed(error)
            }
        }
    }

    fn report(&self, spec: &CommandSpec, error: &Error) {
        tracing::warn!(command = %spec.name(), kind = error.kind(), error = %error, "Command failed");

        let message = match error {
            Error::MissingParameter(_) => format!("{}. Usage: {}", error, spec.usage()),
            _ => error.to_string(),
        };
        self.output.write(&message, Emphasis::Error);
    }
}
