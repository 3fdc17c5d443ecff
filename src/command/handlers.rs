//! Built-in commands.

use crate::command::{Command, CommandContext, CommandHandler, CommandRegistry};
use crate::error::{Error, Result};
use crate::output::Emphasis;
use crate::server::ServerStatus;
use async_trait::async_trait;

const HELP_TITLE: &str = "Server Runner Commands:";
const NAME_COLUMN: usize = 15;

/// Registry holding every built-in command, in the order `help` lists them.
pub fn builtin_commands() -> Result<CommandRegistry> {
    let mut commands = CommandRegistry::new();
    commands.register("help", Help, "Lists every command and how to use it.", "help")?;
    commands.register("start", Start, "Starts a server.", "start --server <name>")?;
    commands.register(
        "server list",
        ServerList,
        "Lists all known servers and whether they are online.",
        "server-list",
    )?;
    commands.register(
        "send message",
        SendMessage,
        "Writes a message to a server's console input.",
        "send-message --server <name> --message <text...>",
    )?;
    commands.register(
        "stop",
        Stop,
        "Asks a server to shut down gracefully.",
        "stop --server <name>",
    )?;
    commands.register(
        "force stop",
        ForceStop,
        "Kills a server's process immediately.",
        "force-stop --server <name>",
    )?;
    commands.register(
        "restart",
        Restart,
        "Stops a server gracefully, then starts it again.",
        "restart --server <name>",
    )?;
    Ok(commands)
}

fn required<'c>(command: &'c Command, field: &str) -> Result<&'c str> {
    match command.value(field) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingParameter(field.to_string())),
    }
}

/// `help`
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn handle(&self, ctx: &CommandContext<'_>, _command: &Command) -> Result<()> {
        ctx.output.write(HELP_TITLE, Emphasis::Heading);
        ctx.output.write(&"-".repeat(HELP_TITLE.len()), Emphasis::Muted);

        for spec in ctx.commands.list_all() {
            ctx.output.write(
                &format!("- {:<width$}| {}", spec.name(), spec.description(), width = NAME_COLUMN),
                Emphasis::Plain,
            );
            ctx.output
                .write(&format!("> Usage: {}", spec.usage()), Emphasis::Muted);
            ctx.output.write("", Emphasis::Plain);
        }
        Ok(())
    }
}

/// `start --server <name>`
pub struct Start;

#[async_trait]
impl CommandHandler for Start {
    async fn handle(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<()> {
        let server = required(command, "server")?;
        let info = ctx.controller.start(server).await?;
        ctx.output.write(
            &format!("Started server '{}' (pid {}).", server, info.pid),
            Emphasis::Success,
        );
        Ok(())
    }
}

/// `server-list`
pub struct ServerList;

#[async_trait]
impl CommandHandler for ServerList {
    async fn handle(&self, ctx: &CommandContext<'_>, _command: &Command) -> Result<()> {
        ctx.output.write("Servers:", Emphasis::Heading);

        let names = ctx.servers.server_names();
        if names.is_empty() {
            ctx.output.write("No servers configured.", Emphasis::Muted);
            return Ok(());
        }

        for name in names {
            let status = ctx.controller.status(&name).await;
            let emphasis = match status {
                ServerStatus::Online => Emphasis::Success,
                ServerStatus::Offline => Emphasis::Muted,
            };
            ctx.output.write(&format!("> {} | {}", name, status), emphasis);
        }
        Ok(())
    }
}

/// `send-message --server <name> --message <text...>`
pub struct SendMessage;

#[async_trait]
impl CommandHandler for SendMessage {
    async fn handle(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<()> {
        let server = required(command, "server")?;
        let message = command
            .text_after("message")
            .filter(|message| !message.trim().is_empty())
            .ok_or_else(|| Error::MissingParameter("message".to_string()))?;

        ctx.controller.write_line(server, &message).await?;
        ctx.output.write(
            &format!("Sent message to '{}': {}", server, message),
            Emphasis::Success,
        );
        Ok(())
    }
}

/// `stop --server <name>`
pub struct Stop;

#[async_trait]
impl CommandHandler for Stop {
    async fn handle(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<()> {
        let server = required(command, "server")?;
        ctx.controller.stop(server).await?;
        ctx.output.write(
            &format!("Sent stop request to server '{}'.", server),
            Emphasis::Success,
        );
        Ok(())
    }
}

/// `force-stop --server <name>`
pub struct ForceStop;

#[async_trait]
impl CommandHandler for ForceStop {
    async fn handle(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<()> {
        let server = required(command, "server")?;
        ctx.controller.force_stop(server).await?;
        ctx.output
            .write(&format!("Killed server '{}'.", server), Emphasis::Warning);
        Ok(())
    }
}

/// `restart --server <name>`
pub struct Restart;

#[async_trait]
impl CommandHandler for Restart {
    async fn handle(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<()> {
        let server = required(command, "server")?;
        // A stopped server must not get a "Stopping" line.
        if !ctx.controller.is_running(server).await {
            return Err(Error::NotRunning(server.to_string()));
        }

        ctx.output
            .write(&format!("Stopping server '{}'.", server), Emphasis::Warning);
        let info = ctx.controller.restart(server).await?;
        ctx.output.write(
            &format!("Started server '{}' (pid {}).", server, info.pid),
            Emphasis::Success,
        );
        Ok(())
    }
}
