use anyhow::Context;
use clap::Parser;
use server_runner::command::{Command, CommandDispatcher, builtin_commands};
use server_runner::config::{Config, ServerRegistry, validate_config};
use server_runner::output::{ConsoleSink, Emphasis, OutputSink};
use server_runner::server::LifecycleController;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

/// Run one server-runner command.
///
/// Every invocation starts with no live servers, so lifecycle commands only
/// act on servers started by the same invocation. `start` stays attached
/// until the server exits; Ctrl-C detaches and leaves it running without
/// its output pipes.
#[derive(Parser, Debug)]
#[command(name = "server-runner", version, about, long_about)]
struct Cli {
    /// Server registry file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long, env = "SERVER_RUNNER_CONFIG", default_value = "servers.json")]
    config: PathBuf,

    /// The command and its arguments, for example `start --server survival`.
    #[arg(
        value_name = "COMMAND",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs stay quiet unless RUST_LOG asks for more.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let output: Arc<dyn OutputSink> = Arc::new(ConsoleSink::new());

    let tokens = if cli.command.is_empty() {
        vec!["help".to_string()]
    } else {
        cli.command
    };
    let command = Command::from_tokens(tokens).context("no command given")?;

    let config = load_config(&cli.config, output.as_ref());
    let servers: Arc<dyn ServerRegistry> = Arc::new(config);
    let controller = Arc::new(LifecycleController::new(
        Arc::clone(&servers),
        Arc::clone(&output),
    ));

    let commands = builtin_commands().context("failed to register built-in commands")?;
    let dispatcher = CommandDispatcher::new(commands, Arc::clone(&controller), servers, output);

    let outcome = dispatcher.execute(&command).await;
    tracing::debug!(?outcome, "Command finished");

    stay_attached(&controller).await;
    Ok(())
}

/// A missing or broken registry still lets `help` run, so it only warns.
fn load_config(path: &Path, output: &dyn OutputSink) -> Config {
    let config = match Config::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Using an empty server registry");
            output.write(
                &format!("Warning: no servers loaded from {}: {}", path.display(), e),
                Emphasis::Warning,
            );
            return Config::default();
        }
    };

    if let Err(e) = validate_config(&config) {
        output.write(&format!("Warning: {}", e), Emphasis::Warning);
    }
    config
}

/// Keeps forwarding output of servers started by this invocation until they
/// exit. Ctrl-C stops waiting without touching them; they keep running in
/// their own process groups, but their output pipes close with the runner.
async fn stay_attached(controller: &LifecycleController) {
    for name in controller.running_servers().await {
        tokio::select! {
            result = controller.wait_until_exited(&name) => match result {
                Ok(Some(status)) => tracing::info!(server = %name, %status, "Server exited"),
                Ok(None) => {}
                Err(e) => tracing::error!(server = %name, error = %e, "Failed to wait for server"),
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Detaching from running servers");
                return;
            }
        }
    }
}
