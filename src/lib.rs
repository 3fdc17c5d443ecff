/*!
 # Server Runner

 A Rust library and command-line tool for controlling long-running server
 processes, such as game servers run behind a wrapper shell.

 ## Overview

 Server Runner provides functionality to:
 - Start a configured server in its working directory and forward its output
 - Send lines of text to a running server's console input
 - Stop a server gracefully, or kill it outright
 - Restart a server with a bounded wait for the graceful stop
 - Resolve user commands such as `force-stop --server survival` to handlers

 ## Basic Usage

 ```no_run
 use server_runner::{Config, LifecycleController, Result};
 use server_runner::output::ConsoleSink;
 use std::sync::Arc;

 #[tokio::main]
 async fn main() -> Result<()> {
     // Load the server registry
     let config = Config::from_file("servers.json")?;
     let controller = LifecycleController::new(Arc::new(config), Arc::new(ConsoleSink::new()));

     // Start a server and talk to it
     let info = controller.start("survival").await?;
     println!("Started pid {}", info.pid);
     controller.write_line("survival", "say Hello from the console").await?;

     // Ask it to stop
     controller.stop("survival").await?;

     Ok(())
 }
 ```

 ## Features

 - **Lifecycle Control**: start, stop, force-stop and restart servers
 - **Command Dispatch**: an explicit registry of named commands with usage strings
 - **Configuration**: JSON or YAML server registries
 - **Error Handling**: every failure is reported once and never crashes the runner
 - **Async Support**: built on tokio
*/

pub mod command;
pub mod config;
pub mod error;
pub mod output;
pub mod server;

pub use command::{Command, CommandDispatcher, CommandRegistry, Outcome, builtin_commands};
pub use config::{Config, ServerConfig, ServerRegistry};
pub use error::{Error, Result};
pub use server::{LifecycleController, ProcessInfo, ServerStatus};
