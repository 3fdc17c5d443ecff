//! Server management module for Server Runner.
//!
//! This module handles the lifecycle and process management of servers:
//! spawning them, writing to their stdin, waiting for them to exit and
//! killing them. All public lifecycle operations are instrumented with
//! `tracing` spans.
//!
//! # Components
//!
//! * `lifecycle` - The controller owning every live server process
//! * `process` - One spawned server process and its pipes
//! * `forward` - Background copying of server output to the output sink
//!
//! # Examples
//!
//! ```no_run
//! use server_runner::config::Config;
//! use server_runner::output::ConsoleSink;
//! use server_runner::server::LifecycleController;
//! use std::sync::Arc;
//!
//! # async fn run() -> server_runner::Result<()> {
//! let config = Config::from_file("servers.json")?;
//! let controller = LifecycleController::new(Arc::new(config), Arc::new(ConsoleSink::new()));
//!
//! let info = controller.start("survival").await?;
//! println!("started pid {}", info.pid);
//!
//! controller.write_line("survival", "say Restarting in 10 seconds").await?;
//! controller.restart("survival").await?;
//! # Ok(())
//! # }
//! ```

mod forward;
pub mod lifecycle;
mod process;

pub use lifecycle::{LifecycleController, STOP_TOKEN, ServerStatus};
pub use process::{InstanceId, ProcessHandle, ProcessInfo};
