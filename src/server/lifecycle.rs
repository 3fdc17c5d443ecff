use crate::config::ServerRegistry;
use crate::error::{Error, Result};
use crate::output::OutputSink;
use crate::server::process::{ProcessHandle, ProcessInfo};
use std::collections::HashMap;
use std::fmt;
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Line written to a server's stdin to ask it to shut down.
pub const STOP_TOKEN: &str = "stop";

/// Observed state of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// A live process exists for the server
    Online,
    /// No live process
    Offline,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Online => write!(f, "Online"),
            ServerStatus::Offline => write!(f, "Offline"),
        }
    }
}

type LiveTable = HashMap<String, ProcessHandle>;

/// Starts, signals and stops server processes.
///
/// Owns the table of live processes, at most one per server name. Every
/// operation that checks the table and then changes it does so under a
/// single lock, so concurrent callers cannot start the same server twice.
/// Dropping the controller leaves child processes running.
pub struct LifecycleController {
    /// Known servers
    servers: Arc<dyn ServerRegistry>,
    /// Where forwarded server output goes
    output: Arc<dyn OutputSink>,
    /// Live processes by server name
    live: Mutex<LiveTable>,
}

impl LifecycleController {
    /// Create a controller with no live processes
    pub fn new(servers: Arc<dyn ServerRegistry>, output: Arc<dyn OutputSink>) -> Self {
        Self {
            servers,
            output,
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `name` has a live process.
    ///
    /// A process that exited since the last look is dropped from the table
    /// before answering.
    #[tracing::instrument(skip(self))]
    pub async fn is_running(&self, name: &str) -> bool {
        let mut live = self.live.lock().await;
        reconcile(&mut live, name)
    }

    /// [`ServerStatus`] of `name`, reconciled like [`Self::is_running`].
    pub async fn status(&self, name: &str) -> ServerStatus {
        if self.is_running(name).await {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        }
    }

    /// Snapshot of the live process for `name`, if any.
    pub async fn process_info(&self, name: &str) -> Option<ProcessInfo> {
        let mut live = self.live.lock().await;
        if !reconcile(&mut live, name) {
            return None;
        }
        live.get(name).map(|handle| handle.info().clone())
    }

    /// Names of all servers with a live process, sorted.
    pub async fn running_servers(&self) -> Vec<String> {
        let mut live = self.live.lock().await;
        let mut names: Vec<String> = live.keys().cloned().collect();
        names.retain(|name| reconcile(&mut live, name));
        names.sort();
        names
    }

    /// Start the server called `name`.
    ///
    /// Blocks only for the spawn itself. Output is forwarded in the
    /// background for as long as the process lives.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self, name: &str) -> Result<ProcessInfo> {
        let mut live = self.live.lock().await;
        if reconcile(&mut live, name) {
            tracing::debug!("Server already running");
            return Err(Error::AlreadyRunning(name.to_string()));
        }

        self.spawn_into(&mut live, name)
    }

    /// Write one line to the server's stdin without waiting for any reply.
    #[tracing::instrument(skip(self, text))]
    pub async fn write_line(&self, name: &str, text: &str) -> Result<()> {
        let mut live = self.live.lock().await;
        let handle = running_handle(&mut live, name)?;
        handle.write_line(text).await?;
        tracing::debug!(bytes = text.len(), "Wrote line to server stdin");
        Ok(())
    }

    /// Ask the server to shut down by writing [`STOP_TOKEN`].
    ///
    /// Returns as soon as the line is written; the handle is dropped once
    /// the exit is observed.
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self, name: &str) -> Result<()> {
        let mut live = self.live.lock().await;
        let handle = running_handle(&mut live, name)?;
        handle.write_line(STOP_TOKEN).await?;
        tracing::info!("Sent stop request");
        Ok(())
    }

    /// Kill the server's process immediately.
    #[tracing::instrument(skip(self))]
    pub async fn force_stop(&self, name: &str) -> Result<()> {
        let mut live = self.live.lock().await;
        let handle = running_handle(&mut live, name)?;
        let status = handle.kill().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to kill server process");
            e
        })?;
        tracing::info!(%status, "Server process killed");

        live.remove(name);
        Ok(())
    }

    /// Stop the server gracefully, then start it again.
    ///
    /// Waits at most the server's stop timeout for the old process to exit.
    /// If it does not, the restart is abandoned with
    /// [`Error::RestartAborted`]: the old process keeps running and nothing
    /// new is started.
    #[tracing::instrument(skip(self))]
    pub async fn restart(&self, name: &str) -> Result<ProcessInfo> {
        let mut live = self.live.lock().await;
        let handle = running_handle(&mut live, name)?;
        let timeout = handle.stop_timeout();

        handle.write_line(STOP_TOKEN).await?;
        match handle.wait_timeout(timeout).await? {
            Some(status) => tracing::info!(%status, "Server stopped for restart"),
            None => {
                tracing::warn!(?timeout, "Server did not stop in time; restart aborted");
                return Err(Error::RestartAborted {
                    server: name.to_string(),
                    timeout,
                });
            }
        }

        live.remove(name);
        self.spawn_into(&mut live, name)
    }

    /// Wait until the server's process exits, then flush its remaining output.
    ///
    /// Holds the table lock while waiting. Returns `Ok(None)` when the
    /// server was not running.
    pub async fn wait_until_exited(&self, name: &str) -> Result<Option<ExitStatus>> {
        let mut live = self.live.lock().await;
        let status = match live.get_mut(name) {
            Some(handle) => handle.wait().await?,
            None => return Ok(None),
        };

        if let Some(handle) = live.remove(name) {
            handle.drain_output().await;
        }
        Ok(Some(status))
    }

    fn spawn_into(&self, live: &mut LiveTable, name: &str) -> Result<ProcessInfo> {
        let config = self.servers.resolve_config(name)?;

        tracing::info!(command = %config.command, "Starting server process");
        let handle = ProcessHandle::spawn(name, &config, Arc::clone(&self.output)).map_err(|e| {
            tracing::error!(error = %e, "Failed to start server process");
            e
        })?;

        let info = handle.info().clone();
        tracing::info!(pid = info.pid, instance = %info.instance, "Server started");
        live.insert(name.to_string(), handle);
        Ok(info)
    }
}

/// Drops the entry for `name` if its process has exited. Returns whether it is still live.
fn reconcile(live: &mut LiveTable, name: &str) -> bool {
    let exited = match live.get_mut(name) {
        Some(handle) => handle.has_exited(),
        None => return false,
    };

    if exited {
        live.remove(name);
    }
    !exited
}

fn running_handle<'a>(live: &'a mut LiveTable, name: &str) -> Result<&'a mut ProcessHandle> {
    if !reconcile(live, name) {
        return Err(Error::NotRunning(name.to_string()));
    }
    live.get_mut(name)
        .ok_or_else(|| Error::NotRunning(name.to_string()))
}
