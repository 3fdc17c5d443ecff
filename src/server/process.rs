// src/server/process.rs
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::output::OutputSink;
use crate::server::forward::forward_lines;
use async_process::{Child, ChildStdin, Command, Stdio};
use futures_lite::io::AsyncWriteExt;
use std::fmt;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Unique identifier for one spawned instance of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a running server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Server name the instance was started for
    pub name: String,
    /// Identifier of this particular spawn
    pub instance: InstanceId,
    /// OS process identifier
    pub pid: u32,
    /// When the process was spawned
    pub started_at: SystemTime,
}

/// A live server process.
///
/// Owns the child, its stdin pipe and the tasks forwarding its stdout and
/// stderr. Only the lifecycle controller creates and holds these.
pub struct ProcessHandle {
    /// Identity of the process
    info: ProcessInfo,
    /// Bounded wait used when restarting
    stop_timeout: Duration,
    /// Child process
    child: Child,
    /// Child stdin
    stdin: ChildStdin,
    /// Output forwarding tasks
    forwarders: Vec<JoinHandle<()>>,
}

impl ProcessHandle {
    /// Spawn the server described by `config` and start forwarding its output.
    ///
    /// On unix the child leads its own process group. Its stdout and stderr
    /// stay piped to this process, so forwarding ends when the runner exits.
    pub(crate) fn spawn(
        name: &str,
        config: &ServerConfig,
        output: Arc<dyn OutputSink>,
    ) -> Result<Self> {
        let mut std_command = std::process::Command::new(&config.command);
        std_command.args(&config.args);

        for (key, value) in &config.env {
            std_command.env(key, value);
        }

        if let Some(dir) = &config.working_dir {
            std_command.current_dir(dir);
        }

        // Own process group, so a terminal Ctrl-C aimed at the runner skips the server.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_command.process_group(0);
        }

        let mut command = Command::from(std_command);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| {
            Error::ProcessSpawn(format!("'{}' ({}): {}", name, config.command, e))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            Error::ProcessSpawn(format!("Failed to get stdin pipe for '{}'", name))
        })?;

        let mut forwarders = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            forwarders.push(forward_lines(
                name.to_string(),
                "stdout",
                stdout,
                Arc::clone(&output),
            ));
        }
        if let Some(stderr) = child.stderr.take() {
            forwarders.push(forward_lines(name.to_string(), "stderr", stderr, output));
        }

        let info = ProcessInfo {
            name: name.to_string(),
            instance: InstanceId::new(),
            pid: child.id(),
            started_at: SystemTime::now(),
        };

        Ok(Self {
            info,
            stop_timeout: config.stop_timeout(),
            child,
            stdin,
            forwarders,
        })
    }

    /// Get the instance snapshot
    pub fn info(&self) -> &ProcessInfo {
        &self.info
    }

    /// Get the restart wait bound
    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// Poll the child without blocking. Returns true once it has exited.
    pub fn has_exited(&mut self) -> bool {
        match self.child.try_status() {
            Ok(Some(status)) => {
                tracing::info!(server = %self.info.name, pid = self.info.pid, %status, "Server process exited");
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(server = %self.info.name, error = %e, "Failed to poll server process; treating it as exited");
                true
            }
        }
    }

    /// Write `text` and a newline to the child's stdin.
    pub async fn write_line(&mut self, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        self.stdin.write_all(line.as_bytes()).await.map_err(|e| {
            Error::Process(format!(
                "Failed to write to stdin of '{}': {}",
                self.info.name, e
            ))
        })?;
        self.stdin.flush().await.map_err(|e| {
            Error::Process(format!(
                "Failed to flush stdin of '{}': {}",
                self.info.name, e
            ))
        })?;

        Ok(())
    }

    /// Wait for the child to exit.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        self.child.status().await.map_err(|e| {
            Error::Process(format!(
                "Failed to wait for '{}': {}",
                self.info.name, e
            ))
        })
    }

    /// Wait at most `limit` for the child to exit.
    ///
    /// Returns `Ok(None)` when the limit passes first; the child is left running.
    pub async fn wait_timeout(&mut self, limit: Duration) -> Result<Option<ExitStatus>> {
        match tokio::time::timeout(limit, self.wait()).await {
            Ok(status) => status.map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Kill the child and reap it.
    pub async fn kill(&mut self) -> Result<ExitStatus> {
        self.child.kill().map_err(|e| {
            Error::Process(format!("Failed to kill '{}': {}", self.info.name, e))
        })?;
        self.wait().await
    }

    /// Wait for the forwarding tasks to flush whatever the child wrote last.
    pub async fn drain_output(self) {
        for task in self.forwarders {
            let _ = task.await;
        }
    }
}
