#![allow(dead_code)]

use server_runner::config::{Config, ServerConfig};
use server_runner::output::{Emphasis, OutputSink};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Echoes every line back on stdout and exits cleanly on `stop`.
pub const GRACEFUL_SERVER: &str = r#"while IFS= read -r line; do
  if [ "$line" = "stop" ]; then echo "Stopping the server"; exit 0; fi
  echo "$line"
done"#;

/// Echoes every line back on stdout and never exits on its own.
pub const STUBBORN_SERVER: &str = r#"while IFS= read -r line; do
  echo "$line"
done"#;

/// Launch configuration running `script` under `sh`.
pub fn shell_server(script: &str) -> ServerConfig {
    ServerConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        ..Default::default()
    }
}

/// Registry built from `(name, config)` pairs, keeping their order.
pub fn registry(servers: Vec<(&str, ServerConfig)>) -> Config {
    let mut config = Config::default();
    for (name, server) in servers {
        config.servers.insert(name.to_string(), server);
    }
    config
}

/// Output sink that records every message for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, Emphasis)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, Emphasis)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.messages().into_iter().map(|(line, _)| line).collect()
    }

    pub fn with_emphasis(&self, emphasis: Emphasis) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, e)| *e == emphasis)
            .map(|(line, _)| line)
            .collect()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }

    /// Polls until some recorded line equals `expected`.
    pub async fn wait_for_line(&self, expected: &str, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if self.lines().iter().any(|line| line == expected) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.lines().iter().any(|line| line == expected)
    }
}

impl OutputSink for RecordingSink {
    fn write(&self, message: &str, emphasis: Emphasis) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), emphasis));
    }
}
