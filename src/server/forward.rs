use crate::output::{Emphasis, OutputSink};
use futures_lite::io::{AsyncBufReadExt, AsyncRead, BufReader};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Spawns a task that copies every line of `reader` to `output`.
///
/// Lines are prefixed with the server name. Bytes that are not UTF-8 are
/// replaced rather than dropped. The task ends when the stream reaches EOF,
/// which happens once the child process exits.
pub(crate) fn forward_lines<R>(
    server: String,
    stream: &'static str,
    reader: R,
    output: Arc<dyn OutputSink>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(trim_line_ending(&buf));
                    output.write(&format!("[{}] {}", server, line), Emphasis::Plain);
                }
                Err(e) => {
                    tracing::warn!(server = %server, stream, error = %e, "Stopped forwarding output");
                    break;
                }
            }
        }

        tracing::debug!(server = %server, stream, "Output stream closed");
    })
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
