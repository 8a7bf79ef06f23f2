use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{RunOutput, ScriptRunner};
use crate::constants::{console, defaults};
use crate::error::CodeMuseError;

const RESULT_MARKER: &str = "\u{1e}codemuse-result:";

/// Reads the user code from stdin, runs it as a function body with
/// `console.log` swapped for a collector, then prints one marked JSON line.
const HARNESS: &str = r#"
const chunks = [];
process.stdin.setEncoding('utf8');
process.stdin.on('data', (chunk) => chunks.push(chunk));
process.stdin.on('end', () => {
  const logs = [];
  let error = null;
  const originalLog = console.log;
  console.log = (...args) => {
    logs.push(args.map((arg) => typeof arg === 'object' ? JSON.stringify(arg, null, 2) : String(arg)).join(' '));
  };
  try {
    new Function(chunks.join(''))();
  } catch (e) {
    error = e && e.message !== undefined ? String(e.message) : String(e);
  } finally {
    console.log = originalLog;
  }
  const payload = JSON.stringify({ logs, error });
  process.stdout.write('\n\u001ecodemuse-result:' + payload + '\n', () => process.exit(0));
});
"#;

#[derive(Debug, Deserialize)]
struct HarnessResult {
    logs: Vec<String>,
    error: Option<String>,
}

/// Runs JavaScript in a `node` subprocess.
///
/// The code runs with the same privileges as the editor. Only run code you
/// trust.
pub struct NodeRunner {
    node_path: String,
    timeout: Duration,
}

impl Default for NodeRunner {
    fn default() -> Self {
        Self::new(defaults::NODE_PATH)
    }
}

impl NodeRunner {
    pub fn new(node_path: impl Into<String>) -> Self {
        Self {
            node_path: node_path.into(),
            timeout: Duration::from_secs(defaults::RUN_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether `node_path` starts and reports a version.
    pub async fn check_node(node_path: &str) -> bool {
        Command::new(node_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn parse_stdout(stdout: &str) -> Option<HarnessResult> {
        let (_, tail) = stdout.rsplit_once(RESULT_MARKER)?;
        let line = tail.lines().next()?;
        serde_json::from_str(line).ok()
    }
}

#[async_trait::async_trait]
impl ScriptRunner for NodeRunner {
    fn name(&self) -> &str {
        "node"
    }

    fn empty_output(&self) -> &str {
        console::JS_NO_OUTPUT
    }

    async fn run(&self, code: &str) -> Result<RunOutput, CodeMuseError> {
        let mut child = Command::new(&self.node_path)
            .arg("-e")
            .arg(HARNESS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CodeMuseError::runner("node", format!("Failed to start {}: {e}", self.node_path))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(code.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                CodeMuseError::runner(
                    "node",
                    format!("Execution timed out after {}s", self.timeout.as_secs()),
                )
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match Self::parse_stdout(&stdout) {
            Some(result) => Ok(RunOutput {
                lines: result.logs,
                error: result.error,
            }),
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = stderr
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("node exited without a result")
                    .to_string();
                tracing::debug!(status = ?output.status.code(), "node produced no result");
                Ok(RunOutput::error(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_writes_the_marker() {
        assert!(HARNESS.contains(r"\u001ecodemuse-result:"));
        assert!(RESULT_MARKER.starts_with('\u{1e}'));
    }

    #[test]
    fn test_parse_stdout_uses_last_marker() {
        let stdout = format!(
            "stray\n{RESULT_MARKER}{{\"logs\":[\"a\"],\"error\":null}}\nlate timer output\n"
        );
        let result = NodeRunner::parse_stdout(&stdout).unwrap();
        assert_eq!(result.logs, vec!["a"]);
        assert!(result.error.is_none());
        assert!(NodeRunner::parse_stdout("no marker here").is_none());
    }

    #[tokio::test]
    async fn test_check_node_false_for_missing_binary() {
        assert!(!NodeRunner::check_node("definitely_not_node_binary_98765").await);
    }

    #[tokio::test]
    async fn test_missing_binary_is_runner_error() {
        let runner = NodeRunner::new("definitely_not_node_binary_98765");
        assert!(matches!(
            runner.run("console.log(1)").await,
            Err(CodeMuseError::Runner { .. })
        ));
    }
}
