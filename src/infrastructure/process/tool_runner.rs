use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::application::ports::{ToolError, ToolRunner};

/// Runs external executables as child processes. Stdout is forwarded line
/// by line to the log as it arrives and accumulated for the caller; stderr
/// is accumulated for error reporting. A deadline bounds the whole run so
/// a hung tool cannot block a job forever.
pub struct TokioToolRunner {
    timeout: Duration,
}

impl TokioToolRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run_inner(&self, program: &str, args: &[&str]) -> Result<String, ToolError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolError::Spawn {
                program: program.to_string(),
                source: e,
            })?;

        let stdout = child.stdout.take().expect("stdout was piped");
        let mut stderr = child.stderr.take().expect("stderr was piped");

        let program_name = program.to_string();
        let stdout_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let mut collected = String::new();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(tool = %program_name, "{}", line);
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        });

        let mut stderr_buf = String::new();
        let stderr_read = stderr.read_to_string(&mut stderr_buf);

        let (status, _) = tokio::try_join!(child.wait(), stderr_read).map_err(|e| {
            ToolError::Io {
                program: program.to_string(),
                source: e,
            }
        })?;

        let stdout_buf = stdout_task.await.unwrap_or_default();

        if status.success() {
            Ok(stdout_buf)
        } else {
            Err(ToolError::NonZeroExit {
                program: program.to_string(),
                code: status.code(),
                stderr: stderr_buf.trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl ToolRunner for TokioToolRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ToolError> {
        tracing::debug!(tool = %program, ?args, "Spawning external tool");

        match tokio::time::timeout(self.timeout, self.run_inner(program, args)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::TimedOut {
                program: program.to_string(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}
