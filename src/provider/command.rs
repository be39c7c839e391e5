// ABOUTME: Runs operator CLI tools (docker, kubectl) as child processes.
// ABOUTME: Captures exit status and output, optionally feeding stdin.

use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stderr, or the exit code when stderr is empty.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exited with status {:?}", self.exit_code)
        } else {
            stderr.to_string()
        }
    }
}

pub(crate) async fn run(
    program: &str,
    args: &[&str],
    stdin: Option<&str>,
) -> std::io::Result<CommandOutput> {
    tracing::debug!("Running {} {}", program, args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin while collecting output so neither side can fill its pipe
    // and stall the other.
    let pipe = child.stdin.take();
    let feed = async move {
        let (Some(input), Some(mut pipe)) = (stdin, pipe) else {
            return Ok::<(), std::io::Error>(());
        };
        match pipe.write_all(input.as_bytes()).await {
            // The child exited without reading everything; its status and
            // stderr say why.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!("{} closed stdin early", program);
                Ok(())
            }
            // Dropping the handle closes stdin so the child sees EOF.
            result => result,
        }
    };

    let (fed, output) = tokio::join!(feed, child.wait_with_output());
    let output = output?;
    fed?;
    let result = CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if !result.success {
        tracing::warn!("{} exited with status {:?}", program, result.exit_code);
    }
    Ok(result)
}
