use crate::error::{SweepError, SweepResult};
use log::debug;
use std::process::{Command, Stdio};

/// Exit status and captured text of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: &str) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    /// Trimmed stderr, as it goes into the failure log.
    pub fn error_text(&self) -> &str {
        self.stderr.trim()
    }
}

/// Runs `cmd` to completion and captures both output streams. A non-zero
/// exit is not an error here; only a failure to start the process is.
pub fn run_command_with_output(cmd: &str, args: &[&str]) -> SweepResult<CommandOutput> {
    debug!("Running {} {}", cmd, args.join(" "));
    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| SweepError::spawn(cmd, e))?;
    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs `cmd` with every stream discarded and reports whether it exited 0.
pub fn run_command_silent(cmd: &str, args: &[&str]) -> SweepResult<bool> {
    debug!("Running {} {} (output discarded)", cmd, args.join(" "));
    let status = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| SweepError::spawn(cmd, e))?;
    Ok(status.success())
}

pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        format!("{}h {}m", hours, minutes)
    }
}

/// Local time formatted for use in log file names, e.g. `20240131_235959`.
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
