//! Synchronous child-process execution for passthrough and plugin
//! shell-outs. Each call blocks until the child exits; there is no
//! worker pool and no async runtime.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::OnecodeError;

/// Outcome of a child process run.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub command: Vec<String>,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Locate an executable on the PATH search list.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Run a command with inherited stdio, relaying output as it arrives.
///
/// The child's exit code is returned verbatim; a signal death maps to
/// 128 + signo per shell convention. A missing executable is
/// `OnecodeError::ToolNotFound`.
pub fn run_streaming(argv: &[String], cwd: Option<&Path>) -> Result<ProcessResult> {
    let (program, args) = split_argv(argv)?;
    debug!(command = %argv.join(" "), "spawning child process");

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OnecodeError::ToolNotFound(program.to_string()).into());
        }
        Err(e) => return Err(e).with_context(|| format!("failed to spawn {program}")),
    };

    Ok(ProcessResult {
        exit_code: exit_code_of(&status),
        stdout: String::new(),
        stderr: String::new(),
        command: argv.to_vec(),
    })
}

/// Run a command with captured stdout/stderr, for probes and summaries.
pub fn run_captured(argv: &[String], cwd: Option<&Path>) -> Result<ProcessResult> {
    let (program, args) = split_argv(argv)?;
    debug!(command = %argv.join(" "), "running captured command");

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OnecodeError::ToolNotFound(program.to_string()).into());
        }
        Err(e) => return Err(e).with_context(|| format!("failed to spawn {program}")),
    };

    Ok(ProcessResult {
        exit_code: exit_code_of(&output.status),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        command: argv.to_vec(),
    })
}

fn split_argv(argv: &[String]) -> Result<(&str, &[String])> {
    let (program, args) = argv.split_first().context("empty argument vector")?;
    Ok((program.as_str(), args))
}

#[cfg(unix)]
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
