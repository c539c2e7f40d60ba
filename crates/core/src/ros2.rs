//! Probe-and-run interface for the wrapped `ros2` command-line tool.

use std::sync::OnceLock;

use anyhow::Result;
use tracing::{debug, warn};

use crate::process::{find_in_path, run_captured, run_streaming, ProcessResult};

/// The underlying tool's command name, also the passthrough marker.
pub const ROS2_COMMAND: &str = "ros2";

/// Availability and version are probed at most once per process.
#[derive(Default)]
pub struct Ros2 {
    available: OnceLock<bool>,
    version: OnceLock<Option<String>>,
}

impl Ros2 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast, side-effect-free availability probe (a PATH lookup only).
    pub fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let found = find_in_path(ROS2_COMMAND).is_some();
            if !found {
                warn!("ros2 not found in PATH");
            }
            found
        })
    }

    /// The wrapped tool's reported version, if it can be determined.
    pub fn version(&self) -> Option<String> {
        self.version
            .get_or_init(|| {
                if !self.is_available() {
                    return None;
                }
                match run_captured(&[ROS2_COMMAND.into(), "--version".into()], None) {
                    Ok(out) if out.success() => Some(out.stdout.trim().to_string()),
                    Ok(_) => None,
                    Err(e) => {
                        debug!("failed to query ros2 version: {e}");
                        None
                    }
                }
            })
            .clone()
    }

    /// Run a ros2 subcommand with output relayed to the terminal.
    pub fn run(&self, args: &[String]) -> Result<ProcessResult> {
        let mut argv = vec![ROS2_COMMAND.to_string()];
        argv.extend_from_slice(args);
        run_streaming(&argv, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_probe_is_cached() {
        let ros2 = Ros2::new();
        let first = ros2.is_available();
        assert_eq!(ros2.is_available(), first);
    }

    #[test]
    fn version_is_none_when_unavailable() {
        let ros2 = Ros2::new();
        if !ros2.is_available() {
            assert!(ros2.version().is_none());
        }
    }
}
