//! Passthrough execution to the ROS 2 CLI.
//!
//! The forwarded process inherits stdio and owns the terminal; SIGINT is
//! swallowed here so the child decides when the session ends, and its
//! exit status is mirrored back unchanged.

use anyhow::Result;
use tracing::debug;

use onecode_core::{DispatchResult, Ros2};

pub fn run(args: &[String]) -> Result<DispatchResult> {
    debug!(args = ?args, "forwarding to ros2");

    // Ignore SIGINT for the duration of the child; the child receives it
    // directly and its death status carries the signal.
    let _ = ctrlc::set_handler(|| {});

    let result = Ros2::new().run(args)?;
    Ok(DispatchResult::code(result.exit_code))
}
