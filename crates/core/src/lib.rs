//! Shared types for the OneCode CLI.
//!
//! Provides:
//! - The `OnecodeError` taxonomy with its exit-code mapping
//! - `DispatchResult`, the normalized outcome of every command
//! - Synchronous child-process execution (streaming and captured)
//! - The `Ros2` probe-and-run interface for the wrapped tool
//! - Workspace discovery helpers

pub mod error;
pub mod process;
pub mod ros2;
pub mod types;
pub mod workspace;

pub use error::OnecodeError;
pub use process::{find_in_path, run_captured, run_streaming, ProcessResult};
pub use ros2::{Ros2, ROS2_COMMAND};
pub use types::{DispatchResult, GlobalFlags};
pub use workspace::{find_ros2_workspace, format_duration};
