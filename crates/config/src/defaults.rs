//! Built-in default configuration, the lowest-priority layer.

use serde_json::{json, Value};

/// Top-level sections the CLI knows about. Unknown sections are preserved
/// for forward compatibility but flagged at WARN level in verbose runs.
pub const KNOWN_SECTIONS: [&str; 5] = ["build", "simulation", "logging", "passthrough", "plugins"];

/// Default CMake build type for colcon builds.
pub const DEFAULT_CMAKE_BUILD_TYPE: &str = "Release";

/// Default log level; `--verbose` and `--debug` raise it per invocation.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn default_config() -> Value {
    json!({
        "build": {
            "cmake_build_type": DEFAULT_CMAKE_BUILD_TYPE,
            "symlink_install": true,
            "parallel_jobs": null,
            "continue_on_error": false,
            "cmake_args": null,
            "ament_cmake_args": null,
        },
        "simulation": {
            "default_world": null,
            "default_robot": null,
            "headless_mode": false,
        },
        "logging": {
            "level": DEFAULT_LOG_LEVEL,
            "file": null,
        },
        "passthrough": {
            "implicit": false,
        },
        "plugins": {},
    })
}
