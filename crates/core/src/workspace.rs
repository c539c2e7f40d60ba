//! ROS 2 workspace discovery and small reporting helpers.

use std::path::{Path, PathBuf};

const WORKSPACE_MARKERS: [&str; 4] = ["src", "build", "install", "log"];

/// Walk up from the current directory looking for a colcon workspace root.
pub fn find_ros2_workspace() -> Option<PathBuf> {
    find_workspace_from(&std::env::current_dir().ok()?)
}

/// A directory qualifies as a workspace root when at least two of the
/// conventional marker directories (src, build, install, log) exist.
pub fn find_workspace_from(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let markers = WORKSPACE_MARKERS
            .iter()
            .filter(|m| dir.join(m).exists())
            .count();
        if markers >= 2 {
            return Some(dir.to_path_buf());
        }
    }
    None
}

/// Human-readable duration for build/test reporting.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        format!("{}m {:.1}s", (secs / 60.0) as u64, secs % 60.0)
    } else {
        format!(
            "{}h {}m",
            (secs / 3600.0) as u64,
            ((secs % 3600.0) / 60.0) as u64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_workspace_from_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/my_pkg")).unwrap();
        std::fs::create_dir(root.join("build")).unwrap();

        let found = find_workspace_from(&root.join("src/my_pkg")).unwrap();
        assert_eq!(found, root);
    }

    #[test]
    fn one_marker_is_not_enough() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        assert_eq!(find_workspace_from(dir.path()), None);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(12.34), "12.3s");
        assert_eq!(format_duration(125.0), "2m 5.0s");
        assert_eq!(format_duration(3720.0), "1h 2m");
    }
}
