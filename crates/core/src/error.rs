use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the OneCode CLI.
///
/// Plugin load failures and duplicate registrations are collected as
/// diagnostics rather than raised, so only the dispatch-time variants
/// here ever reach the process exit path.
#[derive(Debug, Error)]
pub enum OnecodeError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("plugin '{name}' failed to load from {origin}: {cause}")]
    PluginLoad {
        name: String,
        origin: String,
        cause: String,
    },

    #[error("duplicate plugin name: {0}")]
    DuplicatePlugin(String),

    #[error("unknown command: {command}")]
    UnknownCommand {
        command: String,
        suggestions: Vec<String>,
    },

    #[error("required tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl OnecodeError {
    /// Process exit code for this error, mirroring shell conventions:
    /// 2 for an unknown command, 127 for a missing underlying tool,
    /// 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            OnecodeError::UnknownCommand { .. } => 2,
            OnecodeError::ToolNotFound(_) => 127,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_shell_convention() {
        let unknown = OnecodeError::UnknownCommand {
            command: "bogus".into(),
            suggestions: vec![],
        };
        assert_eq!(unknown.exit_code(), 2);
        assert_eq!(OnecodeError::ToolNotFound("ros2".into()).exit_code(), 127);
        assert_eq!(
            OnecodeError::ConfigNotFound(PathBuf::from("/missing.yaml")).exit_code(),
            1
        );
        assert_eq!(
            OnecodeError::Internal(anyhow::anyhow!("boom")).exit_code(),
            1
        );
    }
}
