//! Config file IO: YAML load with typed errors, atomic write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use onecode_core::OnecodeError;

/// File name of the user configuration inside the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the OneCode config directory.
/// Priority: `ONECODE_CONFIG_DIR` env > `~/.onecode/`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ONECODE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".onecode");
    }
    PathBuf::from(".onecode")
}

/// Full path of the conventional user config file.
pub fn user_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Load a YAML document as a JSON value tree.
///
/// Parse failures become `ConfigParse` carrying the offending path and
/// the parser's line/column message.
pub fn load_yaml(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&raw).map_err(|e| OnecodeError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "loaded config layer");
    Ok(value)
}

/// Load an explicitly requested config file; missing is fatal.
pub fn load_required_yaml(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(OnecodeError::ConfigNotFound(path.to_path_buf()).into());
    }
    load_yaml(path)
}

/// Write the user config atomically (temp file + rename).
pub fn write_user_config(value: &Value, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
    }
    let yaml = serde_yaml::to_string(value).context("failed to serialize config to YAML")?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml.as_bytes())
        .with_context(|| format!("failed to write temp config: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to rename temp config to: {}", path.display()))?;
    info!(path = %path.display(), "wrote config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yaml");
        let value = json!({ "build": { "parallel_jobs": 2 } });

        write_user_config(&value, &path).unwrap();
        let loaded = load_yaml(&path).unwrap();
        assert_eq!(loaded["build"]["parallel_jobs"], 2);
        // No temp file left behind.
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn empty_document_loads_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(load_yaml(&path).unwrap(), Value::Null);
    }
}
