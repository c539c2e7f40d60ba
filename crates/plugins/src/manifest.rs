//! External plugin manifests.
//!
//! A directory plugin is a folder containing `onecode-plugin.yaml`
//! describing an executable-backed plugin. Config entry-points reuse the
//! same structure, declared under `plugins.<name>` with an `exec` key.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use onecode_config::ConfigSnapshot;
use onecode_core::{find_in_path, run_streaming, DispatchResult};

use crate::plugin::Plugin;

/// Manifest file name inside a plugin directory.
pub const MANIFEST_FILE: &str = "onecode-plugin.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Executable invoked as `exec <command> <args...>`.
    pub exec: String,
    /// First-token commands this plugin claims.
    pub commands: Vec<String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl PluginManifest {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read manifest at {}", path.display()))?;
        let manifest: PluginManifest =
            serde_yaml::from_str(&raw).context("parse plugin manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Build a manifest from a `plugins.<name>` config block carrying an
    /// `exec` key. Commands default to the plugin name itself.
    pub fn from_config(name: &str, block: &serde_json::Value) -> Result<Self> {
        let exec = block
            .get("exec")
            .and_then(|v| v.as_str())
            .context("entry-point block missing 'exec'")?
            .to_string();
        let commands = block
            .get("commands")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_else(|| vec![name.to_string()]);
        let description = block
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let version = block
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("1.0.0")
            .to_string();
        let manifest = Self {
            name: name.to_string(),
            description,
            version,
            exec,
            commands,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("plugin manifest missing 'name'");
        }
        if self.exec.is_empty() {
            bail!("plugin manifest missing 'exec'");
        }
        if self.commands.is_empty() {
            bail!("plugin manifest declares no commands");
        }
        Ok(())
    }
}

/// A plugin backed by an external executable described in a manifest.
pub struct ManifestPlugin {
    manifest: PluginManifest,
}

impl ManifestPlugin {
    pub fn new(manifest: PluginManifest) -> Self {
        Self { manifest }
    }
}

impl Plugin for ManifestPlugin {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }

    fn version(&self) -> &str {
        &self.manifest.version
    }

    fn is_available(&self) -> bool {
        // Paths with separators are checked directly, bare names on PATH.
        let exec = Path::new(&self.manifest.exec);
        if exec.components().count() > 1 {
            exec.is_file()
        } else {
            find_in_path(&self.manifest.exec).is_some()
        }
    }

    fn commands(&self) -> Vec<String> {
        self.manifest.commands.clone()
    }

    fn execute(
        &self,
        command: &str,
        args: &[String],
        _config: &ConfigSnapshot,
    ) -> Result<DispatchResult> {
        let mut argv = vec![self.manifest.exec.clone(), command.to_string()];
        argv.extend_from_slice(args);
        let result = run_streaming(&argv, None)?;
        Ok(DispatchResult::code(result.exit_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_manifest_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "name: nav\ndescription: Navigation tooling\nexec: nav-helper\ncommands: [nav]\n",
        )
        .unwrap();

        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.name, "nav");
        assert_eq!(manifest.commands, ["nav"]);
        assert_eq!(manifest.version, "1.0.0");
    }

    #[test]
    fn rejects_manifest_without_commands() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "name: nav\nexec: nav-helper\ncommands: []\n",
        )
        .unwrap();
        assert!(PluginManifest::load(dir.path()).is_err());
    }

    #[test]
    fn config_entry_point_defaults_commands_to_name() {
        let block = json!({ "exec": "/usr/bin/planner" });
        let manifest = PluginManifest::from_config("planner", &block).unwrap();
        assert_eq!(manifest.commands, ["planner"]);
        assert_eq!(manifest.exec, "/usr/bin/planner");
    }

    #[test]
    fn config_entry_point_without_exec_is_rejected() {
        let block = json!({ "commands": ["plan"] });
        assert!(PluginManifest::from_config("planner", &block).is_err());
    }

    #[test]
    fn absolute_exec_availability_checks_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let exec = dir.path().join("helper");
        std::fs::write(&exec, "#!/bin/sh\n").unwrap();

        let manifest = PluginManifest {
            name: "h".into(),
            description: String::new(),
            version: "1.0.0".into(),
            exec: exec.display().to_string(),
            commands: vec!["h".into()],
        };
        assert!(ManifestPlugin::new(manifest).is_available());

        let missing = PluginManifest {
            name: "m".into(),
            description: String::new(),
            version: "1.0.0".into(),
            exec: dir.path().join("absent").display().to_string(),
            commands: vec!["m".into()],
        };
        assert!(!ManifestPlugin::new(missing).is_available());
    }
}
