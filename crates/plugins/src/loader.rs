//! Plugin discovery across the four load sources.
//!
//! Load order is fixed: built-ins, config entry-points, directories on
//! `ONECODE_PLUGIN_PATH`, then the user plugin directory. A later source
//! registering the same name overwrites the earlier one, so the user
//! directory has the final say.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use onecode_config::ConfigSnapshot;

use crate::builtin;
use crate::manifest::{ManifestPlugin, PluginManifest, MANIFEST_FILE};
use crate::plugin::Plugin;
use crate::registry::PluginRegistry;

/// Environment variable listing extra plugin directories, PATH-style.
pub const PLUGIN_PATH_ENV: &str = "ONECODE_PLUGIN_PATH";

/// Where a plugin (or a load failure) came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
    Builtin,
    EntryPoint,
    EnvPath(PathBuf),
    UserDir(PathBuf),
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSource::Builtin => write!(f, "built-in"),
            PluginSource::EntryPoint => write!(f, "config entry-point"),
            PluginSource::EnvPath(p) => write!(f, "{} ({})", PLUGIN_PATH_ENV, p.display()),
            PluginSource::UserDir(p) => write!(f, "user directory ({})", p.display()),
        }
    }
}

/// A non-fatal problem recorded during discovery.
#[derive(Debug, Clone)]
pub struct LoadDiagnostic {
    pub plugin: String,
    pub source: PluginSource,
    pub cause: String,
}

/// Run full discovery. Individual plugin failures never abort the load;
/// they are returned as diagnostics alongside the populated registry.
pub fn discover_and_load(config: &ConfigSnapshot) -> (PluginRegistry, Vec<LoadDiagnostic>) {
    let mut registry = PluginRegistry::new();
    let mut diagnostics = Vec::new();

    load_builtins(config, &mut registry, &mut diagnostics);
    load_entry_points(config, &mut registry, &mut diagnostics);
    for dir in env_path_dirs() {
        load_directory(&dir, PluginSource::EnvPath(dir.clone()), &mut registry, &mut diagnostics);
    }
    let user_dir = onecode_config::config_dir().join("plugins");
    load_directory(
        &user_dir,
        PluginSource::UserDir(user_dir.clone()),
        &mut registry,
        &mut diagnostics,
    );

    info!(
        loaded = registry.len(),
        problems = diagnostics.len(),
        "plugin discovery complete"
    );
    (registry, diagnostics)
}

fn load_builtins(
    config: &ConfigSnapshot,
    registry: &mut PluginRegistry,
    diagnostics: &mut Vec<LoadDiagnostic>,
) {
    for (name, ctor) in builtin::builtin_plugins() {
        match ctor(config) {
            Ok(plugin) => register_instance(plugin, PluginSource::Builtin, registry, diagnostics),
            Err(e) => diagnostics.push(LoadDiagnostic {
                plugin: name.to_string(),
                source: PluginSource::Builtin,
                cause: format!("{e:#}"),
            }),
        }
    }
}

fn load_entry_points(
    config: &ConfigSnapshot,
    registry: &mut PluginRegistry,
    diagnostics: &mut Vec<LoadDiagnostic>,
) {
    let Some(blocks) = config.get("plugins").and_then(|v| v.as_object().cloned()) else {
        return;
    };
    for (name, block) in &blocks {
        // Blocks without an exec key are plain plugin configuration.
        if block.get("exec").is_none() {
            continue;
        }
        match PluginManifest::from_config(name, block) {
            Ok(manifest) => register_instance(
                Box::new(ManifestPlugin::new(manifest)),
                PluginSource::EntryPoint,
                registry,
                diagnostics,
            ),
            Err(e) => {
                info!(plugin = %name, cause = %format!("{e:#}"), "skipping entry-point plugin");
                diagnostics.push(LoadDiagnostic {
                    plugin: name.clone(),
                    source: PluginSource::EntryPoint,
                    cause: format!("{e:#}"),
                });
            }
        }
    }
}

fn env_path_dirs() -> Vec<PathBuf> {
    match std::env::var_os(PLUGIN_PATH_ENV) {
        Some(raw) => std::env::split_paths(&raw).collect(),
        None => Vec::new(),
    }
}

fn load_directory(
    dir: &std::path::Path,
    source: PluginSource,
    registry: &mut PluginRegistry,
    diagnostics: &mut Vec<LoadDiagnostic>,
) {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "plugin directory absent, skipping");
        return;
    }
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            diagnostics.push(LoadDiagnostic {
                plugin: String::new(),
                source,
                cause: format!("read {}: {e}", dir.display()),
            });
            return;
        }
    };

    // Sorted for a deterministic load order within one directory.
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && p.join(MANIFEST_FILE).is_file())
        .collect();
    candidates.sort();

    for candidate in candidates {
        match PluginManifest::load(&candidate) {
            Ok(manifest) => register_instance(
                Box::new(ManifestPlugin::new(manifest)),
                source.clone(),
                registry,
                diagnostics,
            ),
            Err(e) => {
                let name = candidate
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!(plugin = %name, cause = %format!("{e:#}"), "skipping directory plugin");
                diagnostics.push(LoadDiagnostic {
                    plugin: name,
                    source: source.clone(),
                    cause: format!("{e:#}"),
                });
            }
        }
    }
}

fn register_instance(
    plugin: Box<dyn Plugin>,
    source: PluginSource,
    registry: &mut PluginRegistry,
    diagnostics: &mut Vec<LoadDiagnostic>,
) {
    let name = plugin.name().to_string();
    if registry.register(plugin) {
        diagnostics.push(LoadDiagnostic {
            plugin: name,
            source,
            cause: "replaced an earlier registration with the same name".to_string(),
        });
    }
}
