//! The plugin capability contract, the registry that owns loaded
//! instances, and discovery across the four plugin sources.

pub mod builtin;
pub mod loader;
pub mod manifest;
pub mod plugin;
pub mod registry;

pub use loader::{discover_and_load, LoadDiagnostic, PluginSource, PLUGIN_PATH_ENV};
pub use manifest::{ManifestPlugin, PluginManifest};
pub use plugin::{Plugin, PluginDescriptor};
pub use registry::{PluginRegistry, RegisteredPlugin};
