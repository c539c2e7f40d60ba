//! The plugin capability contract.

use anyhow::Result;

use onecode_config::ConfigSnapshot;
use onecode_core::DispatchResult;

/// Capability set every OneCode plugin implements.
///
/// `is_available` must stay fast and side-effect-free (a PATH probe at
/// most, never an invocation of the wrapped tool); it is called eagerly
/// at registration and the result is cached in the descriptor for the
/// rest of the process.
pub trait Plugin {
    /// Unique plugin name.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Whether the wrapped tool is usable on this system.
    fn is_available(&self) -> bool;

    /// First-token command names this plugin claims.
    fn commands(&self) -> Vec<String>;

    /// Execute one of the registered commands synchronously.
    fn execute(
        &self,
        command: &str,
        args: &[String],
        config: &ConfigSnapshot,
    ) -> Result<DispatchResult>;
}

/// Read-only identity and status of a registered plugin.
///
/// Created once at registration; never mutated for the session.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
    /// Availability probed at registration, cached for the process.
    pub available: bool,
    pub commands: Vec<String>,
}

impl PluginDescriptor {
    pub fn for_plugin(plugin: &dyn Plugin) -> Self {
        Self {
            name: plugin.name().to_string(),
            description: plugin.description().to_string(),
            version: plugin.version().to_string(),
            available: plugin.is_available(),
            commands: plugin.commands(),
        }
    }
}
