//! Plugins compiled into the CLI itself.

use anyhow::Result;

use onecode_config::ConfigSnapshot;

use crate::plugin::Plugin;

pub mod colcon;
pub mod sim;

pub use colcon::ColconPlugin;
pub use sim::SimPlugin;

pub type PluginCtor = fn(&ConfigSnapshot) -> Result<Box<dyn Plugin>>;

/// Built-in plugins in registration order.
pub fn builtin_plugins() -> Vec<(&'static str, PluginCtor)> {
    vec![
        ("colcon", |_cfg| Ok(Box::new(ColconPlugin::new()))),
        ("simulation", |_cfg| Ok(Box::new(SimPlugin::new()))),
    ]
}
