//! Plugin registry: name-keyed plugin instances in registration order.

use tracing::warn;

use crate::plugin::{Plugin, PluginDescriptor};

pub struct RegisteredPlugin {
    pub descriptor: PluginDescriptor,
    pub instance: Box<dyn Plugin>,
}

/// Owns every loaded plugin for the process lifetime.
///
/// Names are unique. Registering a duplicate warns and overwrites in
/// place, keeping the original position so listing order stays
/// deterministic across runs.
#[derive(Default)]
pub struct PluginRegistry {
    entries: Vec<RegisteredPlugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin, computing its descriptor (including the eager
    /// availability probe). Returns true when an existing entry with the
    /// same name was overwritten.
    pub fn register(&mut self, instance: Box<dyn Plugin>) -> bool {
        let descriptor = PluginDescriptor::for_plugin(instance.as_ref());
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.descriptor.name == descriptor.name)
        {
            warn!(
                plugin = %descriptor.name,
                "duplicate plugin name, overwriting earlier registration"
            );
            *existing = RegisteredPlugin {
                descriptor,
                instance,
            };
            return true;
        }
        self.entries.push(RegisteredPlugin {
            descriptor,
            instance,
        });
        false
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.entries.iter().find(|e| e.descriptor.name == name)
    }

    /// The plugin claiming `token` as one of its registered commands.
    pub fn find_command(&self, token: &str) -> Option<&RegisteredPlugin> {
        self.entries
            .iter()
            .find(|e| e.descriptor.commands.iter().any(|c| c == token))
    }

    /// All entries in registration order, for deterministic display.
    pub fn list(&self) -> impl Iterator<Item = &RegisteredPlugin> {
        self.entries.iter()
    }

    /// Every registered command token, for usage text and suggestions.
    pub fn command_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.descriptor.commands.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use onecode_config::ConfigSnapshot;
    use onecode_core::DispatchResult;

    struct Stub {
        name: &'static str,
        version: &'static str,
        commands: Vec<String>,
    }

    impl Stub {
        fn boxed(name: &'static str, version: &'static str, commands: &[&str]) -> Box<dyn Plugin> {
            Box::new(Stub {
                name,
                version,
                commands: commands.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    impl Plugin for Stub {
        fn name(&self) -> &str {
            self.name
        }
        fn version(&self) -> &str {
            self.version
        }
        fn is_available(&self) -> bool {
            true
        }
        fn commands(&self) -> Vec<String> {
            self.commands.clone()
        }
        fn execute(
            &self,
            _command: &str,
            _args: &[String],
            _config: &ConfigSnapshot,
        ) -> Result<DispatchResult> {
            Ok(DispatchResult::success())
        }
    }

    #[test]
    fn lists_in_registration_order() {
        let mut registry = PluginRegistry::new();
        registry.register(Stub::boxed("b", "1.0.0", &["beta"]));
        registry.register(Stub::boxed("a", "1.0.0", &["alpha"]));
        let names: Vec<_> = registry.list().map(|e| e.descriptor.name.clone()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn duplicate_overwrites_in_place() {
        let mut registry = PluginRegistry::new();
        assert!(!registry.register(Stub::boxed("x", "1.0.0", &["one"])));
        registry.register(Stub::boxed("y", "1.0.0", &["two"]));
        assert!(registry.register(Stub::boxed("x", "2.0.0", &["one"])));

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.list().map(|e| e.descriptor.name.clone()).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(registry.get("x").unwrap().descriptor.version, "2.0.0");
    }

    #[test]
    fn finds_plugin_by_command_token() {
        let mut registry = PluginRegistry::new();
        registry.register(Stub::boxed("build-tool", "1.0.0", &["build", "test"]));
        assert_eq!(
            registry.find_command("test").unwrap().descriptor.name,
            "build-tool"
        );
        assert!(registry.find_command("deploy").is_none());
    }
}
