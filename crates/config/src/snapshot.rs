//! Immutable configuration snapshot with dotted-path access.

use serde_json::Value;

use crate::defaults::KNOWN_SECTIONS;

/// The fully merged configuration in effect for one invocation.
///
/// Built once per process and never mutated afterward; any override
/// produces a new snapshot via [`ConfigSnapshot::with_overrides`].
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    tree: Value,
}

impl ConfigSnapshot {
    pub fn new(tree: Value) -> Self {
        Self { tree }
    }

    pub fn as_value(&self) -> &Value {
        &self.tree
    }

    /// Look up a value by dotted option path (e.g. `build.parallel_jobs`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut cur = &self.tree;
        for part in path.split('.') {
            cur = cur.get(part)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// The `plugins.<name>` block for a specific plugin, if present.
    pub fn plugin(&self, name: &str) -> Option<&Value> {
        self.get("plugins").and_then(|p| p.get(name))
    }

    /// Top-level sections the CLI does not recognize (preserved, reported).
    pub fn unknown_sections(&self) -> Vec<String> {
        match &self.tree {
            Value::Object(map) => map
                .keys()
                .filter(|k| !KNOWN_SECTIONS.contains(&k.as_str()))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Produce a new snapshot with an extra override layer applied on top.
    pub fn with_overrides(&self, layer: &Value) -> Self {
        let mut tree = self.tree.clone();
        crate::merge::deep_merge(&mut tree, layer);
        Self { tree }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> ConfigSnapshot {
        ConfigSnapshot::new(json!({
            "build": { "parallel_jobs": 8, "symlink_install": true },
            "logging": { "level": "warn" },
            "plugins": { "colcon": { "verbose": true } },
        }))
    }

    #[test]
    fn dotted_lookup() {
        let s = snapshot();
        assert_eq!(s.get_i64("build.parallel_jobs"), Some(8));
        assert_eq!(s.get_bool("build.symlink_install"), Some(true));
        assert_eq!(s.get_str("logging.level"), Some("warn"));
        assert_eq!(s.get("build.missing"), None);
        assert_eq!(s.get("missing.entirely"), None);
    }

    #[test]
    fn plugin_block_lookup() {
        let s = snapshot();
        assert_eq!(s.plugin("colcon").unwrap()["verbose"], true);
        assert!(s.plugin("nope").is_none());
    }

    #[test]
    fn overrides_produce_a_new_snapshot() {
        let s = snapshot();
        let overridden = s.with_overrides(&json!({ "logging": { "level": "debug" } }));
        assert_eq!(overridden.get_str("logging.level"), Some("debug"));
        // The original is untouched.
        assert_eq!(s.get_str("logging.level"), Some("warn"));
    }
}
