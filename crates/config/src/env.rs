//! Environment variable configuration overrides.
//!
//! `ONECODE_<SECTION>_<KEY>` overrides a leaf under a known top-level
//! section (`ONECODE_BUILD_PARALLEL_JOBS` → `build.parallel_jobs`);
//! `ONECODE_PLUGINS_<NAME>_<KEY>` targets `plugins.<name>.<key>`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::defaults::KNOWN_SECTIONS;

/// Env var prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ONECODE_";

/// Control variables that steer the CLI itself, never config overrides.
const RESERVED: [&str; 2] = ["ONECODE_CONFIG_DIR", "ONECODE_PLUGIN_PATH"];

/// Collect overrides from the process environment.
pub fn environment_overrides() -> Value {
    overrides_from(std::env::vars())
}

/// Pure core, driven by an explicit variable iterator for tests.
pub fn overrides_from(vars: impl Iterator<Item = (String, String)>) -> Value {
    let mut layer = Value::Object(Map::new());
    for (name, raw) in vars {
        if RESERVED.contains(&name.as_str()) || !name.starts_with(ENV_PREFIX) {
            continue;
        }
        let Some((path, value)) = parse_override(&name, &raw) else {
            continue;
        };
        debug!(var = %name, path = %path.join("."), "environment override");
        crate::merge::insert_path(&mut layer, &path, value);
    }
    layer
}

/// Map `ONECODE_BUILD_CMAKE_BUILD_TYPE` to `["build", "cmake_build_type"]`.
/// Longest-section match, so multi-word sections are unambiguous.
fn parse_override(name: &str, raw: &str) -> Option<(Vec<String>, Value)> {
    let rest = name.strip_prefix(ENV_PREFIX)?.to_ascii_lowercase();
    let section = KNOWN_SECTIONS
        .iter()
        .filter(|s| rest.starts_with(&format!("{s}_")))
        .max_by_key(|s| s.len())?;
    let leaf = &rest[section.len() + 1..];
    if leaf.is_empty() {
        return None;
    }

    let path = if *section == "plugins" {
        // First segment after PLUGINS_ is the plugin name.
        let (plugin, key) = leaf.split_once('_')?;
        if plugin.is_empty() || key.is_empty() {
            return None;
        }
        vec![section.to_string(), plugin.to_string(), key.to_string()]
    } else {
        vec![section.to_string(), leaf.to_string()]
    };
    Some((path, coerce_scalar(raw)))
}

/// Coerce a raw string to the narrowest matching scalar type:
/// bool, then integer, then float, else string.
pub fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(vars: &[(&str, &str)]) -> Value {
        overrides_from(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn maps_section_and_multi_word_leaf() {
        let v = layer(&[("ONECODE_BUILD_CMAKE_BUILD_TYPE", "Debug")]);
        assert_eq!(v["build"]["cmake_build_type"], "Debug");
    }

    #[test]
    fn coerces_scalar_types() {
        let v = layer(&[
            ("ONECODE_BUILD_PARALLEL_JOBS", "4"),
            ("ONECODE_BUILD_SYMLINK_INSTALL", "false"),
            ("ONECODE_LOGGING_LEVEL", "debug"),
        ]);
        assert_eq!(v["build"]["parallel_jobs"], json!(4));
        assert_eq!(v["build"]["symlink_install"], json!(false));
        assert_eq!(v["logging"]["level"], "debug");
    }

    #[test]
    fn plugin_overrides_nest_under_the_plugin_name() {
        let v = layer(&[("ONECODE_PLUGINS_COLCON_VERBOSE", "true")]);
        assert_eq!(v["plugins"]["colcon"]["verbose"], json!(true));
    }

    #[test]
    fn reserved_and_unknown_vars_are_skipped() {
        let v = layer(&[
            ("ONECODE_CONFIG_DIR", "/tmp/x"),
            ("ONECODE_PLUGIN_PATH", "/tmp/y"),
            ("ONECODE_NOSUCHSECTION_KEY", "1"),
            ("PATH", "/usr/bin"),
        ]);
        assert_eq!(v, json!({}));
    }
}
