//! Built-in commands: version, plugins, config and the usage screen.

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use onecode_config::{coerce_scalar, insert_path, user_config_path, ConfigSnapshot};
use onecode_core::{DispatchResult, Ros2};
use onecode_plugins::PluginRegistry;

pub fn usage() {
    println!("OneCode Plant CLI");
    println!();
    println!("Usage: onecode [--verbose] [--debug] [--config PATH] <command> [args...]");
    println!();
    println!("Commands:");
    println!("  version              Show CLI and ROS 2 versions");
    println!("  plugins              List registered plugins");
    println!("  config show|get|set  Inspect or edit configuration");
    println!("  ros2 <args...>       Forward to the ROS 2 CLI");
    println!();
    println!("Any plugin-claimed command (for example 'build') runs that plugin.");
}

pub fn version() -> Result<DispatchResult> {
    println!("OneCode Plant CLI v{}", env!("CARGO_PKG_VERSION"));
    let ros2 = Ros2::new();
    match ros2.version() {
        Some(version) => println!("ROS 2: {version}"),
        None => println!("ROS 2: not found on PATH"),
    }
    Ok(DispatchResult::success())
}

/// Print the registry. Always exits zero, even when empty.
pub fn list_plugins(registry: &PluginRegistry) {
    if registry.is_empty() {
        println!("(no plugins loaded; passthrough only)");
        return;
    }
    println!("{:<16} {:<10} {:<6} COMMANDS", "PLUGIN", "VERSION", "OK");
    println!("{}", "-".repeat(40));
    for entry in registry.list() {
        let d = &entry.descriptor;
        let glyph = if d.available { "\u{2713}" } else { "\u{2717}" };
        println!(
            "{:<16} {:<10} {:<6} {}",
            d.name,
            d.version,
            glyph,
            d.commands.join(", ")
        );
    }
}

pub fn config(args: &[String], snapshot: &ConfigSnapshot) -> Result<DispatchResult> {
    match args.first().map(String::as_str) {
        None | Some("show") => {
            let rendered = serde_yaml::to_string(snapshot.as_value())
                .context("render configuration")?;
            print!("{rendered}");
            Ok(DispatchResult::success())
        }
        Some("get") => {
            let Some(key) = args.get(1) else {
                bail!("usage: onecode config get <dotted.key>");
            };
            match snapshot.get(key) {
                Some(Value::String(s)) => println!("{s}"),
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("Key '{key}' is not set.");
                    return Ok(DispatchResult::code(1));
                }
            }
            Ok(DispatchResult::success())
        }
        Some("set") => {
            let (Some(key), Some(raw)) = (args.get(1), args.get(2)) else {
                bail!("usage: onecode config set <dotted.key> <value>");
            };
            set_user_config(key, raw)?;
            println!("Set {key} = {raw} in {}", user_config_path().display());
            Ok(DispatchResult::success())
        }
        Some(other) => bail!("unknown config subcommand '{other}'"),
    }
}

/// Write a single key into the user config file, creating it if needed.
fn set_user_config(key: &str, raw: &str) -> Result<()> {
    let segments: Vec<String> = key.split('.').map(String::from).collect();
    if segments.iter().any(|s| s.is_empty()) {
        bail!("invalid key '{key}': empty path segment");
    }

    let path = user_config_path();
    let mut tree = if path.is_file() {
        onecode_config::load_yaml(&path)?
    } else {
        Value::Null
    };
    if !tree.is_object() {
        tree = json!({});
    }
    insert_path(&mut tree, &segments, coerce_scalar(raw));
    onecode_config::write_user_config(&tree, &path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_get_missing_key_exits_one() {
        let snapshot = ConfigSnapshot::new(json!({ "build": { "parallel_jobs": 4 } }));
        let args = vec!["get".to_string(), "build.absent".to_string()];
        let result = config(&args, &snapshot).unwrap();
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn config_get_present_key_exits_zero() {
        let snapshot = ConfigSnapshot::new(json!({ "build": { "parallel_jobs": 4 } }));
        let args = vec!["get".to_string(), "build.parallel_jobs".to_string()];
        let result = config(&args, &snapshot).unwrap();
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn config_rejects_unknown_subcommand() {
        let snapshot = ConfigSnapshot::new(json!({}));
        let args = vec!["frobnicate".to_string()];
        assert!(config(&args, &snapshot).is_err());
    }

    #[test]
    fn config_set_requires_key_and_value() {
        let snapshot = ConfigSnapshot::new(json!({}));
        let args = vec!["set".to_string(), "build.jobs".to_string()];
        assert!(config(&args, &snapshot).is_err());
    }
}
