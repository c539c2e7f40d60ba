//! Gazebo simulation integration.
//!
//! Launches whichever Gazebo family binary is installed (`gz`, `ign` or
//! classic `gazebo`) and lists world files found on the simulator
//! resource paths.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::json;
use tracing::info;

use onecode_config::ConfigSnapshot;
use onecode_core::{find_in_path, run_streaming, DispatchResult};

use crate::plugin::Plugin;

/// Simulator binaries in preference order.
const SIMULATORS: [&str; 3] = ["gz", "ign", "gazebo"];

const RESOURCE_PATH_VARS: [&str; 3] = [
    "GZ_SIM_RESOURCE_PATH",
    "IGN_GAZEBO_RESOURCE_PATH",
    "GAZEBO_RESOURCE_PATH",
];

pub struct SimPlugin;

impl SimPlugin {
    pub fn new() -> Self {
        Self
    }

    fn preferred_simulator() -> Option<&'static str> {
        SIMULATORS
            .iter()
            .copied()
            .find(|sim| find_in_path(sim).is_some())
    }

    fn start_argv(simulator: &str, headless: bool, world: Option<&str>, extra: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = match simulator {
            "gz" => vec!["gz".to_string(), "sim".to_string()],
            "ign" => vec!["ign".to_string(), "gazebo".to_string()],
            _ => vec!["gazebo".to_string()],
        };
        if headless {
            if simulator == "gazebo" {
                argv.push("--headless".to_string());
            } else {
                argv.push("-s".to_string());
                argv.push("--headless-rendering".to_string());
            }
        }
        if let Some(world) = world {
            argv.push(world.to_string());
        }
        argv.extend_from_slice(extra);
        argv
    }

    fn start(&self, args: &[String], config: &ConfigSnapshot) -> Result<DispatchResult> {
        let mut headless = config.get_bool("simulation.headless_mode").unwrap_or(false);
        let mut world = config
            .get_str("simulation.default_world")
            .map(String::from);
        let mut extra: Vec<String> = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--headless" => headless = true,
                "--world" => {
                    world = Some(iter.next().cloned().context("--world requires a value")?);
                }
                other => extra.push(other.to_string()),
            }
        }

        let Some(simulator) = Self::preferred_simulator() else {
            bail!("no Gazebo simulator found on PATH (tried gz, ign, gazebo)");
        };

        let argv = Self::start_argv(simulator, headless, world.as_deref(), &extra);
        info!(simulator, headless, "starting simulator");
        let result = run_streaming(&argv, None)?;
        Ok(DispatchResult::code(result.exit_code).with_summary(json!({
            "simulator": simulator,
            "headless": headless,
        })))
    }

    fn worlds(&self) -> Result<DispatchResult> {
        let mut worlds: Vec<PathBuf> = Vec::new();
        for var in RESOURCE_PATH_VARS {
            if let Some(raw) = std::env::var_os(var) {
                for dir in std::env::split_paths(&raw) {
                    collect_world_files(&dir, &mut worlds);
                }
            }
        }
        worlds.sort();
        worlds.dedup();

        if worlds.is_empty() {
            println!("No world files found on the simulator resource paths.");
        } else {
            for world in &worlds {
                println!("{}", world.display());
            }
        }
        Ok(DispatchResult::success().with_summary(json!({ "count": worlds.len() })))
    }
}

fn collect_world_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            collect_world_files(&path, out);
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("sdf") | Some("world")
        ) {
            out.push(path);
        }
    }
}

impl Default for SimPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimPlugin {
    fn name(&self) -> &str {
        "simulation"
    }

    fn description(&self) -> &str {
        "Gazebo simulation launcher and world discovery"
    }

    fn is_available(&self) -> bool {
        Self::preferred_simulator().is_some()
    }

    fn commands(&self) -> Vec<String> {
        vec!["sim".to_string()]
    }

    fn execute(
        &self,
        command: &str,
        args: &[String],
        config: &ConfigSnapshot,
    ) -> Result<DispatchResult> {
        if command != "sim" {
            bail!("simulation plugin does not handle '{command}'");
        }
        match args.first().map(String::as_str) {
            Some("worlds") => self.worlds(),
            Some("start") => self.start(&args[1..], config),
            Some(flag) if flag.starts_with('-') => self.start(args, config),
            None => self.start(args, config),
            Some(other) => bail!("unknown sim subcommand '{other}'"),
        }
    }
}
