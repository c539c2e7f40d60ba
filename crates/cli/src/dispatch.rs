//! Command routing.
//!
//! The first argv token selects a route: the `ros2` passthrough marker,
//! a built-in command, a plugin-claimed command, or unknown. Faults at
//! the dispatch boundary are reported and mapped to exit codes, never
//! propagated as panics.

use anyhow::Result;
use tracing::{debug, error};

use onecode_config::ConfigSnapshot;
use onecode_core::{DispatchResult, GlobalFlags, OnecodeError};
use onecode_plugins::PluginRegistry;

use crate::commands;
use crate::passthrough;

/// First token that routes the rest of argv straight to the ROS 2 CLI.
pub const PASSTHROUGH_MARKER: &str = onecode_core::ROS2_COMMAND;

const BUILTIN_COMMANDS: [&str; 3] = ["version", "plugins", "config"];

pub struct DispatchRequest {
    pub argv: Vec<String>,
    pub config: ConfigSnapshot,
    pub flags: GlobalFlags,
}

#[derive(Debug, PartialEq)]
enum Route {
    Usage,
    Passthrough,
    Version,
    Plugins,
    Config,
    Plugin { name: String },
    Unknown { command: String },
}

pub struct Dispatcher<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Route and execute, converting any fault into an exit code.
    pub fn dispatch(&self, request: &DispatchRequest) -> DispatchResult {
        match self.execute(request) {
            Ok(result) => result,
            Err(e) => {
                if request.flags.debug {
                    error!("{e:#}");
                } else {
                    error!("{e}");
                }
                let code = match e.downcast_ref::<OnecodeError>() {
                    Some(known) => known.exit_code(),
                    None => 1,
                };
                DispatchResult::code(code)
            }
        }
    }

    fn route(&self, request: &DispatchRequest) -> Route {
        let Some(first) = request.argv.first() else {
            return Route::Usage;
        };
        match first.as_str() {
            PASSTHROUGH_MARKER => Route::Passthrough,
            "version" => Route::Version,
            "plugins" => Route::Plugins,
            "config" => Route::Config,
            command => {
                if let Some(entry) = self.registry.find_command(command) {
                    Route::Plugin {
                        name: entry.descriptor.name.clone(),
                    }
                } else if request
                    .config
                    .get_bool("passthrough.implicit")
                    .unwrap_or(false)
                {
                    Route::Passthrough
                } else {
                    Route::Unknown {
                        command: command.to_string(),
                    }
                }
            }
        }
    }

    fn execute(&self, request: &DispatchRequest) -> Result<DispatchResult> {
        let route = self.route(request);
        debug!(?route, "dispatching");
        match route {
            Route::Usage => {
                commands::usage();
                Ok(DispatchResult::success())
            }
            Route::Passthrough => {
                // The marker is stripped; implicit passthrough keeps argv whole.
                let argv = if request.argv.first().map(String::as_str)
                    == Some(PASSTHROUGH_MARKER)
                {
                    &request.argv[1..]
                } else {
                    &request.argv[..]
                };
                passthrough::run(argv)
            }
            Route::Version => commands::version(),
            Route::Plugins => {
                commands::list_plugins(self.registry);
                Ok(DispatchResult::success())
            }
            Route::Config => commands::config(&request.argv[1..], &request.config),
            Route::Plugin { name } => self.run_plugin(&name, request),
            Route::Unknown { command } => {
                let suggestions = self.suggestions(&command);
                if suggestions.is_empty() {
                    eprintln!("Unknown command '{command}'. Run 'onecode plugins' to list available commands.");
                } else {
                    eprintln!("Unknown command '{command}'. Did you mean: {}?", suggestions.join(", "));
                }
                let err = OnecodeError::UnknownCommand {
                    command,
                    suggestions,
                };
                // The eprintln above is the user-facing report; keep the
                // trace below the default filter to avoid a duplicate line.
                debug!("{err}");
                Ok(DispatchResult::code(err.exit_code()))
            }
        }
    }

    fn run_plugin(&self, name: &str, request: &DispatchRequest) -> Result<DispatchResult> {
        let Some(entry) = self.registry.get(name) else {
            // Routed from find_command, so this only happens on a race
            // with registry mutation; treat as unknown.
            return Ok(DispatchResult::code(2));
        };
        if !entry.descriptor.available {
            eprintln!(
                "Plugin '{}' is installed but its backing tool is not available on this system.",
                entry.descriptor.name
            );
            return Ok(DispatchResult::code(1));
        }
        let command = request.argv.first().cloned().unwrap_or_default();
        let args = request.argv.get(1..).unwrap_or(&[]);
        entry.instance.execute(&command, args, &request.config)
    }

    /// Commands sharing a two-character prefix with the unknown token.
    fn suggestions(&self, command: &str) -> Vec<String> {
        let prefix: String = command.chars().take(2).collect();
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut candidates: Vec<String> = BUILTIN_COMMANDS
            .iter()
            .map(|c| c.to_string())
            .chain(self.registry.command_names())
            .filter(|c| c.starts_with(&prefix))
            .collect();
        candidates.sort();
        candidates.dedup();
        candidates
    }
}
