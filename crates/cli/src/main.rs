//! OneCode Plant CLI entry point.
//!
//! Parses global flags, resolves configuration, initialises logging,
//! discovers plugins and hands the remaining argv to the dispatcher.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::{debug, warn};

use onecode_core::GlobalFlags;
use onecode_plugins::discover_and_load;

mod commands;
mod dispatch;
mod logging;
mod passthrough;

use dispatch::{DispatchRequest, Dispatcher};

#[derive(Parser, Debug)]
#[command(
    name = "onecode",
    about = "OneCode Plant: a unified CLI for the ROS 2 ecosystem",
    disable_help_subcommand = true
)]
struct Cli {
    /// Increase log verbosity to info level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging and full error chains.
    #[arg(long, global = true)]
    debug: bool,

    /// Explicit configuration file (missing file is a fatal error).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Command and arguments, forwarded untouched.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let flags = GlobalFlags {
        verbose: cli.verbose,
        debug: cli.debug,
    };

    let mut cli_overrides = json!({});
    if cli.debug {
        cli_overrides["logging"] = json!({ "level": "debug" });
    } else if cli.verbose {
        cli_overrides["logging"] = json!({ "level": "info" });
    }

    let config = match onecode_config::resolve(cli.config.as_deref(), &cli_overrides) {
        Ok(config) => config,
        Err(e) => {
            if cli.debug {
                eprintln!("error: {e:#}");
            } else {
                eprintln!("error: {e}");
            }
            return ExitCode::from(1);
        }
    };

    logging::init(&flags, &config);

    for section in config.unknown_sections() {
        warn!(section = %section, "unknown configuration section");
    }

    let (registry, diagnostics) = discover_and_load(&config);
    for diagnostic in &diagnostics {
        debug!(
            plugin = %diagnostic.plugin,
            source = %diagnostic.source,
            cause = %diagnostic.cause,
            "plugin load diagnostic"
        );
    }

    let dispatcher = Dispatcher::new(&registry);
    let request = DispatchRequest {
        argv: cli.args,
        config,
        flags,
    };
    let result = dispatcher.dispatch(&request);
    ExitCode::from(result.exit_code.clamp(0, 255) as u8)
}
