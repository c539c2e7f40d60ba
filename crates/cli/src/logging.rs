//! Tracing subscriber setup.
//!
//! Level precedence: RUST_LOG when set, otherwise --debug, then
//! --verbose, then the configured `logging.level`, defaulting to warn.
//! Diagnostics go to stderr so passthrough stdout stays clean; an
//! optional file sink is added when `logging.file` is configured.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use onecode_config::ConfigSnapshot;
use onecode_core::GlobalFlags;

pub fn init(flags: &GlobalFlags, config: &ConfigSnapshot) {
    let level = if flags.debug {
        "debug".to_string()
    } else if flags.verbose {
        "info".to_string()
    } else {
        config.get_str("logging.level").unwrap_or("warn").to_string()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = config.get_str("logging.file").map(|path| {
        let path = std::path::PathBuf::from(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "onecode.log".into());
        let appender = tracing_appender::rolling::never(dir, name);
        fmt::layer().with_writer(appender).with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init();
}
