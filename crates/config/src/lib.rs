//! Layered configuration for the OneCode CLI.
//!
//! Resolution order is fixed: built-in defaults < conventional user file
//! < explicit `--config` file < `ONECODE_*` environment overrides < CLI
//! overrides. Later sources always win on key collision. The result is an
//! immutable [`ConfigSnapshot`] built once per invocation.

pub mod defaults;
pub mod env;
pub mod io;
pub mod merge;
pub mod snapshot;

pub use env::coerce_scalar;
pub use io::{config_dir, load_yaml, user_config_path, write_user_config};
pub use merge::{deep_merge, insert_path};
pub use snapshot::ConfigSnapshot;

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

/// Resolve the effective configuration for this invocation.
///
/// `explicit_file` is the path given via `--config`: it must exist and
/// parse, otherwise resolution fails before dispatch. The conventional
/// user file is skipped silently when absent.
pub fn resolve(explicit_file: Option<&Path>, cli_overrides: &Value) -> Result<ConfigSnapshot> {
    let user_path = io::user_config_path();
    let user_file = user_path.exists().then_some(user_path.as_path());
    resolve_from(
        user_file,
        explicit_file,
        env::environment_overrides(),
        cli_overrides,
    )
}

fn resolve_from(
    user_file: Option<&Path>,
    explicit_file: Option<&Path>,
    env_layer: Value,
    cli_overrides: &Value,
) -> Result<ConfigSnapshot> {
    let mut tree = defaults::default_config();

    // An empty YAML document parses as null; treat it as an empty layer
    // rather than letting it replace the tree wholesale.
    if let Some(path) = user_file {
        let layer = io::load_yaml(path)?;
        if !layer.is_null() {
            merge::deep_merge(&mut tree, &layer);
        }
    }

    if let Some(path) = explicit_file {
        let layer = io::load_required_yaml(path)?;
        if !layer.is_null() {
            merge::deep_merge(&mut tree, &layer);
        }
    }

    merge::deep_merge(&mut tree, &env_layer);
    merge::deep_merge(&mut tree, cli_overrides);

    Ok(ConfigSnapshot::new(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onecode_core::OnecodeError;
    use serde_json::json;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn env_layer(vars: &[(&str, &str)]) -> Value {
        env::overrides_from(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn defaults_only() {
        let snapshot = resolve_from(None, None, json!({}), &json!({})).unwrap();
        assert_eq!(snapshot.get_str("build.cmake_build_type"), Some("Release"));
        assert_eq!(snapshot.get_bool("build.symlink_install"), Some(true));
    }

    #[test]
    fn environment_strictly_wins_over_file() {
        // Defaults declare Release; the user file sets parallel_jobs;
        // the environment flips the build type to Debug.
        let dir = tempfile::tempdir().unwrap();
        let user = write_file(dir.path(), "config.yaml", "build:\n  parallel_jobs: 4\n");
        let env = env_layer(&[("ONECODE_BUILD_CMAKE_BUILD_TYPE", "Debug")]);

        let snapshot = resolve_from(Some(&user), None, env, &json!({})).unwrap();
        assert_eq!(snapshot.get_str("build.cmake_build_type"), Some("Debug"));
        assert_eq!(snapshot.get_i64("build.parallel_jobs"), Some(4));
    }

    #[test]
    fn env_result_matches_absent_file_key() {
        // Priority associativity: with the env override in place, the
        // file's value for the same key must be unobservable.
        let dir = tempfile::tempdir().unwrap();
        let with_key = write_file(
            dir.path(),
            "a.yaml",
            "build:\n  cmake_build_type: RelWithDebInfo\n",
        );
        let without_key = write_file(dir.path(), "b.yaml", "build: {}\n");
        let env = env_layer(&[("ONECODE_BUILD_CMAKE_BUILD_TYPE", "Debug")]);

        let a = resolve_from(Some(&with_key), None, env.clone(), &json!({})).unwrap();
        let b = resolve_from(Some(&without_key), None, env, &json!({})).unwrap();
        assert_eq!(
            a.get_str("build.cmake_build_type"),
            b.get_str("build.cmake_build_type")
        );
    }

    #[test]
    fn cli_overrides_beat_environment() {
        let env = env_layer(&[("ONECODE_LOGGING_LEVEL", "info")]);
        let cli = json!({ "logging": { "level": "debug" } });
        let snapshot = resolve_from(None, None, env, &cli).unwrap();
        assert_eq!(snapshot.get_str("logging.level"), Some("debug"));
    }

    #[test]
    fn explicit_missing_file_is_fatal() {
        let err = resolve_from(
            None,
            Some(Path::new("/nonexistent/onecode.yaml")),
            json!({}),
            &json!({}),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OnecodeError>(),
            Some(OnecodeError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_file(dir.path(), "bad.yaml", "build: [unclosed\n");
        let err = resolve_from(None, Some(&bad), json!({}), &json!({})).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OnecodeError>(),
            Some(OnecodeError::ConfigParse { .. })
        ));
    }

    #[test]
    fn unknown_sections_are_preserved_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let user = write_file(dir.path(), "config.yaml", "telemetry:\n  endpoint: none\n");
        let snapshot = resolve_from(Some(&user), None, json!({}), &json!({})).unwrap();
        assert_eq!(snapshot.get_str("telemetry.endpoint"), Some("none"));
        assert_eq!(snapshot.unknown_sections(), vec!["telemetry".to_string()]);
    }
}
