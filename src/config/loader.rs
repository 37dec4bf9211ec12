//! Configuration file loading.
//!
//! A successfully loaded config is always validated. I/O, parse and
//! validation failures are distinguished in the error type.

use super::SimConfig;
use crate::validation::{summarize, Violation};
use std::path::Path;
use stillwater::validation::Validation;
use thiserror::Error;

/// Errors raised while loading a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {}", summarize(.0))]
    Invalid(Vec<Violation>),
}

/// Load a [`SimConfig`] from a TOML file.
pub fn load_from_file(path: &Path) -> Result<SimConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.display().to_string(),
        source: e,
    })?;

    load_from_str(&content, &path.display().to_string())
}

/// Load a [`SimConfig`] from a TOML string.
///
/// `source_name` identifies the source in error messages.
pub fn load_from_str(content: &str, source_name: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        file: source_name.to_string(),
        source: e,
    })?;

    match config.validate() {
        Validation::Success(_) => {
            tracing::debug!(source = source_name, "configuration loaded");
            Ok(config)
        }
        Validation::Failure(errors) => Err(ConfigError::Invalid(errors.iter().cloned().collect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = load_from_str("", "empty").unwrap();

        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = load_from_str(
            r#"
tick_period_ms = 250

[traffic]
green_ticks = 5
"#,
            "partial",
        )
        .unwrap();

        assert_eq!(config.tick_period_ms, 250);
        assert_eq!(config.traffic.green_ticks, 5);
        assert_eq!(config.traffic.yellow_ticks, 3);
        assert_eq!(config.serial_adder.a, "0101");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = load_from_str("tick_period_ms = [", "broken.toml");

        match result {
            Err(ConfigError::Parse { file, .. }) => assert_eq!(file, "broken.toml"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_values_report_all_violations() {
        let result = load_from_str(
            r#"
tick_period_ms = 0

[sequence]
tape = "1021"
"#,
            "bad",
        );

        match result {
            Err(ConfigError::Invalid(violations)) => assert_eq!(violations.len(), 2),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_from_file(Path::new("/nonexistent/logic-dojo.toml"));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("logic-dojo-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "history_limit = 16").unwrap();
        drop(file);

        let config = load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.history_limit, 16);
    }
}
