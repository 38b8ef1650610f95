//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded by the binary
//! first) and can be overridden by command-line flags.

use std::env;
use std::path::PathBuf;

use crate::logs::{log_warning, LogLevel};

/// Snapshot file used when `W2CON_STATE_FILE` is not set.
pub const DEFAULT_STATE_FILE: &str = "app_state.json";

/// Export file used when `W2CON_EXPORT_FILE` is not set.
pub const DEFAULT_EXPORT_FILE: &str = "w2_con.csv";

pub const STATE_FILE_VAR: &str = "W2CON_STATE_FILE";
pub const EXPORT_FILE_VAR: &str = "W2CON_EXPORT_FILE";
pub const LOG_LEVEL_VAR: &str = "W2CON_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Structured snapshot, loaded at start and written after each change.
    pub state_file: PathBuf,
    /// Default target of the flattened export.
    pub export_file: PathBuf,
    /// Minimum level echoed to stderr.
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; an
    /// unreadable log level falls back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let log_level = match get(LOG_LEVEL_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|err: String| {
                log_warning(format!("{}: {}, using {:?}", LOG_LEVEL_VAR, err, defaults.log_level));
                defaults.log_level
            }),
            None => defaults.log_level,
        };

        Self {
            state_file: get(STATE_FILE_VAR).map_or(defaults.state_file, PathBuf::from),
            export_file: get(EXPORT_FILE_VAR).map_or(defaults.export_file, PathBuf::from),
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
        assert_eq!(
            Config::from_lookup(lookup(&[(STATE_FILE_VAR, "  ")])).state_file,
            PathBuf::from(DEFAULT_STATE_FILE)
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (STATE_FILE_VAR, "/tmp/w2/state.json"),
            (EXPORT_FILE_VAR, "out.csv"),
            (LOG_LEVEL_VAR, "warning"),
        ]));
        assert_eq!(config.state_file, PathBuf::from("/tmp/w2/state.json"));
        assert_eq!(config.export_file, PathBuf::from("out.csv"));
        assert_eq!(config.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_bad_log_level_falls_back() {
        let config = Config::from_lookup(lookup(&[(LOG_LEVEL_VAR, "chatty")]));
        assert_eq!(config.log_level, LogLevel::Info);
    }
}
