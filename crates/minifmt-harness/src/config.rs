//! Harness configuration.
//!
//! Resolved from the environment, then overridden by command-line flags:
//! - `MINIFMT_FIXTURE_DIR`: directory of fixture JSON files (default: the
//!   crate's own `fixtures/`).
//! - `MINIFMT_LOG`: path of the JSONL event log. Unset means no log.
//! - `MINIFMT_LOG_LEVEL`: minimum level written to the log (default `info`).
//!
//! Empty values count as unset.

use std::path::PathBuf;

use crate::structured_log::LogLevel;

pub const FIXTURE_DIR_ENV: &str = "MINIFMT_FIXTURE_DIR";
pub const LOG_PATH_ENV: &str = "MINIFMT_LOG";
pub const LOG_LEVEL_ENV: &str = "MINIFMT_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub fixture_dir: PathBuf,
    pub log_path: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixture_dir: default_fixture_dir(),
            log_path: None,
            log_level: LogLevel::Info,
        }
    }
}

impl HarnessConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            fixture_dir: get(FIXTURE_DIR_ENV).map_or(defaults.fixture_dir, PathBuf::from),
            log_path: get(LOG_PATH_ENV).map(PathBuf::from),
            log_level: get(LOG_LEVEL_ENV)
                .map_or(defaults.log_level, |v| LogLevel::from_str_loose(&v)),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, fixture_dir: Option<PathBuf>, log_path: Option<PathBuf>) -> Self {
        if let Some(dir) = fixture_dir {
            self.fixture_dir = dir;
        }
        if log_path.is_some() {
            self.log_path = log_path;
        }
        self
    }
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = HarnessConfig::from_lookup(lookup(&[]));
        assert_eq!(config, HarnessConfig::default());
        assert!(config.fixture_dir.ends_with("fixtures"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn reads_every_variable() {
        let config = HarnessConfig::from_lookup(lookup(&[
            (FIXTURE_DIR_ENV, "/tmp/fx"),
            (LOG_PATH_ENV, "/tmp/run.jsonl"),
            (LOG_LEVEL_ENV, "Debug"),
        ]));
        assert_eq!(config.fixture_dir, PathBuf::from("/tmp/fx"));
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/run.jsonl")));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = HarnessConfig::from_lookup(lookup(&[(FIXTURE_DIR_ENV, "  "), (LOG_PATH_ENV, "")]));
        assert_eq!(config.fixture_dir, default_fixture_dir());
        assert_eq!(config.log_path, None);
    }

    #[test]
    fn flags_override_environment() {
        let config = HarnessConfig::from_lookup(lookup(&[(LOG_PATH_ENV, "/env.jsonl")]))
            .with_overrides(Some(PathBuf::from("/cli")), None);
        assert_eq!(config.fixture_dir, PathBuf::from("/cli"));
        assert_eq!(config.log_path, Some(PathBuf::from("/env.jsonl")));
    }
}
