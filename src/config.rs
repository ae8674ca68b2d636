// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support.
//!
//! Loads configuration from .symdexrc.toml in the current directory or
//! ~/.config/symdex/config.toml.

use serde::Deserialize;
use std::path::PathBuf;

use crate::indexer::scanner::{DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_SIZE};

/// Configuration loaded from .symdexrc.toml or ~/.config/symdex/config.toml.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of results to return.
    pub max_results: Option<usize>,
    /// Default output format (text or json).
    pub default_format: Option<String>,
    /// Substring patterns excluded from the walk.
    pub exclude_patterns: Vec<String>,
    /// Cap on indexed files per project.
    pub max_files: Option<usize>,
    /// Per-file size cap in KiB.
    pub max_file_size_kb: Option<u64>,
}

impl Config {
    /// Load configuration, project file winning over the home config.
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(&PathBuf::from(".symdexrc.toml")) {
            return config;
        }
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("symdex").join("config.toml");
            if let Some(config) = Self::load_from_path(&path) {
                return config;
            }
        }
        Self::default()
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unparseable config");
                None
            }
        }
    }

    /// Merge CLI options with config (CLI wins).
    pub fn merge_max_results(&self, cli_value: Option<usize>) -> usize {
        cli_value.or(self.max_results).unwrap_or(10)
    }

    pub fn max_files(&self) -> usize {
        self.max_files.unwrap_or(DEFAULT_MAX_FILES)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb
            .map(|kb| kb * 1024)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn wants_json(&self) -> bool {
        self.default_format
            .as_deref()
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.merge_max_results(None), 10);
        assert_eq!(config.max_files(), DEFAULT_MAX_FILES);
        assert_eq!(config.max_file_size_bytes(), DEFAULT_MAX_FILE_SIZE);
        assert!(!config.wants_json());
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config = Config {
            max_results: Some(25),
            ..Config::default()
        };
        assert_eq!(config.merge_max_results(Some(3)), 3);
        assert_eq!(config.merge_max_results(None), 25);
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
max_results = 50
default_format = "json"
exclude_patterns = ["generated"]
max_file_size_kb = 64
"#,
        )
        .expect("valid config");
        assert_eq!(config.max_results, Some(50));
        assert!(config.wants_json());
        assert_eq!(config.exclude_patterns, vec!["generated"]);
        assert_eq!(config.max_file_size_bytes(), 64 * 1024);
    }
}
