//! Configuration layer.
//!
//! Settings come from `.codemap/config.toml` under the project root when the
//! file exists, defaults otherwise. Every field is optional in the file;
//! unknown keys are rejected so typos surface instead of silently falling
//! back to a default.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::extractor::{SafetyPolicy, MAX_FILE_BYTES, SOURCE_EXTENSIONS};
use crate::render::AUTO_DSL_THRESHOLD;

pub const CONFIG_FILE: &str = ".codemap/config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Size ceiling for structural parsing, in bytes.
    pub max_file_bytes: usize,
    /// File extensions treated as source during discovery.
    pub extensions: Vec<String>,
    /// Node count at which the auto format switches to the compact DSL.
    pub auto_dsl_threshold: usize,
    /// Extra suspicious-content regexes appended to the built-in list.
    pub extra_suspicious_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            extensions: SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            auto_dsl_threshold: AUTO_DSL_THRESHOLD,
            extra_suspicious_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from the project root. A missing or unreadable file means
    /// defaults; a present but invalid file is an error.
    pub fn load(root: &Path) -> Result<Config> {
        let path = root.join(CONFIG_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Config::default());
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config unreadable; using defaults");
                return Ok(Config::default());
            }
        };
        let config: Config = toml::from_str(&raw)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// The extractor gate policy this config describes.
    pub fn safety_policy(&self) -> SafetyPolicy {
        SafetyPolicy::new(self.max_file_bytes, &self.extra_suspicious_patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodemapError;

    #[test]
    fn defaults_match_builtin_limits() {
        let config = Config::default();
        assert_eq!(config.max_file_bytes, MAX_FILE_BYTES);
        assert_eq!(config.auto_dsl_threshold, AUTO_DSL_THRESHOLD);
        assert_eq!(config.extensions, vec!["ts", "tsx", "js", "jsx"]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.max_file_bytes, MAX_FILE_BYTES);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".codemap")).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "max-file-bytes = 2048\nextra-suspicious-patterns = [\"dangerousApi\"]\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.max_file_bytes, 2048);
        assert_eq!(config.extra_suspicious_patterns, vec!["dangerousApi"]);
        assert_eq!(config.auto_dsl_threshold, AUTO_DSL_THRESHOLD);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".codemap")).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "max-file-byte = 10\n").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CodemapError::InvalidConfig(_))
        ));
    }
}
