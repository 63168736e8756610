//! YAML configuration.
//!
//! Every field is optional in the file; missing ones take their defaults.
//!
//! ```yaml
//! initial_token_capacity: 4096
//! pretty: true
//! extensions: [aws, tpl]
//! snippet_context_lines: 1
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::InfraError;
use crate::syntax::TokenRecorder;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "infrascript.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Records pre-allocated before a parse; the store doubles past it.
    pub initial_token_capacity: usize,
    /// Colorize trees and diagnostics. Unset means decide from the terminal.
    pub pretty: Option<bool>,
    /// File extensions `check` picks up when walking a directory.
    pub extensions: Vec<String>,
    pub snippet_context_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_token_capacity: TokenRecorder::DEFAULT_CAPACITY,
            pretty: None,
            extensions: vec!["aws".into(), "tpl".into(), "infra".into()],
            snippet_context_lines: 2,
        }
    }
}

impl Config {
    /// Reads `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else returns the defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, InfraError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(&fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, InfraError> {
        let text = fs::read_to_string(path).map_err(|source| InfraError::io(path, source))?;
        let config = Self::from_yaml(&text).map_err(|source| InfraError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// True when `path` ends in one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_yaml("snippet_context_lines: 0\n").unwrap();
        assert_eq!(config.snippet_context_lines, 0);
        assert_eq!(config.initial_token_capacity, 1024);
        assert_eq!(config.pretty, None);
    }

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_yaml("colour: red\n").is_err());
    }

    #[test]
    fn extension_match_ignores_case() {
        let config = Config::default();
        assert!(config.matches_extension(Path::new("infra/main.AWS")));
        assert!(!config.matches_extension(Path::new("README.md")));
        assert!(!config.matches_extension(Path::new("Makefile")));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let error = Config::load(Some(Path::new("/nonexistent/infrascript.yaml"))).unwrap_err();
        assert!(matches!(error, InfraError::Io { .. }));
    }
}
