//! Induction configuration, persisted as TOML.

use std::fmt;
use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving an [`InductionConfig`].
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read induction config: {path}")]
    #[diagnostic(
        code(wrapgen::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse induction config {path}: {message}")]
    #[diagnostic(
        code(wrapgen::config::parse),
        help(
            "Check the TOML syntax. Valid keys are `strategy` (\"linear\" | \"indexed\"), \
             `on_collision` (\"sum\" | \"reject\"), `min_support` and `parallel_threshold`."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to write induction config: {path}")]
    #[diagnostic(
        code(wrapgen::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// How rules are assigned to clusters. Both strategies produce identical
/// clusters in identical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStrategy {
    /// First-fit scan over existing clusters.
    #[default]
    Linear,
    /// Hash index keyed by rule shape.
    Indexed,
}

impl fmt::Display for ClusterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterStrategy::Linear => write!(f, "linear"),
            ClusterStrategy::Indexed => write!(f, "indexed"),
        }
    }
}

/// What to do when two clusters generalize to the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightCollision {
    /// Merge into one entry whose support is the sum.
    #[default]
    Sum,
    /// Fail with `InductionError::WeightCollision`.
    Reject,
}

/// Configuration for rule induction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InductionConfig {
    #[serde(default)]
    pub strategy: ClusterStrategy,
    #[serde(default)]
    pub on_collision: WeightCollision,
    /// Weighted output drops rules with less support than this (default: 1).
    #[serde(default = "default_min_support")]
    pub min_support: usize,
    /// Cluster count at which per-cluster folds run in parallel (default: 64).
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_min_support() -> usize {
    1
}
fn default_parallel_threshold() -> usize {
    64
}

impl Default for InductionConfig {
    fn default() -> Self {
        Self {
            strategy: ClusterStrategy::default(),
            on_collision: WeightCollision::default(),
            min_support: default_min_support(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl InductionConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: InductionConfig = toml::from_str("").unwrap();
        assert_eq!(config, InductionConfig::default());
        assert_eq!(config.min_support, 1);
        assert_eq!(config.strategy, ClusterStrategy::Linear);
        assert_eq!(config.on_collision, WeightCollision::Sum);
    }

    #[test]
    fn parses_lowercase_variants() {
        let config: InductionConfig = toml::from_str(
            r#"
            strategy = "indexed"
            on_collision = "reject"
            min_support = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, ClusterStrategy::Indexed);
        assert_eq!(config.on_collision, WeightCollision::Reject);
        assert_eq!(config.min_support, 2);
        assert_eq!(config.parallel_threshold, 64);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("induce.toml");
        let config = InductionConfig {
            strategy: ClusterStrategy::Indexed,
            parallel_threshold: 8,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(InductionConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "strategy = \"quadratic\"").unwrap();
        assert!(matches!(
            InductionConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            InductionConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
