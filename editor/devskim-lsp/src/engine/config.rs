//! Configuration loading for the language server
//!
//! Loads settings from YAML configuration files.

use super::error::ConfigError;
use devskim_engine::{
    Confidence, Languages, ProcessorOptions, RuleProcessor, RuleSet, Severity,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main server configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server settings
    pub engine: EngineSettings,
    /// Analysis settings
    pub analysis: AnalysisSettings,
}

/// Core server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Server name
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Rule engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub severity_filter: Vec<Severity>,
    pub confidence_filter: Vec<Confidence>,
    /// Match rules in parallel
    pub parallel: bool,
    /// Honour `DevSkim: ignore` comments
    pub enable_suppressions: bool,
    /// Extra JSON rules merged with the embedded defaults
    pub rules_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            name: "devskim-lsp".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            severity_filter: Severity::default_filter(),
            confidence_filter: Confidence::default_filter(),
            parallel: true,
            enable_suppressions: true,
            rules_path: None,
        }
    }
}

impl AnalysisSettings {
    /// Build a rule processor from the embedded rules plus `rules_path`
    pub fn build_processor(&self) -> Result<RuleProcessor, ConfigError> {
        let mut rules = RuleSet::default_rules()?;
        if let Some(path) = &self.rules_path {
            rules.merge(RuleSet::load(path)?)?;
            tracing::info!("Loaded extra rules from {}", path.display());
        }

        let options = ProcessorOptions {
            languages: Languages::load_embedded()?,
            severity_filter: self.severity_filter.clone(),
            confidence_filter: self.confidence_filter.clone(),
            parallel: self.parallel,
            enable_suppressions: self.enable_suppressions,
        };

        Ok(RuleProcessor::new(rules, options)?)
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from default locations
    ///
    /// An unreadable or invalid file is skipped with a warning.
    pub fn load_default(root: &Path) -> Self {
        let candidates = [
            root.join(".devskim-lsp.yaml"),
            root.join(".devskim-lsp.yml"),
            root.join("devskim-lsp.yaml"),
            root.join("devskim-lsp.yml"),
        ];

        for candidate in &candidates {
            if candidate.exists() {
                match Self::load(candidate) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring config: {}", e),
                }
            }
        }

        Self::default()
    }
}
