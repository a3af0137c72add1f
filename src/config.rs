//! YAML configuration file support for firmdedup.
//!
//! A single file carries the normalization rules and the decision thresholds.
//! [`DedupFileConfig::load`] layers `FIRMDEDUP__*` environment variables on
//! top of the file, so a deployment can tune a threshold without editing it
//! (`FIRMDEDUP__MATCHER__FUZZY_SEARCH_MIN_LENGTH=4`).
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "tr-registration"
//!
//! normalization:
//!   version: 1
//!   remove_company_suffixes: true
//!   company_suffixes: ["A.Ş.", "Ltd. Şti.", "GmbH"]
//!   common_words: ["tekstil", "sanayi", "ticaret"]
//!
//! matcher:
//!   fuzzy_search_min_length: 3
//!   confidence_bands:
//!     very_similar: 0.9
//!     similar: 0.8
//!   token_match:
//!     mode: exact
//!   max_candidates: 50
//!   explain: false
//! ```
//!
//! Sections and fields left out fall back to the built-in defaults.

use std::fs;
use std::path::Path;

use canonical::NormalizationConfig;
use matcher::{
    ConfidenceBands, DedupConfig, DuplicateDecisionEngine, DuplicateRules, MatchError,
    ScoreWeights, TokenMatchMode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "FIRMDEDUP";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("failed to layer configuration sources: {0}")]
    Layered(#[from] config::ConfigError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DedupFileConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalization: NormalizationConfig,

    #[serde(default)]
    pub matcher: MatcherYamlConfig,
}

impl DedupFileConfig {
    /// Load a YAML configuration file from the given path, without
    /// environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DedupFileConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file and apply `FIRMDEDUP__*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::load_yaml(&content)
    }

    /// Same as [`load`](Self::load) for YAML already in memory.
    pub fn load_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        Self::layered(yaml, environment())
    }

    fn layered(yaml: &str, env: config::Environment) -> Result<Self, ConfigLoadError> {
        let config: DedupFileConfig = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .add_source(env)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.dedup_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))
    }

    /// The engine configuration described by this file.
    pub fn dedup_config(&self) -> DedupConfig {
        self.matcher.to_dedup_config(&self.normalization)
    }

    pub fn build_engine(&self) -> Result<DuplicateDecisionEngine, MatchError> {
        DuplicateDecisionEngine::new(self.dedup_config())
    }
}

impl Default for DedupFileConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalization: NormalizationConfig::default(),
            matcher: MatcherYamlConfig::default(),
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Matcher section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherYamlConfig {
    #[serde(default = "default_fuzzy_search_min_length")]
    pub fuzzy_search_min_length: usize,

    #[serde(default)]
    pub confidence_bands: ConfidenceBands,

    #[serde(default)]
    pub weights: ScoreWeights,

    #[serde(default)]
    pub rules: DuplicateRules,

    #[serde(default)]
    pub token_match: TokenMatchMode,

    #[serde(default)]
    pub max_candidates: Option<usize>,

    #[serde(default = "default_parallel_min_candidates")]
    pub parallel_min_candidates: usize,

    #[serde(default)]
    pub explain: bool,
}

impl MatcherYamlConfig {
    fn to_dedup_config(&self, normalization: &NormalizationConfig) -> DedupConfig {
        DedupConfig {
            normalization: normalization.clone(),
            fuzzy_search_min_length: self.fuzzy_search_min_length,
            confidence_bands: self.confidence_bands,
            weights: self.weights,
            rules: self.rules,
            token_match: self.token_match,
            max_candidates: self.max_candidates,
            parallel_min_candidates: self.parallel_min_candidates,
            explain: self.explain,
        }
    }
}

impl Default for MatcherYamlConfig {
    fn default() -> Self {
        Self {
            fuzzy_search_min_length: default_fuzzy_search_min_length(),
            confidence_bands: ConfidenceBands::default(),
            weights: ScoreWeights::default(),
            rules: DuplicateRules::default(),
            token_match: TokenMatchMode::default(),
            max_candidates: None,
            parallel_min_candidates: default_parallel_min_candidates(),
            explain: false,
        }
    }
}

fn default_fuzzy_search_min_length() -> usize {
    DedupConfig::default().fuzzy_search_min_length
}

fn default_parallel_min_candidates() -> usize {
    DedupConfig::default().parallel_min_candidates
}
