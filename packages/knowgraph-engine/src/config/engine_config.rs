//! Engine configuration model and YAML I/O

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use crate::shared::LanguageId;

/// Current configuration schema version
pub const CONFIG_VERSION: u32 = 1;

const SUPPORTED_VERSIONS: &[u32] = &[CONFIG_VERSION];

/// A registered sentinel token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentinelConfig {
    /// Literal marker as it appears in source comments (case-sensitive)
    pub token: String,
    /// Schema variant the token introduces
    pub variant: String,
    /// Recency rank of the variant; higher ranks win field-level merges
    pub rank: u32,
}

impl SentinelConfig {
    pub fn new(token: impl Into<String>, variant: impl Into<String>, rank: u32) -> Self {
        Self {
            token: token.into(),
            variant: variant.into(),
            rank,
        }
    }
}

/// Worker pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelConfig {
    /// Number of workers (0 = one per logical CPU)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { workers: 0 }
    }
}

impl ParallelConfig {
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

/// Engine configuration (YAML schema v1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(default = "default_sentinels")]
    pub sentinels: Vec<SentinelConfig>,

    /// Enabled structured adapters by language name
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Scan files without a structured adapter as a single module-level span
    #[serde(default = "default_fallback")]
    pub fallback: bool,

    #[serde(default)]
    pub parallel: ParallelConfig,
}

fn default_sentinels() -> Vec<SentinelConfig> {
    vec![
        SentinelConfig::new("@codegraph", "codegraph", 0),
        SentinelConfig::new("@knowgraph", "knowgraph", 1),
        SentinelConfig::new("knowgraph:", "knowgraph", 1),
    ]
}

fn default_languages() -> Vec<String> {
    LanguageId::ALL
        .iter()
        .map(|lang| lang.name().to_string())
        .collect()
}

fn default_fallback() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sentinels: default_sentinels(),
            languages: default_languages(),
            fallback: default_fallback(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        if raw.get("version").is_none() {
            return Err(ConfigError::MissingVersion);
        }

        let config: EngineConfig = serde_yaml::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check version, sentinel table and language names
    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        if self.sentinels.is_empty() {
            return Err(ConfigError::NoSentinels);
        }

        let mut tokens: Vec<&str> = Vec::with_capacity(self.sentinels.len());
        let mut variant_ranks: BTreeMap<&str, u32> = BTreeMap::new();
        for sentinel in &self.sentinels {
            if sentinel.token.trim().is_empty() {
                return Err(ConfigError::EmptyToken {
                    variant: sentinel.variant.clone(),
                });
            }
            if tokens.contains(&sentinel.token.as_str()) {
                return Err(ConfigError::DuplicateToken(sentinel.token.clone()));
            }
            tokens.push(&sentinel.token);

            match variant_ranks.get(sentinel.variant.as_str()) {
                Some(&rank) if rank != sentinel.rank => {
                    return Err(ConfigError::ConflictingRank {
                        variant: sentinel.variant.clone(),
                        first: rank,
                        second: sentinel.rank,
                    });
                }
                Some(_) => {}
                None => {
                    variant_ranks.insert(&sentinel.variant, sentinel.rank);
                }
            }
        }

        let mut rank_owner: BTreeMap<u32, &str> = BTreeMap::new();
        for (variant, rank) in &variant_ranks {
            if let Some(first) = rank_owner.insert(*rank, variant) {
                return Err(ConfigError::DuplicateRank {
                    rank: *rank,
                    first: first.to_string(),
                    second: variant.to_string(),
                });
            }
        }

        self.enabled_languages()?;
        Ok(())
    }

    /// Enabled structured adapters
    pub fn enabled_languages(&self) -> ConfigResult<Vec<LanguageId>> {
        let mut languages = Vec::with_capacity(self.languages.len());
        for name in &self.languages {
            let lang = LanguageId::from_name(name)
                .ok_or_else(|| ConfigError::UnknownLanguage(name.clone()))?;
            if !languages.contains(&lang) {
                languages.push(lang);
            }
        }
        Ok(languages)
    }
}
