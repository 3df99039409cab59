//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Sentinel with an empty token
    #[error("Sentinel for variant '{variant}' has an empty token")]
    EmptyToken { variant: String },

    /// Same token registered twice
    #[error("Sentinel token '{0}' is registered more than once")]
    DuplicateToken(String),

    /// One variant declared with different ranks
    #[error("Variant '{variant}' is declared with conflicting ranks {first} and {second}")]
    ConflictingRank {
        variant: String,
        first: u32,
        second: u32,
    },

    /// Two variants share a rank, so the merge order would be ambiguous
    #[error("Variants '{first}' and '{second}' share rank {rank}; ranks must form a total order")]
    DuplicateRank {
        rank: u32,
        first: String,
        second: String,
    },

    /// No sentinel registered at all
    #[error("At least one sentinel must be configured")]
    NoSentinels,

    /// Unknown language name
    #[error("Unknown language '{0}'. Valid languages: python, java, go, typescript, rust")]
    UnknownLanguage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
