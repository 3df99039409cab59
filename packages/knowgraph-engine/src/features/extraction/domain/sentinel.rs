//! Sentinel registry

use std::collections::BTreeMap;

use crate::config::{ConfigResult, EngineConfig};

/// A registered sentinel token and the schema variant it introduces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    pub token: String,
    pub variant: String,
    pub rank: u32,
}

/// Registered sentinels, matched exactly and case-sensitively
#[derive(Debug, Clone)]
pub struct SentinelRegistry {
    sentinels: Vec<Sentinel>,
    ranks: BTreeMap<String, u32>,
}

impl SentinelRegistry {
    /// Build from a validated configuration
    pub fn from_config(config: &EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        let sentinels = config
            .sentinels
            .iter()
            .map(|s| Sentinel {
                token: s.token.clone(),
                variant: s.variant.clone(),
                rank: s.rank,
            })
            .collect::<Vec<_>>();
        Ok(Self::from_sentinels(sentinels))
    }

    fn from_sentinels(sentinels: Vec<Sentinel>) -> Self {
        let ranks = sentinels
            .iter()
            .map(|s| (s.variant.clone(), s.rank))
            .collect();
        Self { sentinels, ranks }
    }

    /// Sentinel whose token equals `candidate` exactly
    pub fn match_token(&self, candidate: &str) -> Option<&Sentinel> {
        self.sentinels.iter().find(|s| s.token == candidate)
    }

    pub fn rank_of(&self, variant: &str) -> Option<u32> {
        self.ranks.get(variant).copied()
    }

    /// Variants ordered by rank (oldest first)
    pub fn variants(&self) -> Vec<&str> {
        let mut variants: Vec<(&str, u32)> =
            self.ranks.iter().map(|(v, r)| (v.as_str(), *r)).collect();
        variants.sort_by_key(|(_, r)| *r);
        variants.into_iter().map(|(v, _)| v).collect()
    }

    pub fn len(&self) -> usize {
        self.sentinels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentinels.is_empty()
    }
}

impl Default for SentinelRegistry {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self::from_sentinels(
            config
                .sentinels
                .into_iter()
                .map(|s| Sentinel {
                    token: s.token,
                    variant: s.variant,
                    rank: s.rank,
                })
                .collect(),
        )
    }
}
