//! Job configuration

use serde::Deserialize;
use sigil_vocab::{local, rdfs};

/// Configuration for the scheduled reconciliation jobs
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Whether the cross-batch duplicate detector is scheduled
    pub detect_enabled: bool,
    /// Seconds between duplicate-detection triggers
    pub detect_interval_secs: u64,
    /// Whether the global-identifier normalizer is scheduled
    pub normalize_enabled: bool,
    /// Seconds between normalization triggers
    pub normalize_interval_secs: u64,
    /// Foreign identifiers processed per normalization cycle
    pub page_size: usize,
    /// Transactions per commit (and per transaction-log write)
    pub commit_batch_size: usize,
    /// Property whose shared values indicate duplication
    pub shared_property: String,
    /// Namespace that marks an identifier as local
    pub local_namespace: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            detect_enabled: true,
            detect_interval_secs: 10,
            normalize_enabled: true,
            normalize_interval_secs: 60,
            page_size: 5000,
            commit_batch_size: 50,
            shared_property: rdfs::LABEL.to_string(),
            local_namespace: local::ENTITIES.to_string(),
        }
    }
}
