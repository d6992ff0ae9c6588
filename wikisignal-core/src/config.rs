//! Serializable run configuration.
//!
//! TOML with three sections, every field defaulted, so an empty file is a
//! valid SPY daily run:
//!
//! ```toml
//! [algorithm]
//! ticker = "SPY"
//! resolution = "daily"
//! history_lookback = 60
//! start_date = "2020-11-01"   # optional, ISO date string
//! end_date = "2020-12-31"     # optional
//!
//! [rule]
//! week_change_threshold_pct = 5.0
//!
//! [universe]
//! min_page_views = 100.0
//! min_month_percent_change = 0.2
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::UniverseFilter;
use crate::domain::Resolution;
use crate::strategy::DEFAULT_THRESHOLD_PCT;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Full run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub algorithm: AlgorithmConfig,
    pub rule: RuleConfig,
    pub universe: UniverseFilter,
}

impl RunConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_toml(&text)
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId, so reports can be
    /// compared or deduplicated by ID.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }
}

/// `[algorithm]` section: instrument, sampling, and replay window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Equity ticker to subscribe and trade
    pub ticker: String,

    /// Sampling resolution for subscriptions and history requests
    pub resolution: Resolution,

    /// Periods requested from the historical query at startup
    pub history_lookback: usize,

    /// Replay window start (inclusive); omit to start at the file's first point
    pub start_date: Option<NaiveDate>,

    /// Replay window end (inclusive); omit to run to the file's last point
    pub end_date: Option<NaiveDate>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            ticker: "SPY".to_string(),
            resolution: Resolution::Daily,
            history_lookback: 60,
            start_date: None,
            end_date: None,
        }
    }
}

/// `[rule]` section: decision-rule parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    pub week_change_threshold_pct: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self { week_change_threshold_pct: DEFAULT_THRESHOLD_PCT }
    }
}
