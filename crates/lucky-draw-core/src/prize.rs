//! Weighted prize table.
//!
//! A table is an ordered list of `(name, probability)` entries. A draw takes
//! one uniform sample `r` in `[0, 1)` and returns the first entry whose
//! cumulative probability is strictly greater than `r`. Each entry therefore
//! owns the half-open interval `[previous cumulative, own cumulative)`, and a
//! sample landing exactly on a threshold belongs to the next entry.
//!
//! Probabilities need not sum to 1. Samples past the last threshold fall
//! through to the fallback label.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DrawError, Result};

/// Label returned when no entry matches.
pub const NO_PRIZE: &str = "谢谢参与";

/// One row of the prize table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeEntry {
    /// Prize label shown to the user.
    pub name: String,

    /// Probability mass of this entry.
    pub probability: f64,
}

impl PrizeEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(name: impl Into<String>, probability: f64) -> Self {
        Self {
            name: name.into(),
            probability,
        }
    }
}

/// An immutable prize table with precomputed cumulative thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeTable {
    entries: Vec<PrizeEntry>,
    cumulative: Vec<f64>,
    fallback: String,
}

/// Serialized form of a prize table, as read from a configuration file.
#[derive(Debug, Deserialize)]
struct PrizeTableFile {
    entries: Vec<PrizeEntry>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    NO_PRIZE.to_string()
}

impl PrizeTable {
    /// Build a table, computing the cumulative thresholds once.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::Configuration` if any probability is negative or not finite.
    pub fn new(entries: Vec<PrizeEntry>, fallback: impl Into<String>) -> Result<Self> {
        if let Some(entry) = entries
            .iter()
            .find(|e| !e.probability.is_finite() || e.probability < 0.0)
        {
            return Err(DrawError::Configuration(format!(
                "invalid probability {} for prize {:?}",
                entry.probability, entry.name
            )));
        }

        let cumulative = cumulative_sums(&entries);
        Ok(Self {
            entries,
            cumulative,
            fallback: fallback.into(),
        })
    }

    /// Parse a table from JSON: `{"entries": [{"name", "probability"}], "fallback"?}`.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::Configuration` if the JSON is malformed or a probability is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PrizeTableFile =
            serde_json::from_str(json).map_err(|e| DrawError::Configuration(e.to_string()))?;
        Self::new(file.entries, file.fallback)
    }

    /// Select the prize for a sample in `[0, 1)`.
    #[must_use]
    pub fn select(&self, sample: f64) -> &str {
        self.entries
            .iter()
            .zip(&self.cumulative)
            .find(|(_, threshold)| sample < **threshold)
            .map_or(self.fallback.as_str(), |(entry, _)| entry.name.as_str())
    }

    /// Draw one prize using a fresh uniform sample from `rng`.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> &str {
        let sample: f64 = rng.gen();
        self.select(sample)
    }

    /// The entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[PrizeEntry] {
        &self.entries
    }

    /// The cumulative threshold after each entry.
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.cumulative
    }

    /// The label returned when no entry matches.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        let entries = vec![
            PrizeEntry::new("一等奖: 10000元", 0.0),
            PrizeEntry::new("二等奖: 500元", 0.0),
            PrizeEntry::new("三等奖: 200元", 0.0001),
            PrizeEntry::new("四等奖: 10元", 0.13),
            PrizeEntry::new(NO_PRIZE, 0.8699),
        ];
        Self {
            cumulative: cumulative_sums(&entries),
            entries,
            fallback: NO_PRIZE.to_string(),
        }
    }
}

/// Running sums of the entry probabilities, in table order.
fn cumulative_sums(entries: &[PrizeEntry]) -> Vec<f64> {
    entries
        .iter()
        .scan(0.0, |total, entry| {
            *total += entry.probability;
            Some(*total)
        })
        .collect()
}
