//! Tunable constants for inference, series building and insight generation.
//!
//! Every heuristic threshold lives here instead of as a literal at the call
//! site. [`ChartConfig::default`] reproduces the stock behaviour; a YAML file
//! passed through `--config` may override any subset of the fields.

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.8;
pub const DEFAULT_DATE_THRESHOLD: f64 = 1.0;
pub const DEFAULT_ROW_CAP: usize = 100;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_MISSING_SLICE_LABEL: &str = "Unknown";
pub const DEFAULT_EXCEPTIONAL_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_TREND_MIN_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Minimum share of non-empty cells that must parse as numbers.
    pub numeric_threshold: f64,
    /// Minimum share of non-empty cells that must parse as dates.
    pub date_threshold: f64,
    /// Rows kept by ingestion; later rows are dropped.
    pub row_cap: usize,
    pub preview_rows: usize,
    /// Category used for pie slices whose label cell is missing.
    pub missing_slice_label: String,
    pub exceptional_multiplier: f64,
    pub trend_min_points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            date_threshold: DEFAULT_DATE_THRESHOLD,
            row_cap: DEFAULT_ROW_CAP,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            missing_slice_label: DEFAULT_MISSING_SLICE_LABEL.to_string(),
            exceptional_multiplier: DEFAULT_EXCEPTIONAL_MULTIPLIER,
            trend_min_points: DEFAULT_TREND_MIN_POINTS,
        }
    }
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: ChartConfig = if raw.trim().is_empty() {
            ChartConfig::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.numeric_threshold),
            "numeric_threshold must be between 0 and 1 (got {})",
            self.numeric_threshold
        );
        ensure!(
            (0.0..=1.0).contains(&self.date_threshold),
            "date_threshold must be between 0 and 1 (got {})",
            self.date_threshold
        );
        ensure!(
            self.exceptional_multiplier.is_finite() && self.exceptional_multiplier >= 0.0,
            "exceptional_multiplier must be a non-negative number"
        );
        Ok(())
    }

    /// Configuration with a different ingestion cap; `0` lifts the cap.
    pub fn with_row_cap(mut self, row_cap: usize) -> Self {
        self.row_cap = row_cap;
        self
    }

    pub fn effective_row_cap(&self) -> Option<usize> {
        (self.row_cap > 0).then_some(self.row_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = ChartConfig::from_yaml_str("").expect("parse empty");
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let config =
            ChartConfig::from_yaml_str("numeric_threshold: 0.5\nmissing_slice_label: Other\n")
                .expect("parse partial");
        assert_eq!(config.numeric_threshold, 0.5);
        assert_eq!(config.missing_slice_label, "Other");
        assert_eq!(config.row_cap, DEFAULT_ROW_CAP);
        assert_eq!(config.trend_min_points, DEFAULT_TREND_MIN_POINTS);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = ChartConfig::from_yaml_str("numeric_threshold: 1.5").unwrap_err();
        assert!(err.to_string().contains("numeric_threshold"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ChartConfig::from_yaml_str("palette: [red]").is_err());
    }

    #[test]
    fn zero_row_cap_disables_the_cap() {
        let config = ChartConfig::default().with_row_cap(0);
        assert_eq!(config.effective_row_cap(), None);
        assert_eq!(ChartConfig::default().effective_row_cap(), Some(100));
    }
}
