//! Series data types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Time series of a single column.
///
/// Rows are kept in insertion order, which is assumed to be chronological.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Series {
    /// Sample timestamps.
    pub times: Vec<NaiveDateTime>,

    /// Sample values, one per timestamp.
    pub values: Vec<f64>,
}

impl Series {
    /// Append a row at the end of the series.
    pub fn push(&mut self, time: NaiveDateTime, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of cleaning a [`Series`].
///
/// All columns have the same length as `times`.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    pub times: Vec<NaiveDateTime>,

    /// Values as loaded.
    pub original: Vec<f64>,

    /// Values after floor and z-score correction.
    pub corrected: Vec<f64>,

    /// Trailing mean of the corrected values.
    pub smoothed: Vec<f64>,
}

/// Outcome of the z-score correction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ZScoreOutcome {
    /// Statistics were usable and the stage ran.
    Applied { mean: f64, std_dev: f64 },

    /// Statistics were degenerate and the stage was skipped.
    DegenerateStatistics { reason: String },
}

/// Summary of a cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Number of rows processed.
    pub n_rows: usize,

    /// Values replaced by the rolling-floor stage.
    pub n_floor_replaced: usize,

    /// Values replaced by the z-score stage.
    pub n_zscore_replaced: usize,

    /// Statistics used by the z-score stage.
    pub zscore: ZScoreOutcome,
}
