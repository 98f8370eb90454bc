use crate::config::{Config, FloorConfig, SmoothConfig, ZScoreConfig};
use crate::stats::{Accumulator, rolling_mean, window_max};
use crate::types::{CleanReport, CleanedSeries, Series, ZScoreOutcome};

/// Outlier correction engine.
///
/// Runs the rolling-floor and z-score corrections in place and smooths the result.
///
/// Both corrections scan the series left to right and write each replacement
/// back before moving on, so a corrected value takes part in the replacement
/// windows of the values after it. Replacing values in a single vectorized
/// pass would give different results.
pub struct Engine {
    cfg: Config,
}

impl Engine {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Clean a series, returning the three value columns and a report.
    pub fn clean(&self, series: Series) -> (CleanedSeries, CleanReport) {
        let Series { times, values } = series;
        let original = values.clone();
        let mut corrected = values;

        let n_floor_replaced = correct_floor(&mut corrected, &self.cfg.floor);
        log::info!("floor stage replaced {n_floor_replaced} values");

        let (n_zscore_replaced, zscore) = correct_zscore(&mut corrected, &self.cfg.zscore);
        match &zscore {
            ZScoreOutcome::Applied { mean, std_dev } => {
                log::info!(
                    "z-score stage replaced {n_zscore_replaced} values (mean {mean}, std dev {std_dev})"
                );
            }
            ZScoreOutcome::DegenerateStatistics { reason } => {
                log::warn!("skipped z-score stage: {reason}");
            }
        }

        let smoothed = smooth(&corrected, &self.cfg.smooth);

        let report = CleanReport {
            n_rows: times.len(),
            n_floor_replaced,
            n_zscore_replaced,
            zscore,
        };

        let cleaned = CleanedSeries {
            times,
            original,
            corrected,
            smoothed,
        };

        (cleaned, report)
    }
}

/// Replace values that fall below their trailing rolling mean.
///
/// The floor is computed once from the values as passed in. Windows that cannot
/// fill have no floor. A replaced value becomes the maximum of itself and the
/// `lookback` values before it. Returns the number of replaced values.
pub fn correct_floor(vals: &mut [f64], cfg: &FloorConfig) -> usize {
    let floor = rolling_mean(vals, cfg.window, cfg.window);

    let mut n_replaced = 0;
    for (i, &floor_val) in floor.iter().enumerate() {
        // NaN floors never compare below.
        if vals[i] < floor_val {
            let new_val = window_max(&vals[i.saturating_sub(cfg.lookback)..=i]);
            log::debug!("floor: replaced {} with {new_val} at row {i}", vals[i]);
            vals[i] = new_val;
            n_replaced += 1;
        }
    }

    n_replaced
}

/// Compute the z-score of every value against the global mean and sample standard deviation.
///
/// Returns `Err` with the reason when the statistics are degenerate.
pub fn compute_zscores(vals: &[f64]) -> Result<(Vec<f64>, f64, f64), String> {
    if vals.len() < 2 {
        return Err(format!("need at least 2 values, but have {}", vals.len()));
    }

    let report = vals.iter().copied().collect::<Accumulator>().report();
    let (mean, std_dev) = (report.mean, report.std_dev);
    if !mean.is_finite() || !std_dev.is_finite() {
        return Err(format!("statistics are not finite (mean {mean}, std dev {std_dev})"));
    }
    if std_dev == 0.0 {
        return Err("standard deviation is zero".to_string());
    }

    let zscores = vals.iter().map(|&val| (val - mean) / std_dev).collect();
    Ok((zscores, mean, std_dev))
}

/// Replace values whose absolute z-score exceeds the threshold.
///
/// Z-scores are computed once before any replacement. A replaced value becomes
/// the maximum of the `lookback` values before it, or of all values up to and
/// including itself near the start of the series. Returns the number of
/// replaced values and the statistics used.
pub fn correct_zscore(vals: &mut [f64], cfg: &ZScoreConfig) -> (usize, ZScoreOutcome) {
    let (zscores, mean, std_dev) = match compute_zscores(vals) {
        Ok(stats) => stats,
        Err(reason) => return (0, ZScoreOutcome::DegenerateStatistics { reason }),
    };

    let mut n_replaced = 0;
    for (i, &zscore) in zscores.iter().enumerate() {
        if zscore.abs() > cfg.threshold {
            let win = if i >= cfg.lookback {
                &vals[i - cfg.lookback..i]
            } else {
                &vals[..=i]
            };
            let new_val = window_max(win);
            log::debug!(
                "z-score: replaced {} (z = {zscore:.3}) with {new_val} at row {i}",
                vals[i]
            );
            vals[i] = new_val;
            n_replaced += 1;
        }
    }

    (n_replaced, ZScoreOutcome::Applied { mean, std_dev })
}

/// Trailing rolling mean with partial windows at the start of the series.
pub fn smooth(vals: &[f64], cfg: &SmoothConfig) -> Vec<f64> {
    rolling_mean(vals, cfg.window, 1)
}
