/// Running mean and variance accumulator (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug)]
pub struct AccumulatorReport {
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    /// Mean and sample standard deviation of the values added so far.
    ///
    /// The mean is NaN without values and the standard deviation is NaN with fewer than two.
    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        iter.into_iter().for_each(|val| acc.add(val));
        acc
    }
}

/// Compute the trailing rolling mean of `vals`.
///
/// Each output `i` averages `vals[i + 1 - window..=i]`, shrunk at the start of the series.
/// Windows holding fewer than `min_periods` values yield NaN.
pub fn rolling_mean(vals: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    (0..vals.len())
        .map(|i| {
            let win = &vals[(i + 1).saturating_sub(window)..=i];
            if win.len() < min_periods.max(1) {
                f64::NAN
            } else {
                compute_mean(win)
            }
        })
        .collect()
}

/// Maximum of a non-empty window, ignoring NaN values.
pub fn window_max(win: &[f64]) -> f64 {
    win.iter().copied().fold(f64::NAN, f64::max)
}

fn compute_mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return f64::NAN;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_matches_sample_statistics() {
        let acc: Accumulator = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        let report = acc.report();
        assert!((report.mean - 5.0).abs() < 1e-12);
        assert!((report.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn accumulator_needs_two_values_for_std_dev() {
        assert!(Accumulator::new().report().mean.is_nan());
        let acc: Accumulator = [3.0].into_iter().collect();
        let report = acc.report();
        assert_eq!(report.mean, 3.0);
        assert!(report.std_dev.is_nan());
    }

    #[test]
    fn rolling_mean_full_windows_only() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 3);
        assert!(means[0].is_nan());
        assert!(means[1].is_nan());
        assert_eq!(means[2], 2.0);
        assert_eq!(means[3], 3.0);
    }

    #[test]
    fn rolling_mean_partial_windows() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 1);
        assert_eq!(means, vec![1.0, 1.5, 2.0, 3.0]);
        assert!(rolling_mean(&[], 3, 1).is_empty());
    }

    #[test]
    fn window_max_skips_nan() {
        assert_eq!(window_max(&[1.0, f64::NAN, 3.0, 2.0]), 3.0);
    }
}
