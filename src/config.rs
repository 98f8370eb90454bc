use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Cleaning configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// Every section and field is optional and falls back to its default.
/// See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rolling-floor correction parameters.
    pub floor: FloorConfig,
    /// Z-score correction parameters.
    pub zscore: ZScoreConfig,
    /// Smoothing parameters.
    pub smooth: SmoothConfig,
}

/// Rolling-floor correction parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorConfig {
    /// Size of the trailing window whose mean acts as the floor.
    pub window: usize,
    /// Number of values before the current one searched for a replacement.
    pub lookback: usize,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            window: 10,
            lookback: 5,
        }
    }
}

/// Z-score correction parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZScoreConfig {
    /// Absolute z-score above which a value is an outlier.
    pub threshold: f64,
    /// Number of previous values searched for a replacement.
    pub lookback: usize,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            lookback: 3,
        }
    }
}

/// Smoothing parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothConfig {
    /// Size of the trailing averaging window.
    pub window: usize,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check that every parameter lies in its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_num(self.floor.window, 1..=10_000).context("invalid floor window")?;
        check_num(self.floor.lookback, 0..=10_000).context("invalid floor lookback")?;

        check_num(self.zscore.threshold, 0.0..=100.0).context("invalid z-score threshold")?;
        check_num(self.zscore.lookback, 1..=10_000).context("invalid z-score lookback")?;

        check_num(self.smooth.window, 1..=10_000).context("invalid smoothing window")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
