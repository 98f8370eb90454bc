use crate::config::Config;
use crate::data::{self, Columns};
use crate::engine::Engine;
use crate::types::{CleanReport, CleanedSeries};
use anyhow::{Context, Result};
use std::{fs, path::Path};

pub struct Manager {
    engine: Engine,
    columns: Columns,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(cfg_file: Option<P>, columns: Columns) -> Result<Self> {
        let cfg = match cfg_file {
            Some(cfg_file) => Config::from_file(cfg_file).context("failed to construct cfg")?,
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        Ok(Self {
            engine: Engine::new(cfg),
            columns,
        })
    }

    pub fn clean_file<P, Q>(&self, input: P, output: Q, report_file: Option<&Path>) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let output = output.as_ref();

        let (cleaned, report) = self.process(input)?;

        data::save_cleaned(output, &cleaned, &self.columns)
            .with_context(|| format!("failed to save {output:?}"))?;
        log::info!("saved {output:?}");

        if let Some(report_file) = report_file {
            let contents = toml::to_string(&report).context("failed to serialize report")?;
            fs::write(report_file, contents)
                .with_context(|| format!("failed to write {report_file:?}"))?;
            log::info!("saved {report_file:?}");
        }

        Ok(())
    }

    pub fn inspect_file<P: AsRef<Path>>(&self, input: P) -> Result<()> {
        let (_, report) = self.process(input)?;
        log::info!("{report:#?}");
        Ok(())
    }

    fn process<P: AsRef<Path>>(&self, input: P) -> Result<(CleanedSeries, CleanReport)> {
        let input = input.as_ref();

        let series = data::load_series(input, &self.columns)
            .with_context(|| format!("failed to load {input:?}"))?;
        if series.is_empty() {
            log::warn!("{input:?} has no data rows");
        } else {
            log::info!("loaded {} rows from {input:?}", series.len());
        }

        Ok(self.engine.clean(series))
    }
}
