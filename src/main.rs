mod config;
mod data;
mod engine;
mod manager;
mod stats;
mod types;

use crate::data::Columns;
use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "Time")]
    time_column: String,

    #[arg(long, default_value = "feed_pressure")]
    value_column: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Clean {
        #[arg(long, default_value = "dataset/feed_pressure.csv")]
        input: PathBuf,

        #[arg(long, default_value = "preprocessed_feed_pressure.csv")]
        output: PathBuf,

        #[arg(long)]
        report: Option<PathBuf>,
    },

    Inspect {
        #[arg(long, default_value = "dataset/feed_pressure.csv")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let columns = Columns {
        time: args.time_column,
        value: args.value_column,
    };
    let mgr = Manager::new(args.config, columns).context("failed to construct mgr")?;

    match args.command {
        Command::Clean {
            input,
            output,
            report,
        } => mgr.clean_file(input, output, report.as_deref())?,
        Command::Inspect { input } => mgr.inspect_file(input)?,
    }

    Ok(())
}
