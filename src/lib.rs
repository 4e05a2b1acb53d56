pub mod axes;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod ingest;
pub mod insights;
pub mod io_utils;
pub mod pipeline;
pub mod preview;
pub mod schema;
pub mod series;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, Commands, InputArgs},
    config::ChartConfig,
    ingest::{LoadOptions, LoadedDataset},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("chart_insights", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    debug!("Effective configuration: {config:?}");
    match cli.command {
        Commands::Preview(args) => preview::execute(&args, &config),
        Commands::Chart(args) => chart::execute(&args, &config),
    }
}

/// `--limit` wins over the configured row cap; `0` keeps every row.
pub(crate) fn load_options(args: &InputArgs, config: &ChartConfig) -> Result<LoadOptions> {
    let row_cap = match args.limit {
        Some(limit) => config.clone().with_row_cap(limit).effective_row_cap(),
        None => config.effective_row_cap(),
    };
    Ok(LoadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        row_cap,
    })
}

pub(crate) fn load_input(args: &InputArgs, config: &ChartConfig) -> Result<LoadedDataset> {
    let options = load_options(args, config)?;
    ingest::load_path(&args.input, &options)
        .with_context(|| format!("Loading dataset from {:?}", args.input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn input(limit: Option<usize>) -> InputArgs {
        InputArgs {
            input: PathBuf::from("sales.csv"),
            limit,
            delimiter: None,
            input_encoding: None,
        }
    }

    #[test]
    fn limit_overrides_configured_cap() {
        let config = ChartConfig::default();
        assert_eq!(load_options(&input(None), &config).unwrap().row_cap, Some(100));
        assert_eq!(load_options(&input(Some(10)), &config).unwrap().row_cap, Some(10));
        assert_eq!(load_options(&input(Some(0)), &config).unwrap().row_cap, None);
    }

    #[test]
    fn unknown_encoding_fails_before_loading() {
        let mut args = input(None);
        args.input_encoding = Some("klingon".to_string());
        assert!(load_options(&args, &ChartConfig::default()).is_err());
    }
}
