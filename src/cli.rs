use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::series::ChartKind;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Infer column types, build chart series and summarize small datasets",
    long_about = None
)]
pub struct Cli {
    /// YAML file overriding inference and insight thresholds
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show dataset dimensions, inferred column types and the first rows
    Preview(PreviewArgs),
    /// Build a bar, line or pie series and describe it
    Chart(ChartArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file (.csv, .tsv, .json, .xlsx, .xls, .ods) or '-' for CSV on stdin
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Maximum rows to load (0 = all; defaults to the configured cap)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Delimiter for CSV input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Number of rows to display (defaults to the configured preview size)
    #[arg(long)]
    pub rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Chart kind: bar, line or pie
    #[arg(short = 'k', long = "kind", default_value = "bar")]
    pub kind: ChartKind,
    /// Category column (X axis, or pie labels)
    #[arg(short = 'x', long = "category")]
    pub category: Option<String>,
    /// Numeric value column (Y axis, or pie values)
    #[arg(short = 'y', long = "value")]
    pub value: Option<String>,
    /// Emit the full result as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
