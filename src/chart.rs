use anyhow::{Context, Result, bail};
use log::info;
use serde::Serialize;

use crate::{
    cli::ChartArgs,
    config::ChartConfig,
    data::{Dataset, format_number},
    pipeline::{self, ChartOutcome, ChartRequest},
    series::Series,
    table::{self, Align},
};

/// JSON document printed by `chart --json`.
#[derive(Debug, Serialize)]
pub struct ChartReport<'a> {
    pub source: &'a str,
    pub rows: usize,
    pub truncated: bool,
    #[serde(flatten)]
    pub outcome: &'a ChartOutcome,
}

pub fn execute(args: &ChartArgs, config: &ChartConfig) -> Result<()> {
    let loaded = crate::load_input(&args.source, config)?;
    let dataset = &loaded.dataset;
    let request = build_request(args, dataset)?;
    let outcome = pipeline::run(dataset, &request, config);
    ensure_numeric_value(&outcome)?;

    if args.json {
        let report = ChartReport {
            source: &loaded.source_label,
            rows: dataset.len(),
            truncated: loaded.truncated,
            outcome: &outcome,
        };
        let rendered =
            serde_json::to_string_pretty(&report).context("Serializing chart result")?;
        println!("{rendered}");
    } else {
        print_outcome(&outcome);
    }

    info!(
        "Built {} chart with {} point(s) and {} insight(s) from {:?}",
        outcome.kind,
        outcome.series.len(),
        outcome.insights.len(),
        args.source.input
    );
    Ok(())
}

/// Explicit column choices must name columns of the dataset.
fn build_request(args: &ChartArgs, dataset: &Dataset) -> Result<ChartRequest> {
    let mut request = ChartRequest::new(args.kind);
    if let Some(column) = &args.category {
        ensure_column(dataset, column)?;
        request = request.with_category(column.as_str());
    }
    if let Some(column) = &args.value {
        ensure_column(dataset, column)?;
        request = request.with_value(column.as_str());
    }
    Ok(request)
}

fn ensure_column(dataset: &Dataset, column: &str) -> Result<()> {
    if !dataset.has_column(column) {
        let available = dataset.columns();
        if available.is_empty() {
            bail!("Column '{column}' not found; the dataset has no columns");
        }
        bail!(
            "Column '{column}' not found (available: {})",
            available.join(", ")
        );
    }
    Ok(())
}

/// An explicit value column the classifier did not find numeric charts
/// nothing; say so instead of printing an empty chart.
fn ensure_numeric_value(outcome: &ChartOutcome) -> Result<()> {
    let Some(column) = outcome.selection.value_column.as_deref() else {
        return Ok(());
    };
    match outcome.profile.column_type(column) {
        Some(column_type) if !column_type.is_numeric() => bail!(
            "Column '{column}' is {column_type}, not numeric; pick a numeric value column"
        ),
        _ => Ok(()),
    }
}

fn print_outcome(outcome: &ChartOutcome) {
    let caption = outcome.selection.caption();
    if caption.is_empty() {
        println!("{} chart", outcome.kind);
    } else {
        println!("{} chart: {caption}", outcome.kind);
    }

    if outcome.series.is_empty() {
        println!("No data to display");
        return;
    }

    println!();
    let (headers, rows) = series_table(&outcome.series);
    table::print_table(&headers, &rows, &[Align::Left, Align::Right]);

    println!();
    if outcome.insights.is_empty() {
        println!("No insights for this series.");
    } else {
        println!("Insights:");
        for (idx, sentence) in outcome.insight_sentences().iter().enumerate() {
            println!("{}. {sentence}", idx + 1);
        }
    }
}

pub fn series_table(series: &Series) -> (Vec<String>, Vec<Vec<String>>) {
    let label_header = match series {
        Series::Ordered(_) => "category",
        Series::Aggregated(_) => "name",
    };
    let headers = vec![label_header.to_string(), "value".to_string()];
    let rows = series
        .labels()
        .into_iter()
        .zip(series.values())
        .map(|(label, value)| vec![label.to_string(), format_number(value)])
        .collect();
    (headers, rows)
}
