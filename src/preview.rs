use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::{
    cli::PreviewArgs,
    config::ChartConfig,
    data::Dataset,
    schema::{DatasetProfile, profile_columns},
    table::{self, Align},
};

pub fn execute(args: &PreviewArgs, config: &ChartConfig) -> Result<()> {
    let loaded = crate::load_input(&args.source, config)?;
    let dataset = &loaded.dataset;
    let profile = profile_columns(dataset, config);
    let rows = args.rows.unwrap_or(config.preview_rows);

    println!("{}", dimensions_line(&loaded.source_label, dataset));
    if loaded.truncated {
        println!(
            "Only the first {} row(s) were loaded; raise --limit to read more.",
            dataset.len()
        );
    }
    if dataset.is_empty() {
        println!("No rows to preview.");
        info!("Previewed empty dataset from {:?}", args.source.input);
        return Ok(());
    }

    println!();
    let (headers, column_rows) = column_table(&profile);
    table::print_table(&headers, &column_rows, &[Align::Left, Align::Left, Align::Right]);

    println!();
    let (headers, sample) = sample_rows(dataset, &profile, rows);
    table::print_table(&headers, &sample, &[]);

    info!(
        "Displayed {} of {} row(s) across {} column(s) from {:?}",
        sample.len(),
        dataset.len(),
        headers.len(),
        args.source.input
    );
    Ok(())
}

/// `sales.csv: 4 rows × 2 columns`
pub fn dimensions_line(label: &str, dataset: &Dataset) -> String {
    format!(
        "{label}: {} rows × {} columns",
        dataset.len(),
        dataset.columns().len()
    )
}

fn column_table(profile: &DatasetProfile) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = vec![
        "column".to_string(),
        "type".to_string(),
        "non-empty".to_string(),
    ];
    let rows = profile
        .columns
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column.column_type.to_string(),
                column.non_empty.to_string(),
            ]
        })
        .collect();
    (headers, rows)
}

/// First `limit` records laid out in canonical column order. Keys a record
/// lacks render as blanks.
pub fn sample_rows(
    dataset: &Dataset,
    profile: &DatasetProfile,
    limit: usize,
) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = profile.column_names();
    let rows = dataset
        .records()
        .iter()
        .take(limit)
        .map(|record| {
            headers
                .iter()
                .map(|name| {
                    record
                        .get(name)
                        .map(|value| value.as_display())
                        .unwrap_or_default()
                })
                .collect_vec()
        })
        .collect();
    (headers, rows)
}
