//! One pass of classify, suggest, build and describe.
//!
//! Callers re-run [`run`] whenever the dataset, the chart kind or the axis
//! selection changes. The pass is pure; the same inputs always produce the
//! same [`ChartOutcome`].

use log::{debug, warn};
use serde::Serialize;

use crate::{
    axes::{AxisSelection, suggest_axes},
    config::ChartConfig,
    data::Dataset,
    insights::{Insight, generate_insights},
    schema::{DatasetProfile, profile_columns},
    series::{ChartKind, Series, build_series},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub selection: AxisSelection,
}

impl ChartRequest {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            selection: AxisSelection::default(),
        }
    }

    pub fn with_category(mut self, column: impl Into<String>) -> Self {
        self.selection.category_column = Some(column.into());
        self
    }

    pub fn with_value(mut self, column: impl Into<String>) -> Self {
        self.selection.value_column = Some(column.into());
        self
    }
}

/// Everything a renderer and an insight panel need for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub profile: DatasetProfile,
    pub selection: AxisSelection,
    pub series: Series,
    pub insights: Vec<Insight>,
}

impl ChartOutcome {
    pub fn insight_sentences(&self) -> Vec<String> {
        self.insights.iter().map(ToString::to_string).collect()
    }
}

pub fn run(dataset: &Dataset, request: &ChartRequest, config: &ChartConfig) -> ChartOutcome {
    let profile = profile_columns(dataset, config);
    let selection = resolve_selection(&profile, &request.selection);
    debug!(
        "Resolved axes for {} chart: category={:?} value={:?}",
        request.kind, selection.category_column, selection.value_column
    );

    let value_column = selection
        .value_column
        .as_deref()
        .filter(|column| is_numeric_column(&profile, column));
    let series = build_series(
        dataset,
        request.kind,
        selection.category_column.as_deref(),
        value_column,
        config,
    );
    let insights = generate_insights(&series, config);

    ChartOutcome {
        kind: request.kind,
        profile,
        selection,
        series,
        insights,
    }
}

/// Suggested axes plus the category fallback the selector leaves to its
/// caller: any other column when no text column exists. Requested columns
/// are kept as given.
pub fn resolve_selection(profile: &DatasetProfile, requested: &AxisSelection) -> AxisSelection {
    let columns = profile.column_names();
    let mut selection = suggest_axes(
        &columns,
        &profile.numeric_columns(),
        &profile.text_columns(),
        requested,
    );

    if selection.category_column.is_none() {
        selection.category_column = columns
            .iter()
            .find(|name| Some(name.as_str()) != selection.value_column.as_deref())
            .or_else(|| columns.first())
            .cloned();
        if let Some(fallback) = &selection.category_column {
            debug!("No text column available; using '{fallback}' for categories");
        }
    }

    selection
}

/// A value column that is not numeric yields no series.
fn is_numeric_column(profile: &DatasetProfile, column: &str) -> bool {
    let numeric = profile.column_type(column).is_some_and(|t| t.is_numeric());
    if !numeric {
        warn!("Value column '{column}' is not numeric; no series will be built");
    }
    numeric
}
