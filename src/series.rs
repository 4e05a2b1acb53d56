//! Chart-ready series construction.
//!
//! Bar and line charts get one point per record in input order. Pie charts
//! get one slice per distinct category, values summed, slices in the order
//! their category first appears. Malformed cells never abort a build: labels
//! fall back to a default and values to 0.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    config::ChartConfig,
    data::{Dataset, stringify, to_number},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }

    pub fn is_proportional(&self) -> bool {
        matches!(self, ChartKind::Pie)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            other => Err(format!(
                "Unknown chart kind '{other}' (expected bar, line or pie)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series {
    /// Bar and line: one point per record.
    Ordered(Vec<SeriesPoint>),
    /// Pie: one slice per distinct category.
    Aggregated(Vec<PieSlice>),
}

impl Series {
    pub fn empty(kind: ChartKind) -> Self {
        if kind.is_proportional() {
            Series::Aggregated(Vec::new())
        } else {
            Series::Ordered(Vec::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Ordered(points) => points.len(),
            Series::Aggregated(slices) => slices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> Vec<&str> {
        match self {
            Series::Ordered(points) => points.iter().map(|p| p.category.as_str()).collect(),
            Series::Aggregated(slices) => slices.iter().map(|s| s.name.as_str()).collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match self {
            Series::Ordered(points) => points.iter().map(|p| p.value).collect(),
            Series::Aggregated(slices) => slices.iter().map(|s| s.value).collect(),
        }
    }
}

/// Transforms `dataset` into the series for `kind`.
///
/// An unset column or an empty dataset yields an empty series of the shape
/// `kind` calls for.
pub fn build_series(
    dataset: &Dataset,
    kind: ChartKind,
    category_column: Option<&str>,
    value_column: Option<&str>,
    config: &ChartConfig,
) -> Series {
    let (Some(category_column), Some(value_column)) = (category_column, value_column) else {
        return Series::empty(kind);
    };
    if dataset.is_empty() {
        return Series::empty(kind);
    }

    match kind {
        ChartKind::Bar | ChartKind::Line => Series::Ordered(
            dataset
                .records()
                .iter()
                .map(|record| SeriesPoint {
                    category: stringify(record.get(category_column), ""),
                    value: to_number(record.get(value_column)),
                })
                .collect(),
        ),
        ChartKind::Pie => {
            let mut slices: Vec<PieSlice> = Vec::new();
            let mut positions: HashMap<String, usize> = HashMap::new();
            for record in dataset.records() {
                let name = stringify(record.get(category_column), &config.missing_slice_label);
                let value = to_number(record.get(value_column));
                match positions.get(&name) {
                    Some(&idx) => slices[idx].value += value,
                    None => {
                        positions.insert(name.clone(), slices.len());
                        slices.push(PieSlice { name, value });
                    }
                }
            }
            Series::Aggregated(slices)
        }
    }
}
