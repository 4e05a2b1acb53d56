//! Coarse column type inference.
//!
//! Each column of a [`Dataset`] is classified as numeric, date-like, text or
//! empty by sampling its non-blank cells. [`profile_columns`] runs the
//! classifier once per canonical column and groups the results the way the
//! axis selector consumes them.
//!
//! ## Rules
//!
//! - Null, missing and empty-string cells are excluded from the sample.
//! - No remaining cells: `empty`.
//! - At least `numeric_threshold` of the sample reads as a number: `numeric`.
//! - At least `date_threshold` of the sample reads as a date: `date-like`.
//! - Anything else: `text`.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::{
    config::ChartConfig,
    data::{CellValue, Dataset, is_date_like, parse_number},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    Numeric,
    DateLike,
    Text,
    Empty,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::DateLike => "date-like",
            ColumnType::Text => "text",
            ColumnType::Empty => "empty",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Columns that can label categories. Empty columns would only yield
    /// blank labels.
    pub fn is_category_candidate(&self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::DateLike)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "numeric" | "number" => Ok(ColumnType::Numeric),
            "date-like" | "date" => Ok(ColumnType::DateLike),
            "text" | "string" => Ok(ColumnType::Text),
            "empty" => Ok(ColumnType::Empty),
            other => Err(anyhow!("Unknown column type '{other}'")),
        }
    }
}

#[derive(Debug, Default)]
struct TypeCandidate {
    non_empty: usize,
    numeric_matches: usize,
    date_matches: usize,
}

impl TypeCandidate {
    fn update(&mut self, value: &CellValue) {
        if value.is_blank() {
            return;
        }
        self.non_empty += 1;
        if parse_number(value).is_some() {
            self.numeric_matches += 1;
        }
        if is_date_like(value) {
            self.date_matches += 1;
        }
    }

    fn share(&self, matches: usize) -> f64 {
        if self.non_empty == 0 {
            0.0
        } else {
            matches as f64 / self.non_empty as f64
        }
    }

    fn decide(&self, config: &ChartConfig) -> ColumnType {
        if self.non_empty == 0 {
            ColumnType::Empty
        } else if meets_threshold(self.numeric_matches, self.non_empty, config.numeric_threshold)
        {
            ColumnType::Numeric
        } else if meets_threshold(self.date_matches, self.non_empty, config.date_threshold) {
            ColumnType::DateLike
        } else {
            ColumnType::Text
        }
    }
}

/// `matches / total >= threshold` without rounding drift at the boundary:
/// 4 of 5 must satisfy 0.8 even though `0.8_f64` is not exact.
fn meets_threshold(matches: usize, total: usize, threshold: f64) -> bool {
    if total == 0 {
        return false;
    }
    const EPSILON: f64 = 1e-9;
    matches as f64 + EPSILON >= threshold * total as f64
}

/// Classifies `column` over every record of `dataset`.
pub fn classify(dataset: &Dataset, column: &str, config: &ChartConfig) -> ColumnType {
    let mut candidate = TypeCandidate::default();
    for value in dataset.column_values(column) {
        candidate.update(value);
    }
    candidate.decide(config)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub non_empty: usize,
    /// Share of non-empty cells that read as numbers.
    pub numeric_share: f64,
}

/// Classification of every canonical column of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.names_where(|t| t.is_numeric())
    }

    /// Category candidates in column order.
    pub fn text_columns(&self) -> Vec<String> {
        self.names_where(|t| t.is_category_candidate())
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    fn names_where(&self, predicate: impl Fn(&ColumnType) -> bool) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| predicate(&c.column_type))
            .map(|c| c.name.clone())
            .collect()
    }
}

pub fn profile_columns(dataset: &Dataset, config: &ChartConfig) -> DatasetProfile {
    let columns = dataset
        .columns()
        .into_iter()
        .map(|name| {
            let mut candidate = TypeCandidate::default();
            for value in dataset.column_values(&name) {
                candidate.update(value);
            }
            ColumnProfile {
                column_type: candidate.decide(config),
                non_empty: candidate.non_empty,
                numeric_share: candidate.share(candidate.numeric_matches),
                name,
            }
        })
        .collect();
    DatasetProfile { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use proptest::prelude::*;

    fn dataset_with(column: &str, values: Vec<CellValue>) -> Dataset {
        Dataset::new(
            values
                .into_iter()
                .map(|value| Record::new().with(column, value))
                .collect(),
        )
    }

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn mostly_malformed_price_column_is_text() {
        let dataset = dataset_with("price", texts(&["10", "20", "abc", "30"]));
        assert_eq!(
            classify(&dataset, "price", &ChartConfig::default()),
            ColumnType::Text
        );
    }

    #[test]
    fn four_of_five_numeric_cells_is_numeric() {
        let dataset = dataset_with("price", texts(&["10", "20", "abc", "30", "40"]));
        assert_eq!(
            classify(&dataset, "price", &ChartConfig::default()),
            ColumnType::Numeric
        );
    }

    #[test]
    fn blank_cells_are_excluded_from_the_sample() {
        let mut values = texts(&["1", "", "2"]);
        values.push(CellValue::Null);
        let dataset = dataset_with("n", values);
        assert_eq!(
            classify(&dataset, "n", &ChartConfig::default()),
            ColumnType::Numeric
        );
    }

    #[test]
    fn all_blank_or_absent_column_is_empty() {
        let mut values = texts(&["", ""]);
        values.push(CellValue::Null);
        let dataset = dataset_with("n", values);
        let config = ChartConfig::default();
        assert_eq!(classify(&dataset, "n", &config), ColumnType::Empty);
        assert_eq!(classify(&dataset, "absent", &config), ColumnType::Empty);
        assert_eq!(
            classify(&Dataset::default(), "n", &config),
            ColumnType::Empty
        );
    }

    #[test]
    fn dates_require_every_cell_to_parse() {
        let config = ChartConfig::default();
        let all_dates = dataset_with("d", texts(&["2024-01-01", "2024-02-01", "03/15/2024"]));
        assert_eq!(classify(&all_dates, "d", &config), ColumnType::DateLike);

        let one_bad = dataset_with("d", texts(&["2024-01-01", "2024-02-01", "soon"]));
        assert_eq!(classify(&one_bad, "d", &config), ColumnType::Text);
    }

    #[test]
    fn year_month_columns_are_date_like() {
        let dataset = dataset_with("month", texts(&["2024-01", "2024-02", "2024-12"]));
        assert_eq!(
            classify(&dataset, "month", &ChartConfig::default()),
            ColumnType::DateLike
        );
    }

    #[test]
    fn native_numbers_and_booleans_count_as_numeric() {
        let dataset = dataset_with(
            "v",
            vec![
                CellValue::Number(1.0),
                CellValue::Bool(true),
                CellValue::Number(-4.5),
            ],
        );
        assert_eq!(
            classify(&dataset, "v", &ChartConfig::default()),
            ColumnType::Numeric
        );
    }

    #[test]
    fn threshold_comes_from_config() {
        let dataset = dataset_with("price", texts(&["10", "20", "abc", "30"]));
        let lenient = ChartConfig {
            numeric_threshold: 0.75,
            ..ChartConfig::default()
        };
        assert_eq!(classify(&dataset, "price", &lenient), ColumnType::Numeric);
    }

    #[test]
    fn profile_groups_columns_in_first_record_order() {
        let dataset = Dataset::new(vec![
            Record::new()
                .with("region", "East")
                .with("sales", 120.0)
                .with("day", "2024-01-01")
                .with("note", ""),
            Record::new()
                .with("region", "West")
                .with("sales", 80.0)
                .with("day", "2024-01-02")
                .with("note", ""),
        ]);
        let profile = profile_columns(&dataset, &ChartConfig::default());
        assert_eq!(profile.column_names(), vec!["region", "sales", "day", "note"]);
        assert_eq!(profile.numeric_columns(), vec!["sales"]);
        assert_eq!(profile.text_columns(), vec!["region", "day"]);
        assert_eq!(profile.column_type("note"), Some(ColumnType::Empty));
        assert_eq!(profile.columns[1].numeric_share, 1.0);
    }

    #[test]
    fn column_type_parses_from_str() {
        assert_eq!("date".parse::<ColumnType>().unwrap(), ColumnType::DateLike);
        assert_eq!(" Numeric ".parse::<ColumnType>().unwrap(), ColumnType::Numeric);
        assert!("blob".parse::<ColumnType>().is_err());
    }

    fn cell_strategy() -> impl Strategy<Value = CellValue> {
        prop_oneof![
            Just(CellValue::Null),
            Just(CellValue::from("")),
            (-1_000i64..1_000).prop_map(CellValue::from),
            "[a-z]{1,6}".prop_map(CellValue::from),
        ]
    }

    proptest! {
        #[test]
        fn empty_iff_every_cell_is_blank(values in proptest::collection::vec(cell_strategy(), 0..30)) {
            let all_blank = values.iter().all(CellValue::is_blank);
            let dataset = dataset_with("c", values);
            let classified = classify(&dataset, "c", &ChartConfig::default());
            prop_assert_eq!(classified == ColumnType::Empty, all_blank);
        }

        #[test]
        fn numeric_when_share_reaches_threshold(
            numbers in proptest::collection::vec(-500i64..500, 1..40),
            words in proptest::collection::vec("[a-z]{2,5}", 0..10),
        ) {
            let numeric = numbers.len();
            let total = numeric + words.len();
            let mut values: Vec<CellValue> = numbers.into_iter().map(CellValue::from).collect();
            values.extend(words.into_iter().map(CellValue::from));
            let dataset = dataset_with("c", values);
            let classified = classify(&dataset, "c", &ChartConfig::default());
            if numeric * 5 >= total * 4 {
                prop_assert_eq!(classified, ColumnType::Numeric);
            } else {
                prop_assert_ne!(classified, ColumnType::Numeric);
            }
        }
    }
}
