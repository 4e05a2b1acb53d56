//! Short factual observations about a built series.
//!
//! At most two insights are produced and always in the same order: the
//! dominance or exceptional-value observation first, the trend second.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{
    config::ChartConfig,
    series::{PieSlice, Series, SeriesPoint},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// Largest pie slice and its share of the total, in percent.
    DominantShare { name: String, percentage: f64 },
    ExceptionalValue { category: String },
    Trend(TrendDirection),
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::DominantShare { name, percentage } => {
                write!(
                    f,
                    "{name} accounts for {}% of the total",
                    format_one_decimal(*percentage)
                )
            }
            Insight::ExceptionalValue { category } => {
                write!(f, "{category} shows exceptional performance")
            }
            Insight::Trend(direction) => {
                write!(f, "Overall trend appears to be {}", direction.as_str())
            }
        }
    }
}

impl Serialize for Insight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Rounds half away from zero, unlike `{:.1}` on an exact tie.
fn format_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}

pub fn generate_insights(series: &Series, config: &ChartConfig) -> Vec<Insight> {
    match series {
        Series::Aggregated(slices) => dominant_share(slices).into_iter().collect(),
        Series::Ordered(points) => ordered_insights(points, config),
    }
}

fn dominant_share(slices: &[PieSlice]) -> Option<Insight> {
    let first = slices.first()?;
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total == 0.0 || !total.is_finite() {
        return None;
    }
    // Strict comparison keeps the first slice on ties.
    let largest = slices
        .iter()
        .skip(1)
        .fold(first, |max, slice| if slice.value > max.value { slice } else { max });
    Some(Insight::DominantShare {
        name: largest.name.clone(),
        percentage: largest.value / total * 100.0,
    })
}

fn ordered_insights(points: &[SeriesPoint], config: &ChartConfig) -> Vec<Insight> {
    let mut insights = Vec::new();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return insights;
    };

    let max = points
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let avg = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;

    if max > avg * config.exceptional_multiplier {
        if let Some(peak) = points.iter().find(|p| p.value == max) {
            insights.push(Insight::ExceptionalValue {
                category: peak.category.clone(),
            });
        }
    }

    if points.len() >= config.trend_min_points {
        // Equal endpoints read as decreasing.
        let direction = if last.value > first.value {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };
        insights.push(Insight::Trend(direction));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(&str, f64)]) -> Series {
        Series::Ordered(
            values
                .iter()
                .map(|(category, value)| SeriesPoint {
                    category: category.to_string(),
                    value: *value,
                })
                .collect(),
        )
    }

    fn slices(values: &[(&str, f64)]) -> Series {
        Series::Aggregated(
            values
                .iter()
                .map(|(name, value)| PieSlice {
                    name: name.to_string(),
                    value: *value,
                })
                .collect(),
        )
    }

    fn sentences(series: &Series) -> Vec<String> {
        generate_insights(series, &ChartConfig::default())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn empty_series_has_no_insights() {
        assert!(sentences(&Series::Ordered(Vec::new())).is_empty());
        assert!(sentences(&Series::Aggregated(Vec::new())).is_empty());
    }

    #[test]
    fn pie_reports_largest_share() {
        let series = slices(&[("East", 120.0), ("West", 80.0)]);
        assert_eq!(sentences(&series), vec!["East accounts for 60.0% of the total"]);
    }

    #[test]
    fn pie_ties_pick_first_slice() {
        let series = slices(&[("A", 5.0), ("B", 5.0), ("C", 2.0)]);
        assert_eq!(
            sentences(&series),
            vec!["A accounts for 41.7% of the total"]
        );
    }

    #[test]
    fn pie_with_zero_total_is_skipped() {
        let series = slices(&[("A", 0.0), ("B", 0.0)]);
        assert!(sentences(&series).is_empty());
    }

    #[test]
    fn pie_percentage_rounds_half_away_from_zero() {
        let series = slices(&[("A", 1.0), ("B", 2.0)]);
        assert_eq!(
            sentences(&series),
            vec!["B accounts for 66.7% of the total"]
        );
        assert_eq!(format_one_decimal(12.25), "12.3");
        assert_eq!(format_one_decimal(60.0), "60.0");
    }

    #[test]
    fn bar_reports_outlier_then_trend() {
        let series = points(&[("Jan", 10.0), ("Feb", 12.0), ("Mar", 50.0), ("Apr", 9.0)]);
        assert_eq!(
            sentences(&series),
            vec![
                "Mar shows exceptional performance",
                "Overall trend appears to be decreasing",
            ]
        );
    }

    #[test]
    fn trend_needs_more_than_three_points() {
        let series = points(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        assert!(sentences(&series).is_empty());

        let series = points(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]);
        assert_eq!(
            sentences(&series),
            vec!["Overall trend appears to be increasing"]
        );
    }

    #[test]
    fn equal_endpoints_read_as_decreasing() {
        let series = points(&[("a", 5.0), ("b", 6.0), ("c", 4.0), ("d", 5.0)]);
        assert_eq!(
            generate_insights(&series, &ChartConfig::default()),
            vec![Insight::Trend(TrendDirection::Decreasing)]
        );
    }

    #[test]
    fn duplicate_maximum_uses_first_category() {
        let series = points(&[("a", 1.0), ("b", 30.0), ("c", 1.0), ("d", 30.0), ("e", 1.0), ("f", 1.0)]);
        let insights = generate_insights(&series, &ChartConfig::default());
        assert_eq!(
            insights[0],
            Insight::ExceptionalValue {
                category: "b".into()
            }
        );
    }

    #[test]
    fn all_zero_values_do_not_flag_outliers() {
        let series = points(&[("a", 0.0), ("b", 0.0)]);
        assert!(sentences(&series).is_empty());
    }

    #[test]
    fn insights_serialize_as_sentences() {
        let json = serde_json::to_string(&vec![Insight::Trend(TrendDirection::Increasing)])
            .expect("serialize");
        assert_eq!(json, r#"["Overall trend appears to be increasing"]"#);
    }
}
