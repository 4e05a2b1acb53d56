use serde::{Deserialize, Serialize};

/// Category ("X") and value ("Y") columns driving a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    pub category_column: Option<String>,
    pub value_column: Option<String>,
}

impl AxisSelection {
    pub fn new(category_column: Option<String>, value_column: Option<String>) -> Self {
        Self {
            category_column,
            value_column,
        }
    }

    /// `"region vs sales"` (category, then value), empty until both are set.
    pub fn caption(&self) -> String {
        match (&self.category_column, &self.value_column) {
            (Some(x), Some(y)) => format!("{x} vs {y}"),
            _ => String::new(),
        }
    }
}

/// Fills the unset half (or halves) of `current` with the first text and the
/// first numeric column. Choices already present are never replaced.
///
/// Both candidate lists are expected in column order. `columns` is the full
/// canonical column list; candidates not listed there are ignored.
pub fn suggest_axes(
    columns: &[String],
    numeric_columns: &[String],
    text_columns: &[String],
    current: &AxisSelection,
) -> AxisSelection {
    let first_listed = |candidates: &[String]| {
        candidates
            .iter()
            .find(|candidate| columns.contains(candidate))
            .cloned()
    };

    AxisSelection {
        category_column: current
            .category_column
            .clone()
            .or_else(|| first_listed(text_columns)),
        value_column: current
            .value_column
            .clone()
            .or_else(|| first_listed(numeric_columns)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn fills_both_axes_from_first_candidates() {
        let columns = names(&["id", "region", "city", "sales", "units"]);
        let selection = suggest_axes(
            &columns,
            &names(&["id", "sales", "units"]),
            &names(&["region", "city"]),
            &AxisSelection::default(),
        );
        assert_eq!(selection.category_column.as_deref(), Some("region"));
        assert_eq!(selection.value_column.as_deref(), Some("id"));
        assert_eq!(selection.caption(), "region vs id");
    }

    #[test]
    fn keeps_existing_choices() {
        let columns = names(&["region", "city", "sales", "units"]);
        let current = AxisSelection::new(Some("city".into()), None);
        let selection = suggest_axes(
            &columns,
            &names(&["sales", "units"]),
            &names(&["region", "city"]),
            &current,
        );
        assert_eq!(selection.category_column.as_deref(), Some("city"));
        assert_eq!(selection.value_column.as_deref(), Some("sales"));

        let again = suggest_axes(
            &columns,
            &names(&["sales", "units"]),
            &names(&["region", "city"]),
            &selection,
        );
        assert_eq!(again, selection);
    }

    #[test]
    fn leaves_axes_unset_without_candidates() {
        let columns = names(&["a", "b"]);
        let selection = suggest_axes(&columns, &[], &[], &AxisSelection::default());
        assert_eq!(selection, AxisSelection::default());
        assert_eq!(selection.caption(), "");
    }

    #[test]
    fn empty_dataset_yields_unset_selection() {
        let selection = suggest_axes(&[], &[], &[], &AxisSelection::default());
        assert_eq!(selection.category_column, None);
        assert_eq!(selection.value_column, None);
    }

    #[test]
    fn caption_joins_resolved_axes() {
        let selection = AxisSelection::new(Some("month".into()), Some("rev".into()));
        assert_eq!(selection.caption(), "month vs rev");
    }
}
