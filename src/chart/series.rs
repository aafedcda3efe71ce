//! Reshape flat query-result rows into aligned chart series.
//!
//! The reporting views return one row per (series, category) data point. A
//! line-chart renderer instead wants one array per series, aligned to a shared
//! category axis, with explicit gaps where a series has no point. Gaps are
//! never interpolated or carried forward; a missing point must render as a
//! visible break.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

/// One flat result row from the query proxy.
pub type ChartRow = Map<String, Value>;

/// One rendered series: a legend label and one slot per category.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// The aligned output: sorted category axis plus per-series value arrays,
/// each the same length as `categories`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    pub categories: Vec<String>,
    pub series: Vec<SeriesLine>,
}

/// Groups rows by a series field and aligns them to a shared category axis.
///
/// Series order defaults to first-seen order, which preserves whatever the
/// upstream query's `ORDER BY` produced. Callers that cannot rely on row
/// arrival order pin the legend explicitly with [`with_label_order`].
///
/// [`with_label_order`]: SeriesBuilder::with_label_order
pub struct SeriesBuilder {
    x: String,
    y: String,
    series: String,
    label_order: Option<Vec<String>>,
}

impl SeriesBuilder {
    /// `x`, `y`, `series` name the row fields holding the category key, the
    /// metric value, and the series label. All other fields are ignored.
    pub fn new(
        x: impl Into<String>,
        y: impl Into<String>,
        series: impl Into<String>,
    ) -> Self {
        SeriesBuilder {
            x: x.into(),
            y: y.into(),
            series: series.into(),
            label_order: None,
        }
    }

    /// Pin an explicit legend order. Labels absent from the data produce
    /// all-gap series; labels present in the data but missing here append in
    /// first-seen order.
    pub fn with_label_order(mut self, labels: Vec<String>) -> Self {
        self.label_order = Some(labels);
        self
    }

    /// Single pass over the rows, then alignment against the sorted axis.
    pub fn build(&self, rows: &[ChartRow]) -> AlignedSeries {
        // series label -> category -> metric; first row wins per pair
        let mut points: HashMap<String, HashMap<String, Option<f64>>> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();
        let mut categories: Vec<String> = Vec::new();
        let mut seen_categories: HashSet<String> = HashSet::new();

        for row in rows {
            // Rows without a usable category or series label carry no
            // renderable point
            let Some(category) = row.get(&self.x).and_then(key_string) else {
                continue;
            };
            let Some(label) = row.get(&self.series).and_then(key_string) else {
                continue;
            };
            let metric = row.get(&self.y).and_then(metric_value);

            if !points.contains_key(&label) {
                first_seen.push(label.clone());
            }
            let series_points = points.entry(label.clone()).or_default();
            series_points.entry(category.clone()).or_insert(metric);

            if seen_categories.insert(category.clone()) {
                categories.push(category);
            }
        }

        sort_numeric(&mut categories);

        let order = self.legend_order(first_seen);

        let series = order
            .into_iter()
            .map(|label| {
                let series_points = points.get(&label);
                let values = categories
                    .iter()
                    .map(|category| {
                        series_points
                            .and_then(|p| p.get(category))
                            .copied()
                            .flatten()
                    })
                    .collect();
                SeriesLine { label, values }
            })
            .collect();

        AlignedSeries { categories, series }
    }

    fn legend_order(&self, first_seen: Vec<String>) -> Vec<String> {
        match &self.label_order {
            None => first_seen,
            Some(explicit) => {
                let mut order = explicit.clone();
                for label in first_seen {
                    if !order.contains(&label) {
                        order.push(label);
                    }
                }
                order
            }
        }
    }
}

/// Category keys and series labels are strings on the wire; numbers are
/// rendered through their JSON form so week `3` and `"3"` share an axis slot.
fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Explicit metric conversion at the chart boundary: JSON numbers pass
/// through, numeric-looking strings parse, anything else is a gap.
fn metric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Ascending numeric sort for numeric-as-string keys (week and month
/// numbers). Non-numeric keys sort after all numeric ones, lexicographically
/// among themselves.
fn sort_numeric(categories: &mut [String]) {
    categories.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
}
