/// Summary statistics (count, mean, std, min, quartiles, max).
use crate::column::{Column, ColumnType, ColumnValue};
use crate::table::Table;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Describes a text column when the table has no numeric ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.categorical.is_empty()
    }
}

/// Quantile of sorted data with linear interpolation between neighbours.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn describe_numeric(table: &Table, column: &Column) -> NumericSummary {
    let name = column.name();
    let mut values = column.numeric_values();
    values.sort_by(|a, b| a.total_cmp(b));

    let mean = table.avg(name).ok().flatten();
    NumericSummary {
        column: name.to_string(),
        count: values.len(),
        mean,
        std: mean.and_then(|m| sample_std(&values, m)),
        min: table.min(name).ok().flatten(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: table.max(name).ok().flatten(),
    }
}

fn describe_categorical(column: &Column) -> CategoricalSummary {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for text in column.iter().filter_map(ColumnValue::to_text) {
        let entry = counts.entry(text.clone()).or_insert(0);
        if *entry == 0 {
            order.push(text);
        }
        *entry += 1;
    }

    // first-seen value wins ties
    let mut top: Option<(&String, usize)> = None;
    for value in &order {
        let n = counts[value];
        if top.map_or(true, |(_, best)| n > best) {
            top = Some((value, n));
        }
    }

    CategoricalSummary {
        column: column.name().to_string(),
        count: column.count_non_null(),
        unique: order.len(),
        top: top.map(|(v, _)| v.clone()),
        freq: top.map_or(0, |(_, n)| n),
    }
}

/// Describe every numeric column, or every text column if there are none.
pub fn describe(table: &Table) -> Summary {
    let numeric: Vec<NumericSummary> = table
        .columns()
        .iter()
        .filter(|c| c.column_type().is_numeric())
        .map(|c| describe_numeric(table, c))
        .collect();

    if !numeric.is_empty() {
        return Summary {
            numeric,
            categorical: Vec::new(),
        };
    }

    Summary {
        numeric,
        categorical: table
            .columns()
            .iter()
            .filter(|c| matches!(c.column_type(), ColumnType::String | ColumnType::Bool))
            .map(describe_categorical)
            .collect(),
    }
}
