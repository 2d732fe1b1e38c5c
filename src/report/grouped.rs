/// Grouped means per bottom-level category.
use super::{compare_nullable, SortOrder};
use crate::category::BOTTOM_CATEGORY;
use crate::clean::{ACTUAL_PRICE, DISCOUNTED_PRICE, RATING};
use crate::table::Table;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub category: String,
    pub actual_price: Option<f64>,
    pub discounted_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingComparison {
    pub category: String,
    pub rating: Option<f64>,
}

#[derive(Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// Undefined for an empty group, or when the values cancel to NaN
    /// (`inf` and `-inf` in the same group).
    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64).filter(|m| !m.is_nan())
    }
}

/// Mean of each value column per group key, groups in key order. Rows with
/// a missing key are dropped; missing values are skipped per column.
pub fn group_means(table: &Table, key: &str, value_columns: &[&str]) -> Vec<(String, Vec<Option<f64>>)> {
    let Some(keys) = table.column(key) else {
        return Vec::new();
    };
    let columns: Vec<_> = value_columns.iter().map(|c| table.column(c)).collect();

    let mut groups: BTreeMap<&str, Vec<MeanAccumulator>> = BTreeMap::new();
    for row in 0..table.len() {
        let Some(group) = keys.get_str(row) else {
            continue;
        };
        let accumulators = groups.entry(group).or_insert_with(|| {
            std::iter::repeat_with(MeanAccumulator::default)
                .take(columns.len())
                .collect()
        });
        for (acc, column) in accumulators.iter_mut().zip(&columns) {
            acc.push(column.and_then(|c| c.get_f64(row)));
        }
    }

    groups
        .into_iter()
        .map(|(group, accs)| (group.to_string(), accs.iter().map(MeanAccumulator::mean).collect()))
        .collect()
}

/// Mean actual and discounted price per category, highest mean actual price
/// first, keeping the first `top_n`.
pub fn price_comparison(table: &Table, top_n: usize) -> Vec<PriceComparison> {
    let mut rows: Vec<PriceComparison> = group_means(table, BOTTOM_CATEGORY, &[ACTUAL_PRICE, DISCOUNTED_PRICE])
        .into_iter()
        .map(|(category, means)| PriceComparison {
            category,
            actual_price: means[0],
            discounted_price: means[1],
        })
        .collect();

    rows.sort_by(|a, b| compare_nullable(a.actual_price, b.actual_price, SortOrder::Descending));
    rows.truncate(top_n);
    rows
}

/// Mean rating per category, highest first, keeping the first `top_n`.
pub fn rating_comparison(table: &Table, top_n: usize) -> Vec<RatingComparison> {
    let mut rows: Vec<RatingComparison> = group_means(table, BOTTOM_CATEGORY, &[RATING])
        .into_iter()
        .map(|(category, means)| RatingComparison {
            category,
            rating: means[0],
        })
        .collect();

    rows.sort_by(|a, b| compare_nullable(a.rating, b.rating, SortOrder::Descending));
    rows.truncate(top_n);
    rows
}
