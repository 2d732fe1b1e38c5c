/// Reporting views over the cleaned, filtered table.
///
/// Every view is read-only and computed fresh. A view whose source columns
/// are absent is skipped (`None`) instead of failing the report.
pub mod correlation;
pub mod frequency;
pub mod grouped;
pub mod summary;

use crate::category::BOTTOM_CATEGORY;
use crate::clean::{ACTUAL_PRICE, DISCOUNTED_PRICE, RATING};
use crate::config::DashboardConfig;
use crate::table::Table;
use serde::Serialize;
use std::cmp::Ordering;

pub use correlation::{correlation_matrix, CorrelationMatrix, CORRELATION_COLUMNS};
pub use frequency::{category_counts, CategoryCount};
pub use grouped::{price_comparison, rating_comparison, PriceComparison, RatingComparison};
pub use summary::{describe, CategoricalSummary, NumericSummary, Summary};

/// Sort order for nullable numeric keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Compare two nullable numbers. NULLs and NaN sort after every value
/// regardless of the order.
pub fn compare_nullable(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    let a = a.filter(|v| !v.is_nan());
    let b = b.filter(|v| !v.is_nan());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let base = a.total_cmp(&b);
            match order {
                SortOrder::Ascending => base,
                SortOrder::Descending => base.reverse(),
            }
        }
    }
}

/// Which views the table can support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub bottom_category: bool,
    pub actual_price: bool,
    pub discounted_price: bool,
    pub rating: bool,
    pub correlation_columns: Vec<&'static str>,
}

impl Capabilities {
    pub fn of(table: &Table) -> Self {
        Capabilities {
            bottom_category: table.has_column(BOTTOM_CATEGORY),
            actual_price: table.has_column(ACTUAL_PRICE),
            discounted_price: table.has_column(DISCOUNTED_PRICE),
            rating: table.has_column(RATING),
            correlation_columns: CORRELATION_COLUMNS
                .iter()
                .copied()
                .filter(|c| table.has_column(c))
                .collect(),
        }
    }

    pub fn category_frequency(&self) -> bool {
        self.bottom_category
    }

    pub fn price_comparison(&self) -> bool {
        self.bottom_category && self.actual_price && self.discounted_price
    }

    pub fn rating_comparison(&self) -> bool {
        self.bottom_category && self.rating
    }

    pub fn correlation(&self) -> bool {
        !self.correlation_columns.is_empty()
    }
}

/// All reporting views for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: usize,
    /// How many categories the ranked views were cut to
    pub top_n: usize,
    pub summary: Summary,
    pub category_counts: Option<Vec<CategoryCount>>,
    pub price_comparison: Option<Vec<PriceComparison>>,
    pub rating_comparison: Option<Vec<RatingComparison>>,
    pub correlation: Option<CorrelationMatrix>,
}

impl Report {
    pub fn build(table: &Table, config: &DashboardConfig) -> Report {
        let caps = Capabilities::of(table);
        let top_n = config.top_n;

        let category_counts = caps
            .category_frequency()
            .then(|| category_counts(table, top_n));
        let price_comparison = caps
            .price_comparison()
            .then(|| price_comparison(table, top_n));
        let rating_comparison = caps
            .rating_comparison()
            .then(|| rating_comparison(table, top_n));
        let correlation = caps
            .correlation()
            .then(|| correlation_matrix(table, &caps.correlation_columns));

        for (view, present) in [
            ("category frequency", category_counts.is_some()),
            ("price comparison", price_comparison.is_some()),
            ("rating comparison", rating_comparison.is_some()),
            ("correlation", correlation.is_some()),
        ] {
            if !present {
                log::debug!("skipping {} view: required columns absent", view);
            }
        }

        Report {
            rows: table.len(),
            top_n,
            summary: describe(table),
            category_counts,
            price_comparison,
            rating_comparison,
            correlation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_nullable() {
        assert_eq!(compare_nullable(Some(1.0), Some(2.0), SortOrder::Ascending), Ordering::Less);
        assert_eq!(compare_nullable(Some(1.0), Some(2.0), SortOrder::Descending), Ordering::Greater);
        assert_eq!(compare_nullable(None, Some(2.0), SortOrder::Descending), Ordering::Greater);
        assert_eq!(compare_nullable(Some(2.0), None, SortOrder::Ascending), Ordering::Less);
        assert_eq!(compare_nullable(None, None, SortOrder::Ascending), Ordering::Equal);
        assert_eq!(compare_nullable(Some(f64::NAN), Some(2.0), SortOrder::Descending), Ordering::Greater);
        assert_eq!(compare_nullable(Some(1.0), Some(f64::NAN), SortOrder::Ascending), Ordering::Less);
        assert_eq!(
            compare_nullable(Some(f64::INFINITY), Some(2.0), SortOrder::Descending),
            Ordering::Less
        );
    }

    #[test]
    fn test_capabilities() {
        let table = Table::from_csv("t", b"bottom_category,rating,rating_count\nA,4.0,10\n").unwrap();
        let caps = Capabilities::of(&table);

        assert!(caps.category_frequency());
        assert!(caps.rating_comparison());
        assert!(!caps.price_comparison());
        assert_eq!(caps.correlation_columns, vec!["rating", "rating_count"]);
    }

    #[test]
    fn test_report_skips_views_without_columns() {
        let table = Table::from_csv("t", b"name,notes\nx,y\n").unwrap();
        let report = Report::build(&table, &DashboardConfig::default());

        assert_eq!(report.rows, 1);
        assert!(report.category_counts.is_none());
        assert!(report.price_comparison.is_none());
        assert!(report.rating_comparison.is_none());
        assert!(report.correlation.is_none());
        assert!(report.summary.numeric.is_empty());
        assert_eq!(report.summary.categorical.len(), 2);
    }

    #[test]
    fn test_report_all_views() {
        let csv = "bottom_category,actual_price,discounted_price,rating\n\
                   A,100,80,4.0\n\
                   B,50,45,3.0\n\
                   A,300,200,5.0\n";
        let table = Table::from_csv("t", csv.as_bytes()).unwrap();
        let report = Report::build(&table, &DashboardConfig::default());

        assert_eq!(report.category_counts.as_ref().map(Vec::len), Some(2));
        assert_eq!(report.price_comparison.as_ref().map(Vec::len), Some(2));
        assert_eq!(report.rating_comparison.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            report.correlation.as_ref().map(|c| c.columns.clone()),
            Some(vec![
                "actual_price".to_string(),
                "discounted_price".to_string(),
                "rating".to_string()
            ])
        );
        assert_eq!(report.summary.numeric.len(), 3);
    }
}
