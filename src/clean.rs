/// Field normalization for the known catalog columns.
///
/// Each known column has a text-to-number rule. A rule never fails: a value
/// it cannot parse becomes `Cleaned::Missing`, which is stored as
/// `ColumnValue::Null`. Unknown columns pass through untouched.
use crate::column::{Column, ColumnType, ColumnValue};
use crate::error::Result;
use crate::table::Table;
use serde::Serialize;

pub const DISCOUNTED_PRICE: &str = "discounted_price";
pub const ACTUAL_PRICE: &str = "actual_price";
pub const DISCOUNT_PERCENTAGE: &str = "discount_percentage";
pub const RATING: &str = "rating";
pub const RATING_COUNT: &str = "rating_count";

/// Currency symbols removed from price cells before parsing.
pub const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£'];

/// Outcome of cleaning one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cleaned<T> {
    Value(T),
    Missing,
}

impl<T> Cleaned<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Cleaned::Value(v) => Some(v),
            Cleaned::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cleaned::Missing)
    }
}

impl<T> From<Option<T>> for Cleaned<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Cleaned::Value(v),
            None => Cleaned::Missing,
        }
    }
}

/// Parse a decimal, treating NaN as missing.
fn parse_decimal(text: &str) -> Cleaned<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .into()
}

fn parse_integer(text: &str) -> Cleaned<i64> {
    text.trim().parse::<i64>().ok().into()
}

/// Clean a price cell.
///
/// ```
/// use catalogview::clean::{clean_price, Cleaned};
///
/// assert_eq!(clean_price("₹1,234.50"), Cleaned::Value(1234.50));
/// assert_eq!(clean_price("n/a"), Cleaned::Missing);
/// ```
pub fn clean_price(raw: &str) -> Cleaned<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    parse_decimal(&stripped)
}

/// Clean a discount percentage cell such as `"64%"`.
pub fn clean_percentage(raw: &str) -> Cleaned<i64> {
    parse_integer(&raw.replace('%', ""))
}

pub fn clean_rating(raw: &str) -> Cleaned<f64> {
    parse_decimal(raw)
}

/// Clean a rating count cell such as `"24,269"`.
pub fn clean_rating_count(raw: &str) -> Cleaned<i64> {
    parse_integer(&raw.replace(',', ""))
}

/// The cleaning rule attached to a known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Price,
    Percentage,
    Rating,
    RatingCount,
}

impl FieldRule {
    /// Rule for a column name, None for columns that pass through.
    pub fn for_column(name: &str) -> Option<FieldRule> {
        match name {
            DISCOUNTED_PRICE | ACTUAL_PRICE => Some(FieldRule::Price),
            DISCOUNT_PERCENTAGE => Some(FieldRule::Percentage),
            RATING => Some(FieldRule::Rating),
            RATING_COUNT => Some(FieldRule::RatingCount),
            _ => None,
        }
    }

    pub fn output_type(&self) -> ColumnType {
        match self {
            FieldRule::Price | FieldRule::Rating => ColumnType::Float64,
            FieldRule::Percentage | FieldRule::RatingCount => ColumnType::Int64,
        }
    }

    /// Apply the rule to one cell. NULL input stays NULL.
    pub fn apply(&self, value: &ColumnValue) -> ColumnValue {
        let Some(text) = value.to_text() else {
            return ColumnValue::Null;
        };

        let cleaned = match self {
            FieldRule::Price => clean_price(&text).value().map(ColumnValue::Float64),
            FieldRule::Percentage => clean_percentage(&text).value().map(ColumnValue::Int64),
            FieldRule::Rating => clean_rating(&text).value().map(ColumnValue::Float64),
            FieldRule::RatingCount => clean_rating_count(&text).value().map(ColumnValue::Int64),
        };
        cleaned.unwrap_or(ColumnValue::Null)
    }

    /// Clean a whole column into a new column of the rule's output type.
    pub fn clean_column(&self, column: &Column) -> Result<(Column, usize)> {
        let mut failures = 0;
        let values = column
            .iter()
            .map(|raw| {
                let cleaned = self.apply(raw);
                if cleaned.is_null() && !raw.is_null() {
                    failures += 1;
                }
                cleaned
            })
            .collect();

        let cleaned = Column::from_values(column.name(), self.output_type(), values)?;
        Ok((cleaned, failures))
    }
}

/// Per-column count of cells that fell back to missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub cleaned_columns: Vec<String>,
    pub failures: Vec<(String, usize)>,
}

impl NormalizeReport {
    pub fn failures_for(&self, column: &str) -> usize {
        self.failures
            .iter()
            .find(|(name, _)| name == column)
            .map_or(0, |(_, n)| *n)
    }
}

/// Apply every known field rule to the columns present in `table`.
pub fn normalize(table: &Table) -> Result<(Table, NormalizeReport)> {
    let mut result = table.clone();
    let mut report = NormalizeReport::default();

    for column in table.columns() {
        let Some(rule) = FieldRule::for_column(column.name()) else {
            continue;
        };

        let (cleaned, failures) = rule.clean_column(column)?;
        log::debug!(
            "cleaned column '{}' as {:?}: {} of {} values unparseable",
            column.name(),
            rule,
            failures,
            column.len()
        );

        result = result.with_column(cleaned)?;
        report.cleaned_columns.push(column.name().to_string());
        if failures > 0 {
            report.failures.push((column.name().to_string(), failures));
        }
    }

    Ok((result, report))
}
