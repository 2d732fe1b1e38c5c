/// Category hierarchy derivation.
///
/// The `category` column holds a pipe-delimited path such as
/// `Electronics|Computers|Laptops`. The first segment becomes
/// `top_category` and the last segment `bottom_category`.
use crate::column::{Column, ColumnType, ColumnValue};
use crate::error::Result;
use crate::table::Table;

pub const CATEGORY: &str = "category";
pub const TOP_CATEGORY: &str = "top_category";
pub const BOTTOM_CATEGORY: &str = "bottom_category";

const DELIMITER: char = '|';

/// Split a category path into its top and bottom segments.
///
/// ```
/// use catalogview::category::split_category;
///
/// assert_eq!(split_category("A"), ("A", "A"));
/// assert_eq!(split_category("A|B|C"), ("A", "C"));
/// ```
pub fn split_category(path: &str) -> (&str, &str) {
    let top = path.split(DELIMITER).next().unwrap_or(path);
    let bottom = path.rsplit(DELIMITER).next().unwrap_or(path);
    (top, bottom)
}

/// Append `top_category` and `bottom_category` when the table has a
/// `category` column. Tables without one are returned unchanged.
pub fn derive_categories(table: &Table) -> Result<Table> {
    let Some(category) = table.column(CATEGORY) else {
        log::debug!("no '{}' column, skipping category derivation", CATEGORY);
        return Ok(table.clone());
    };

    let mut top = Vec::with_capacity(category.len());
    let mut bottom = Vec::with_capacity(category.len());
    for value in category.iter() {
        match value.to_text() {
            Some(path) => {
                let (t, b) = split_category(&path);
                top.push(ColumnValue::String(t.to_string()));
                bottom.push(ColumnValue::String(b.to_string()));
            }
            None => {
                top.push(ColumnValue::Null);
                bottom.push(ColumnValue::Null);
            }
        }
    }

    table
        .with_column(Column::from_values(TOP_CATEGORY, ColumnType::String, top)?)?
        .with_column(Column::from_values(BOTTOM_CATEGORY, ColumnType::String, bottom)?)
}
