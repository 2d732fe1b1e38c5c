/// Row filtering.
///
/// A FilterView selects rows from a parent table with a predicate and keeps
/// a mapping from view indices to parent indices. `CategoryFilter` builds
/// one over `bottom_category` and materializes the result as a new table.
use crate::category::BOTTOM_CATEGORY;
use crate::column::ColumnValue;
use crate::error::{Error, Result};
use crate::table::{RowRef, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A read-only filtered view over a parent table.
pub struct FilterView<'a> {
    parent: &'a Table,
    view_to_parent: Vec<usize>,
}

impl<'a> FilterView<'a> {
    pub fn new<F>(parent: &'a Table, predicate: F) -> Self
    where
        F: Fn(RowRef<'a>) -> bool,
    {
        let view_to_parent = (0..parent.len())
            .filter(|&i| predicate(parent.row(i)))
            .collect();

        FilterView {
            parent,
            view_to_parent,
        }
    }

    pub fn len(&self) -> usize {
        self.view_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_parent.is_empty()
    }

    /// Parent row index behind a view index.
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.view_to_parent.get(index).copied()
    }

    pub fn get_row(&self, index: usize) -> Result<HashMap<String, ColumnValue>> {
        let parent_index = self.parent_index(index).ok_or(Error::RowOutOfRange {
            row: index,
            len: self.len(),
        })?;
        self.parent.get_row(parent_index)
    }

    pub fn get_value(&self, row: usize, column: &str) -> Result<&'a ColumnValue> {
        let parent_index = self.parent_index(row).ok_or(Error::RowOutOfRange {
            row,
            len: self.len(),
        })?;
        self.parent.get_value(parent_index, column)
    }

    /// Copy the selected rows into a standalone table.
    pub fn materialize(&self) -> Table {
        self.parent.take_rows(&self.view_to_parent)
    }
}

/// The user's bottom-category selection. Empty means "no filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFilter {
    selected: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new<I, S>(selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryFilter {
            selected: selected.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn matches(&self, bottom_category: Option<&str>) -> bool {
        bottom_category.map_or(false, |c| self.selected.contains(c))
    }

    /// Keep the rows whose `bottom_category` is selected.
    ///
    /// ```
    /// use catalogview::{CategoryFilter, Table};
    ///
    /// let table = Table::from_csv("t", b"bottom_category\nLaptops\nPhones\nLaptops\n").unwrap();
    ///
    /// assert_eq!(CategoryFilter::default().apply(&table).len(), 3);
    /// assert_eq!(CategoryFilter::new(["Laptops"]).apply(&table).len(), 2);
    /// ```
    pub fn apply(&self, table: &Table) -> Table {
        if self.is_empty() {
            return table.clone();
        }
        if !table.has_column(BOTTOM_CATEGORY) {
            log::debug!("no '{}' column, filter passes table through", BOTTOM_CATEGORY);
            return table.clone();
        }

        let view = FilterView::new(table, |row| self.matches(row.get_str(BOTTOM_CATEGORY)));
        log::debug!(
            "category filter kept {} of {} rows ({} categories selected)",
            view.len(),
            table.len(),
            self.selected.len()
        );
        view.materialize()
    }
}

/// Distinct non-missing `bottom_category` values in order of first
/// appearance.
pub fn category_choices(table: &Table) -> Vec<String> {
    let Some(column) = table.column(BOTTOM_CATEGORY) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    column
        .iter()
        .filter_map(ColumnValue::as_string)
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}
