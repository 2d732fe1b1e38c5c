/// CatalogView Column Implementation
///
/// A Column is a named, typed, random-access sequence of values indexed by
/// row. Every column accepts `ColumnValue::Null`, which is the missing marker
/// used throughout the pipeline.
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt::Debug;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Bool,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }
}

/// Column value enum to support multiple types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int64(i64),
    Float64(f64),
    String(String),
    Bool(bool),
    Null,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ColumnValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value, widening integers. NaN counts as missing.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Int64(n) => Some(*n as f64),
            ColumnValue::Float64(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Text form of the value as it would appear in a CSV cell.
    /// Returns None for NULL.
    pub fn to_text(&self) -> Option<String> {
        match self {
            ColumnValue::Int64(n) => Some(n.to_string()),
            ColumnValue::Float64(f) => Some(format_float(*f)),
            ColumnValue::String(s) => Some(s.clone()),
            ColumnValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            ColumnValue::Null => None,
        }
    }

    fn type_matches(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (ColumnValue::Null, _)
                | (ColumnValue::Int64(_), ColumnType::Int64)
                | (ColumnValue::Float64(_), ColumnType::Float64)
                | (ColumnValue::String(_), ColumnType::String)
                | (ColumnValue::Bool(_), ColumnType::Bool)
        )
    }
}

/// Floats always keep a fractional part so `999` reads back as `999.0`.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// A typed column of values.
#[derive(Clone)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<ColumnValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            column_type,
            values: Vec::new(),
        }
    }

    /// Build a column from values, checking every value against the type.
    pub fn from_values(
        name: impl Into<String>,
        column_type: ColumnType,
        values: Vec<ColumnValue>,
    ) -> Result<Self> {
        let mut column = Column::new(name, column_type);
        column.values.reserve(values.len());
        for value in values {
            column.append(value)?;
        }
        Ok(column)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&ColumnValue> {
        self.values.get(index).ok_or(Error::RowOutOfRange {
            row: index,
            len: self.values.len(),
        })
    }

    /// Fast numeric access. Returns None if the value is null, not numeric,
    /// or the index is out of bounds.
    #[inline]
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(ColumnValue::to_f64)
    }

    /// Borrow the string at `index`, None for NULL or non-string values.
    #[inline]
    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(ColumnValue::as_string)
    }

    #[inline]
    pub fn is_null_at(&self, index: usize) -> bool {
        self.values.get(index).map_or(true, ColumnValue::is_null)
    }

    pub fn append(&mut self, value: ColumnValue) -> Result<()> {
        if !value.type_matches(self.column_type) {
            return Err(Error::TypeMismatch {
                column: self.name.clone(),
                expected: self.column_type,
                found: format!("{:?}", value),
            });
        }
        self.values.push(value);
        Ok(())
    }

    /// Number of non-NULL values.
    pub fn count_non_null(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// Non-missing numeric values in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(ColumnValue::to_f64).collect()
    }

    /// New column holding the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            column_type: self.column_type,
            values: indices
                .iter()
                .map(|&i| self.values.get(i).cloned().unwrap_or(ColumnValue::Null))
                .collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnValue> {
        self.values.iter()
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column {{ name: '{}', type: {:?}, len: {} }}",
            self.name,
            self.column_type,
            self.len()
        )
    }
}
