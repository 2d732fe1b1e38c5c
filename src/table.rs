/// CatalogView Table Implementation
///
/// A Table is a named collection of equal-length typed columns with a schema.
/// Tables are immutable once built: every pipeline stage reads a `&Table` and
/// returns a new one.
///
/// # Examples
///
/// ```
/// use catalogview::Table;
///
/// let csv = "id,name,score\n1,Alice,95.5\n2,Bob,87.0";
/// let table = Table::from_csv("students", csv.as_bytes()).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get_value(0, "name").unwrap().as_string(), Some("Alice"));
/// assert_eq!(table.get_value(1, "score").unwrap().as_f64(), Some(87.0));
/// ```
use crate::column::{Column, ColumnType, ColumnValue};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Schema definition with column names and types.
///
/// ```
/// use catalogview::{Schema, ColumnType};
///
/// let schema = Schema::new(vec![
///     ("id".to_string(), ColumnType::Int64),
///     ("category".to_string(), ColumnType::String),
/// ]);
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get_column_index("category"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<(String, ColumnType)>,
}

impl Schema {
    pub fn new(columns: Vec<(String, ColumnType)>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    pub fn get_column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_column_index(name).is_some()
    }
}

/// Root table owning its data.
#[derive(Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create an empty table with the given schema.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|(col_name, col_type)| Column::new(col_name.clone(), *col_type))
            .collect();

        Table {
            name: name.into(),
            schema,
            columns,
            row_count: 0,
        }
    }

    /// Assemble a table from already-built columns. All columns must have
    /// the same length.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        for col in &columns {
            if col.len() != row_count {
                return Err(Error::LengthMismatch {
                    column: col.name().to_string(),
                    expected: row_count,
                    found: col.len(),
                });
            }
        }

        let schema = Schema::new(
            columns
                .iter()
                .map(|c| (c.name().to_string(), c.column_type()))
                .collect(),
        );

        Ok(Table {
            name: name.into(),
            schema,
            columns,
            row_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.schema
            .get_column_index(name)
            .map(|idx| &self.columns[idx])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of the Int64 and Float64 columns, in schema order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.column_type().is_numeric())
            .map(Column::name)
            .collect()
    }

    pub fn get_value(&self, row: usize, column: &str) -> Result<&ColumnValue> {
        self.column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?
            .get(row)
    }

    pub fn get_row(&self, row: usize) -> Result<HashMap<String, ColumnValue>> {
        if row >= self.row_count {
            return Err(Error::RowOutOfRange {
                row,
                len: self.row_count,
            });
        }

        let mut result = HashMap::new();
        for col in &self.columns {
            result.insert(col.name().to_string(), col.get(row)?.clone());
        }
        Ok(result)
    }

    /// Borrowing handle to one row, for predicates that read a few columns.
    pub fn row(&self, index: usize) -> RowRef<'_> {
        RowRef { table: self, index }
    }

    pub fn iter_rows(&self) -> TableRowIterator<'_> {
        TableRowIterator {
            table: self,
            index: 0,
        }
    }

    /// Return a new table with `column` added, or replacing the existing
    /// column of the same name in place.
    pub fn with_column(&self, column: Column) -> Result<Table> {
        if column.len() != self.row_count && !self.columns.is_empty() {
            return Err(Error::LengthMismatch {
                column: column.name().to_string(),
                expected: self.row_count,
                found: column.len(),
            });
        }

        let mut columns = self.columns.clone();
        match self.schema.get_column_index(column.name()) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Table::from_columns(self.name.clone(), columns)
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            name: self.name.clone(),
            schema: self.schema.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            row_count: indices.len(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..n.min(self.row_count)).collect();
        self.take_rows(&indices)
    }

    // ========================================================================
    // Aggregation Methods
    // ========================================================================

    /// Sum of the numeric values in a column. NULL values are skipped.
    pub fn sum(&self, column: &str) -> Result<f64> {
        let col = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        Ok(col.numeric_values().iter().sum())
    }

    /// Number of non-NULL values in a column.
    pub fn count_non_null(&self, column: &str) -> Result<usize> {
        let col = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        Ok(col.count_non_null())
    }

    /// Average of the numeric values in a column. NULL values are skipped.
    /// Returns None if there are no non-NULL numeric values.
    pub fn avg(&self, column: &str) -> Result<Option<f64>> {
        let col = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        let values = col.numeric_values();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    pub fn min(&self, column: &str) -> Result<Option<f64>> {
        let col = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        Ok(col.numeric_values().into_iter().reduce(f64::min))
    }

    pub fn max(&self, column: &str) -> Result<Option<f64>> {
        let col = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        Ok(col.numeric_values().into_iter().reduce(f64::max))
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Create a table from CSV bytes.
    ///
    /// The first record is the header. Column types are inferred from every
    /// non-empty cell in the column:
    /// - all integers → INT64
    /// - integers and decimals → FLOAT64
    /// - "true"/"false" (case-insensitive) → BOOL
    /// - anything else → STRING
    ///
    /// Empty cells become NULL. Blank lines are skipped, but a record of
    /// empty fields is kept as an all-NULL row. Records shorter than the
    /// header are padded with NULL; fields past the header's width are
    /// dropped with a warning.
    pub fn from_csv(name: &str, data: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let column_names = normalize_headers(reader.headers()?);
        if column_names.is_empty() {
            return Err(Error::EmptyInput);
        }
        let width = column_names.len();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); width];
        let mut padded = 0usize;
        let mut truncated = 0usize;
        for record in reader.records() {
            let record = record?;
            if record.len() < width {
                padded += 1;
            } else if record.iter().skip(width).any(|f| !f.trim().is_empty()) {
                truncated += 1;
            }
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or("").trim().to_string());
            }
        }

        if padded > 0 {
            log::debug!("{}: padded {} short records with NULL", name, padded);
        }
        if truncated > 0 {
            log::warn!(
                "{}: dropped extra fields from {} records wider than the {}-column header",
                name,
                truncated,
                width
            );
        }

        let columns = column_names
            .into_iter()
            .zip(cells)
            .map(|(col_name, raw)| {
                let col_type = infer_column_type(&raw);
                let values = raw.iter().map(|v| parse_csv_value(v, col_type)).collect();
                Column::from_values(col_name, col_type, values)
            })
            .collect::<Result<Vec<_>>>()?;

        Table::from_columns(name, columns)
    }
}

/// Strip a leading byte-order mark, name blank headers and de-duplicate
/// repeated ones with `.1`, `.2`, ... suffixes.
fn normalize_headers(headers: &csv::StringRecord) -> Vec<String> {
    // A lone empty field means there was no header line at all
    if headers.len() == 1 && headers[0].trim_start_matches('\u{feff}').is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for (i, raw) in headers.iter().enumerate() {
        let trimmed = raw.trim_start_matches('\u{feff}').trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        names.push(candidate);
    }

    names
}

/// Infer the narrowest type that fits every non-empty cell
fn infer_column_type(values: &[String]) -> ColumnType {
    let mut inferred: Option<ColumnType> = None;

    for value in values.iter().filter(|v| !v.is_empty()) {
        let cell_type = infer_type_from_csv_value(value);
        inferred = Some(match (inferred, cell_type) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(ColumnType::Int64), ColumnType::Float64)
            | (Some(ColumnType::Float64), ColumnType::Int64) => ColumnType::Float64,
            _ => return ColumnType::String,
        });
    }

    inferred.unwrap_or(ColumnType::String)
}

/// Infer the type of a single CSV value
fn infer_type_from_csv_value(value: &str) -> ColumnType {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return ColumnType::Bool;
    }
    if value.parse::<i64>().is_ok() {
        return ColumnType::Int64;
    }
    if value.parse::<f64>().is_ok() {
        return ColumnType::Float64;
    }
    ColumnType::String
}

/// Parse a CSV value into a ColumnValue based on the column type
fn parse_csv_value(value: &str, col_type: ColumnType) -> ColumnValue {
    if value.is_empty() {
        return ColumnValue::Null;
    }

    match col_type {
        ColumnType::Int64 => value
            .parse::<i64>()
            .map(ColumnValue::Int64)
            .unwrap_or(ColumnValue::Null),
        ColumnType::Float64 => value
            .parse::<f64>()
            .map(ColumnValue::Float64)
            .unwrap_or(ColumnValue::Null),
        ColumnType::Bool => ColumnValue::Bool(value.eq_ignore_ascii_case("true")),
        ColumnType::String => ColumnValue::String(value.to_string()),
    }
}

/// A borrowed view of a single table row.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a ColumnValue> {
        self.table.column(column)?.get(self.index).ok()
    }

    pub fn get_str(&self, column: &str) -> Option<&'a str> {
        self.table.column(column)?.get_str(self.index)
    }
}

pub struct TableRowIterator<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Iterator for TableRowIterator<'a> {
    type Item = HashMap<String, ColumnValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.table.row_count {
            None
        } else {
            let result = self.table.get_row(self.index).ok();
            self.index += 1;
            result
        }
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Table {{ name: '{}', columns: {}, rows: {} }}",
            self.name,
            self.schema.len(),
            self.row_count
        )
    }
}
