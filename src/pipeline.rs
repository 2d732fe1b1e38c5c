/// The dashboard pipeline: ingest → normalize → derive → filter → report.
///
/// Each stage takes the previous stage's table and returns a new one. A
/// full run happens for every user interaction; nothing is cached between
/// runs.
use crate::category::derive_categories;
use crate::clean::{normalize, NormalizeReport};
use crate::column::ColumnValue;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filter::{category_choices, CategoryFilter};
use crate::report::Report;
use crate::table::Table;
use serde::Serialize;

/// Name given to every uploaded table
pub const UPLOAD_TABLE: &str = "upload";

/// The first rows of the cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ColumnValue>>,
    pub total_rows: usize,
}

impl Preview {
    pub fn of(table: &Table, n: usize) -> Self {
        let head = table.head(n);
        let rows = (0..head.len())
            .map(|i| {
                head.columns()
                    .iter()
                    .map(|c| c.get(i).cloned().unwrap_or(ColumnValue::Null))
                    .collect()
            })
            .collect();

        Preview {
            columns: table.schema().get_column_names().iter().map(|s| s.to_string()).collect(),
            rows,
            total_rows: table.len(),
        }
    }
}

/// The cleaned table with derived categories, before any filtering.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub table: Table,
    pub preview: Preview,
    pub normalize: NormalizeReport,
}

/// Everything one interaction renders.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub preview: Preview,
    pub normalize: NormalizeReport,
    pub choices: Vec<String>,
    pub selected: Vec<String>,
    pub report: Report,
}

/// Parse an uploaded CSV file.
pub fn ingest(data: &[u8]) -> Result<Table> {
    let table = Table::from_csv(UPLOAD_TABLE, data).map_err(|e| {
        log::warn!("ingestion failed: {}", e);
        e
    })?;
    log::debug!(
        "ingested {} rows x {} columns",
        table.len(),
        table.schema().len()
    );
    Ok(table)
}

/// Ingest, clean the known columns and derive the category levels.
pub fn prepare(data: &[u8], config: &DashboardConfig) -> Result<Prepared> {
    let raw = ingest(data)?;
    let (cleaned, normalize_report) = normalize(&raw)?;
    let preview = Preview::of(&cleaned, config.preview_rows);
    let table = derive_categories(&cleaned)?;

    Ok(Prepared {
        table,
        preview,
        normalize: normalize_report,
    })
}

/// Run the whole pipeline for one interaction.
///
/// ```
/// use catalogview::{pipeline, CategoryFilter, DashboardConfig};
///
/// let csv = "category,discounted_price\nElectronics|Laptops,\"₹1,999\"\nHome|Kitchen,₹49\n";
/// let dashboard = pipeline::run(
///     csv.as_bytes(),
///     &CategoryFilter::new(["Kitchen"]),
///     &DashboardConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(dashboard.choices, vec!["Laptops", "Kitchen"]);
/// assert_eq!(dashboard.report.rows, 1);
/// ```
pub fn run(data: &[u8], filter: &CategoryFilter, config: &DashboardConfig) -> Result<Dashboard> {
    let prepared = prepare(data, config)?;
    let choices = category_choices(&prepared.table);
    let filtered = filter.apply(&prepared.table);
    let report = Report::build(&filtered, config);

    log::info!(
        "dashboard built: {} of {} rows after filtering, {} categories selected",
        filtered.len(),
        prepared.table.len(),
        filter.selected().count()
    );

    Ok(Dashboard {
        preview: prepared.preview,
        normalize: prepared.normalize,
        choices,
        selected: filter.selected().map(str::to_string).collect(),
        report,
    })
}
