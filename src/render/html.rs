/// HTML for the dashboard page.
///
/// `render_dashboard` produces the fragment that replaces the page body on
/// every interaction; `index_page` is the static shell that hosts it. Both
/// are askama templates under `templates/`, so every piece of upload text
/// is escaped on output. Charts arrive as finished SVG markup.
use askama::Template;

use super::format_stat;
use super::svg::{self, Series};
use crate::column::ColumnValue;
use crate::error::Result;
use crate::pipeline::{Dashboard, Preview};
use crate::report::{
    CategoryCount, CorrelationMatrix, PriceComparison, RatingComparison, Summary,
};

/// Prompt shown until a file has been chosen.
pub const IDLE_PROMPT: &str = "Please upload a CSV file to start exploring.";

/// One table cell as the template prints it
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Bold row label
    Label(String),
    Text(String),
    Missing,
}

impl From<&ColumnValue> for Cell {
    fn from(value: &ColumnValue) -> Self {
        match value.to_text() {
            Some(text) => Cell::Text(text),
            None => Cell::Missing,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone)]
pub struct PriceSection {
    pub table: DataTable,
    pub chart: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub idle_prompt: &'a str,
}

/// The dashboard fragment. Absent views are `None` and render nothing.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub failures: Vec<(String, usize)>,
    pub preview: DataTable,
    pub total_rows: usize,
    pub summary: Option<DataTable>,
    pub category_chart: Option<String>,
    pub prices: Option<PriceSection>,
    pub rating_chart: Option<String>,
    pub heatmap: Option<String>,
}

fn preview_table(preview: &Preview) -> DataTable {
    DataTable {
        headers: preview.columns.clone(),
        rows: preview
            .rows
            .iter()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect(),
    }
}

fn stat(value: Option<f64>) -> Cell {
    Cell::Text(format_stat(value))
}

fn row_of(label: &str, cells: impl Iterator<Item = Cell>) -> Vec<Cell> {
    let mut row = vec![Cell::Label(label.to_string())];
    row.extend(cells);
    row
}

/// Statistics are laid out with one column per described field, like a
/// transposed record listing.
fn summary_table(summary: &Summary) -> DataTable {
    let mut headers = vec![String::new()];

    if !summary.numeric.is_empty() {
        headers.extend(summary.numeric.iter().map(|s| s.column.clone()));
        let n = &summary.numeric;
        let rows = vec![
            row_of("count", n.iter().map(|s| Cell::Text(s.count.to_string()))),
            row_of("mean", n.iter().map(|s| stat(s.mean))),
            row_of("std", n.iter().map(|s| stat(s.std))),
            row_of("min", n.iter().map(|s| stat(s.min))),
            row_of("25%", n.iter().map(|s| stat(s.q25))),
            row_of("50%", n.iter().map(|s| stat(s.median))),
            row_of("75%", n.iter().map(|s| stat(s.q75))),
            row_of("max", n.iter().map(|s| stat(s.max))),
        ];
        return DataTable { headers, rows };
    }

    headers.extend(summary.categorical.iter().map(|s| s.column.clone()));
    let c = &summary.categorical;
    let rows = vec![
        row_of("count", c.iter().map(|s| Cell::Text(s.count.to_string()))),
        row_of("unique", c.iter().map(|s| Cell::Text(s.unique.to_string()))),
        row_of(
            "top",
            c.iter().map(|s| s.top.clone().map(Cell::Text).unwrap_or(Cell::Missing)),
        ),
        row_of("freq", c.iter().map(|s| Cell::Text(s.freq.to_string()))),
    ];
    DataTable { headers, rows }
}

fn category_chart(counts: &[CategoryCount], top_n: usize) -> String {
    let labels: Vec<String> = counts.iter().map(|c| c.category.clone()).collect();
    let values: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();
    svg::horizontal_bar_chart(
        &format!("Top {} Categories by Product Count", top_n),
        &labels,
        &values,
    )
}

fn price_section(prices: &[PriceComparison]) -> PriceSection {
    let table = DataTable {
        headers: vec![
            "bottom_category".to_string(),
            "actual_price".to_string(),
            "discounted_price".to_string(),
        ],
        rows: prices
            .iter()
            .map(|p| {
                vec![
                    Cell::Text(p.category.clone()),
                    stat(p.actual_price),
                    stat(p.discounted_price),
                ]
            })
            .collect(),
    };

    let labels: Vec<String> = prices.iter().map(|p| p.category.clone()).collect();
    let series = [
        Series {
            name: "actual_price",
            color: svg::BLUE,
            values: prices.iter().map(|p| p.actual_price).collect(),
        },
        Series {
            name: "discounted_price",
            color: svg::ORANGE,
            values: prices.iter().map(|p| p.discounted_price).collect(),
        },
    ];

    PriceSection {
        table,
        chart: svg::grouped_bar_chart("Average Prices by Category", &labels, &series),
    }
}

fn rating_chart(ratings: &[RatingComparison], top_n: usize) -> String {
    let labels: Vec<String> = ratings.iter().map(|r| r.category.clone()).collect();
    let values: Vec<Option<f64>> = ratings.iter().map(|r| r.rating).collect();
    svg::bar_chart(
        &format!("Top {} Categories by Average Rating", top_n),
        &labels,
        &values,
        svg::AMBER,
    )
}

fn heatmap(matrix: &CorrelationMatrix) -> String {
    svg::heatmap("Correlation Heatmap", &matrix.columns, &matrix.values)
}

impl DashboardTemplate {
    pub fn new(dashboard: &Dashboard) -> Self {
        let report = &dashboard.report;
        let top_n = report.top_n;

        DashboardTemplate {
            failures: dashboard
                .normalize
                .failures
                .iter()
                .filter(|(_, n)| *n > 0)
                .cloned()
                .collect(),
            preview: preview_table(&dashboard.preview),
            total_rows: dashboard.preview.total_rows,
            summary: (!report.summary.is_empty()).then(|| summary_table(&report.summary)),
            category_chart: report.category_counts.as_deref().map(|c| category_chart(c, top_n)),
            prices: report.price_comparison.as_deref().map(price_section),
            rating_chart: report.rating_comparison.as_deref().map(|r| rating_chart(r, top_n)),
            heatmap: report.correlation.as_ref().map(heatmap),
        }
    }
}

/// The dashboard fragment for one interaction.
pub fn render_dashboard(dashboard: &Dashboard) -> Result<String> {
    Ok(DashboardTemplate::new(dashboard).render()?)
}

/// The single page served at `/`.
pub fn index_page() -> Result<String> {
    let page = IndexTemplate {
        idle_prompt: IDLE_PROMPT,
    };
    Ok(page.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::filter::CategoryFilter;
    use crate::pipeline;

    const CATALOG: &str = "product_id,category,discounted_price,actual_price,discount_percentage,rating,rating_count\n\
        B01,Computers&Accessories|Cables|USBCables,₹399,\"₹1,099\",64%,4.2,\"24,269\"\n\
        B02,Computers&Accessories|Cables|USBCables,₹199,₹349,43%,4.0,\"43,994\"\n\
        B03,Electronics|Mobiles|Smartphones,\"₹13,999\",\"₹24,999\",44%,4.2,\"32,840\"\n\
        B04,Home&Kitchen|Kitchen|<Kettles>,₹649,\"₹1,399\",54%,|,\n";

    fn dashboard(csv: &str) -> Dashboard {
        pipeline::run(csv.as_bytes(), &CategoryFilter::default(), &DashboardConfig::default()).unwrap()
    }

    fn render(dashboard: &Dashboard) -> String {
        render_dashboard(dashboard).unwrap()
    }

    #[test]
    fn test_sections_in_order() {
        let html = render(&dashboard(CATALOG));

        let headings = [
            "Preview of Data",
            "Basic Statistics",
            "Product Categories Distribution",
            "Average Actual Price vs Discounted Price (per category)",
            "Average Rating by Category",
            "Correlation Heatmap</h2>",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| html.find(h).unwrap_or_else(|| panic!("missing {}", h)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("<svg").count(), 4);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render(&dashboard(CATALOG));
        assert!(html.contains("&lt;Kettles&gt;"));
        assert!(!html.contains("<Kettles>"));
        assert!(html.contains("Computers&amp;Accessories"));
    }

    #[test]
    fn test_markup_in_column_names_is_escaped() {
        let html = render(&dashboard("<script>alert(1)</script>,it's\nx,1\n"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<th>&lt;script&gt;alert(1)"));
        assert!(html.contains("it&#x27;s"));
    }

    #[test]
    fn test_parse_failures_are_noted() {
        let html = render(&dashboard(CATALOG));
        assert!(html.contains("1 value(s) in <code>rating</code>"));
        assert!(html.contains("<span class=\"missing\">NaN</span>"));
    }

    #[test]
    fn test_skipped_views_are_omitted() {
        let html = render(&dashboard("name,rating\nA,4.1\nB,3.5\n"));

        assert!(html.contains("Preview of Data"));
        assert!(html.contains("Basic Statistics"));
        assert!(!html.contains("Product Categories Distribution"));
        assert!(!html.contains("Average Rating by Category"));
        // a single numeric column still yields a one-cell heatmap
        assert!(html.contains("Correlation Heatmap</h2>"));
    }

    #[test]
    fn test_categorical_summary() {
        let html = render(&dashboard("name,kind\nA,x\nB,x\n"));
        assert!(html.contains("<b>unique</b>"));
        assert!(html.contains("<b>top</b>"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_numeric_summary_layout() {
        let html = render(&dashboard("rating\n4.0\n2.0\n"));
        assert!(html.contains("<td><b>mean</b></td><td>3.00</td>"));
        assert!(html.contains("<td><b>25%</b></td><td>2.50</td>"));
    }

    #[test]
    fn test_chart_titles_follow_top_n() {
        let config = DashboardConfig {
            top_n: 3,
            ..DashboardConfig::default()
        };
        let dashboard =
            pipeline::run(CATALOG.as_bytes(), &CategoryFilter::default(), &config).unwrap();
        let html = render(&dashboard);

        assert!(html.contains("Top 3 Categories by Product Count"));
        assert!(html.contains("Top 3 Categories by Average Rating"));
        assert!(!html.contains("Top 10"));
    }

    #[test]
    fn test_cell_from_value() {
        assert_eq!(Cell::from(&ColumnValue::Null), Cell::Missing);
        assert_eq!(Cell::from(&ColumnValue::Float64(2.5)), Cell::Text("2.5".to_string()));
    }

    #[test]
    fn test_index_page() {
        let page = index_page().unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(IDLE_PROMPT));
        assert!(page.contains("/api/dashboard"));
        assert!(page.contains("<select id=\"categories\" multiple"));
    }
}
