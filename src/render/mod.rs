/// Presentation: askama page templates and inline SVG charts for a `Dashboard`.
pub mod html;
pub mod svg;

pub use html::{index_page, render_dashboard, DashboardTemplate, IndexTemplate};

/// Two-decimal rendering of a statistic; undefined values read `NaN`.
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        Some(v) => v.to_string(),
        None => "NaN".to_string(),
    }
}
