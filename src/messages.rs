/// Request and response bodies for the dashboard HTTP API
use serde::{Deserialize, Serialize};

use crate::filter::CategoryFilter;

/// Sent by the page on every interaction: the uploaded file's text and the
/// current multi-select state.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardRequest {
    pub csv: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl DashboardRequest {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::new(self.categories.iter().cloned())
    }
}

/// Rendered dashboard plus the state the page needs to redraw its controls
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    /// Distinct bottom categories of the unfiltered upload
    pub choices: Vec<String>,
    pub selected: Vec<String>,
    /// Rows left after filtering
    pub rows: usize,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_no_selection() {
        let req: DashboardRequest = serde_json::from_str(r#"{"csv": "a,b\n1,2\n"}"#).unwrap();
        assert_eq!(req.csv, "a,b\n1,2\n");
        assert!(req.categories.is_empty());
        assert!(req.filter().is_empty());
    }

    #[test]
    fn test_request_with_categories() {
        let req: DashboardRequest =
            serde_json::from_str(r#"{"csv": "", "categories": ["Pens", "Kettles", "Pens"]}"#).unwrap();
        let filter = req.filter();
        assert_eq!(filter.selected().collect::<Vec<_>>(), vec!["Kettles", "Pens"]);
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse {
            error: "no header row".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "error": "no header row" }));
    }
}
