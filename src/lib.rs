/// catalogview - Exploratory dashboard for e-commerce catalog exports
///
/// Uploads a product catalog CSV, normalizes its price, discount and rating
/// fields, derives top and bottom category levels, and reports summary
/// statistics, category rankings and correlations as an HTML dashboard.

pub mod column;
pub mod table;
pub mod error;
pub mod clean;
pub mod category;
pub mod filter;
pub mod report;
pub mod config;
pub mod pipeline;
pub mod render;

pub use column::{Column, ColumnType, ColumnValue};
pub use table::{RowRef, Schema, Table};
pub use error::{Error, Result};
pub use clean::{normalize, Cleaned, FieldRule, NormalizeReport};
pub use category::derive_categories;
pub use filter::{category_choices, CategoryFilter, FilterView};
pub use report::{Report, SortOrder};
pub use config::{DashboardConfig, ServerConfig};
pub use pipeline::{Dashboard, Preview};

// HTTP server modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod messages;
#[cfg(feature = "server")]
pub mod server;
