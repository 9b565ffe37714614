//! Dashboard rendering.
//!
//! This module builds the page model and projects it to HTML,
//! Markdown, or JSON.

pub mod chart;
pub mod html;
pub mod markdown;
pub mod page;

pub use chart::ChartStyle;
pub use html::generate_html_report;
pub use markdown::generate_markdown_report;
pub use page::{format_value, render, Page, RenderOptions};

use anyhow::Result;

/// Generate a JSON view of the page.
pub fn generate_json_report(page: &Page) -> Result<String> {
    serde_json::to_string_pretty(page).map_err(Into::into)
}
