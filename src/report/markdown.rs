//! Markdown projection of a dashboard page.
//!
//! Charts become value tables with a proportional bar column, since
//! Markdown has no drawing primitives.

use super::page::{format_value, BannerLevel, Chart, ChartKind, Page, Section, Table};

const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(page: &Page) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", page.title));

    for section in &page.sections {
        match section {
            Section::Heading { text } => output.push_str(&format!("## {}\n\n", text)),
            Section::Banner(banner) => {
                let marker = match banner.level {
                    BannerLevel::Success => "✅",
                    BannerLevel::Info => "ℹ️",
                    BannerLevel::Warning => "⚠️",
                };
                output.push_str(&format!("> {} {}\n\n", marker, banner.message));
            }
            Section::Table(table) => output.push_str(&generate_table(table)),
            Section::Chart(chart) => output.push_str(&generate_chart_table(chart)),
            Section::Slider(slider) => output.push_str(&format!(
                "**{}:** {} (range {} – {}, step {})\n\n",
                slider.label,
                format_value(slider.value),
                format_value(slider.min),
                format_value(slider.max),
                format_value(slider.step),
            )),
            Section::NoData { message } => output.push_str(&format!("*{}*\n\n", message)),
        }
    }

    output.push_str("---\n\n");
    output.push_str(&format!("*{}*\n", page.footer));

    output
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Generate a table section.
fn generate_table(table: &Table) -> String {
    let mut section = String::new();

    let header: Vec<String> = table.columns.iter().map(|c| escape_cell(c)).collect();
    section.push_str(&format!("| {} |\n", header.join(" | ")));

    let value_col = table.columns.len().saturating_sub(1);
    let align: Vec<&str> = (0..table.columns.len())
        .map(|i| if i == value_col { "---:" } else { ":---" })
        .collect();
    section.push_str(&format!("|{}|\n", align.join("|")));

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        section.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    if table.rows.is_empty() {
        section.push_str("\n*(no rows)*\n");
    }
    section.push('\n');

    section
}

/// Generate a chart as a table with a text bar per category.
fn generate_chart_table(chart: &Chart) -> String {
    let mut section = String::new();

    let kind = match chart.kind {
        ChartKind::Line => "Line chart",
        ChartKind::Bar => "Bar chart",
    };
    section.push_str(&format!("*{}: {}*\n\n", kind, chart.title));

    section.push_str(&format!(
        "| {} | {} | |\n",
        escape_cell(&chart.x_label),
        escape_cell(&chart.y_label)
    ));
    section.push_str("|:---|---:|:---|\n");

    let max = chart.points.iter().map(|p| p.value).fold(0.0, f64::max);
    for point in &chart.points {
        let width = if max > 0.0 {
            ((point.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        section.push_str(&format!(
            "| {} | {} | `{}` |\n",
            escape_cell(&point.label),
            format_value(point.value),
            "█".repeat(width)
        ));
    }
    section.push_str(&format!("| **Total** | {} | |\n\n", format_value(chart.total)));

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::page::{Banner, ChartPoint};

    fn create_test_page() -> Page {
        Page {
            title: "Sales by prefecture".to_string(),
            sections: vec![
                Section::Banner(Banner {
                    level: BannerLevel::Info,
                    message: "No data file found; using sample data.".to_string(),
                }),
                Section::Heading {
                    text: "Dataset".to_string(),
                },
                Section::Table(Table {
                    columns: vec!["prefecture".to_string(), "sales".to_string()],
                    rows: vec![
                        vec!["Tokyo".to_string(), "300".to_string()],
                        vec!["Osaka".to_string(), "150".to_string()],
                    ],
                }),
                Section::Chart(Chart {
                    kind: ChartKind::Bar,
                    title: "sales by prefecture".to_string(),
                    x_label: "prefecture".to_string(),
                    y_label: "sales".to_string(),
                    points: vec![
                        ChartPoint {
                            label: "Osaka".to_string(),
                            value: 150.0,
                        },
                        ChartPoint {
                            label: "Tokyo".to_string(),
                            value: 300.0,
                        },
                    ],
                    total: 450.0,
                }),
            ],
            footer: "Source: fallback sample data".to_string(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_page());

        assert!(markdown.starts_with("# Sales by prefecture"));
        assert!(markdown.contains("## Dataset"));
        assert!(markdown.contains("> ℹ️ No data file found; using sample data."));
        assert!(markdown.contains("| prefecture | sales |"));
        assert!(markdown.contains("| Tokyo | 300 |"));
        assert!(markdown.contains("*Bar chart: sales by prefecture*"));
        assert!(markdown.contains("| **Total** | 450 | |"));
    }

    #[test]
    fn test_chart_bars_are_proportional() {
        let markdown = generate_markdown_report(&create_test_page());
        assert!(markdown.contains(&format!("| Tokyo | 300 | `{}` |", "█".repeat(30))));
        assert!(markdown.contains(&format!("| Osaka | 150 | `{}` |", "█".repeat(15))));
    }

    #[test]
    fn test_empty_table() {
        let section = generate_table(&Table {
            columns: vec!["prefecture".to_string(), "sales".to_string()],
            rows: vec![],
        });
        assert!(section.contains("*(no rows)*"));
    }
}
