//! HTML projection of a dashboard page.
//!
//! The slider is a plain GET form: moving it submits `?min_sales=...`
//! and the server answers with a freshly rendered page.

use super::chart::{escape_xml, render_svg, ChartStyle};
use super::page::{format_value, Banner, BannerLevel, Page, Section, SliderControl, Table};

const STYLESHEET: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
h1 { font-size: 1.8rem; }
h2 { font-size: 1.25rem; margin-top: 2rem; }
table { border-collapse: collapse; margin: 0.5rem 0; }
th, td { border: 1px solid #ccc; padding: 0.25rem 0.75rem; text-align: left; }
td.num { text-align: right; }
.banner { padding: 0.5rem 1rem; border-radius: 4px; margin: 0.5rem 0; }
.banner-success { background: #e6f4ea; color: #1e4620; }
.banner-info { background: #e8f0fe; color: #174ea6; }
.banner-warning { background: #fef7e0; color: #7a4f01; }
.no-data { font-style: italic; color: #7a4f01; }
footer { margin-top: 3rem; font-size: 0.8rem; color: #666; }
"#;

/// Render a full HTML document.
pub fn generate_html_report(page: &Page, style: &ChartStyle) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_xml(&page.title)));
    output.push_str(&format!("<style>{}</style>\n", STYLESHEET));
    output.push_str("</head>\n<body>\n");

    output.push_str(&format!("<h1>{}</h1>\n", escape_xml(&page.title)));

    for section in &page.sections {
        output.push_str(&generate_section(section, style));
    }

    output.push_str(&format!(
        "<footer>{}</footer>\n",
        escape_xml(&page.footer)
    ));
    output.push_str("</body>\n</html>\n");

    output
}

fn generate_section(section: &Section, style: &ChartStyle) -> String {
    match section {
        Section::Heading { text } => format!("<h2>{}</h2>\n", escape_xml(text)),
        Section::Banner(banner) => generate_banner(banner),
        Section::Table(table) => generate_table(table),
        Section::Chart(chart) => format!(
            "<figure>\n{}<figcaption>{}: total {}</figcaption>\n</figure>\n",
            render_svg(chart, style),
            escape_xml(&chart.title),
            format_value(chart.total)
        ),
        Section::Slider(slider) => generate_slider(slider),
        Section::NoData { message } => {
            format!("<p class=\"no-data\">{}</p>\n", escape_xml(message))
        }
    }
}

fn generate_banner(banner: &Banner) -> String {
    let level = match banner.level {
        BannerLevel::Success => "success",
        BannerLevel::Info => "info",
        BannerLevel::Warning => "warning",
    };
    format!(
        "<div class=\"banner banner-{}\" role=\"status\">{}</div>\n",
        level,
        escape_xml(&banner.message)
    )
}

fn generate_table(table: &Table) -> String {
    let mut section = String::new();
    let value_col = table.columns.len().saturating_sub(1);

    section.push_str("<table>\n<thead><tr>");
    for column in &table.columns {
        section.push_str(&format!("<th>{}</th>", escape_xml(column)));
    }
    section.push_str("</tr></thead>\n<tbody>\n");

    for row in &table.rows {
        section.push_str("<tr>");
        for (i, cell) in row.iter().enumerate() {
            if i == value_col {
                section.push_str(&format!("<td class=\"num\">{}</td>", escape_xml(cell)));
            } else {
                section.push_str(&format!("<td>{}</td>", escape_xml(cell)));
            }
        }
        section.push_str("</tr>\n");
    }

    section.push_str("</tbody>\n</table>\n");
    section.push_str(&format!("<p>{} rows</p>\n", table.rows.len()));
    section
}

fn generate_slider(slider: &SliderControl) -> String {
    let mut section = String::new();

    section.push_str("<form method=\"get\" action=\"\">\n");
    section.push_str(&format!(
        "<label for=\"{name}\">{label}: <output id=\"{name}-value\">{value}</output></label><br>\n",
        name = escape_xml(&slider.name),
        label = escape_xml(&slider.label),
        value = format_value(slider.value),
    ));
    section.push_str(&format!(
        "<input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" \
         oninput=\"document.getElementById('{name}-value').value = this.value\" onchange=\"this.form.submit()\">\n",
        name = escape_xml(&slider.name),
        min = slider.min,
        max = slider.max,
        step = slider.step,
        value = slider.value,
    ));
    section.push_str("<noscript><button type=\"submit\">Apply</button></noscript>\n");
    section.push_str("<button type=\"submit\" name=\"reset\" value=\"1\">Reset</button>\n");
    section.push_str("</form>\n");

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::page::{Chart, ChartKind, ChartPoint};

    fn page(sections: Vec<Section>) -> Page {
        Page {
            title: "Sales by prefecture".to_string(),
            sections,
            footer: "Source: fallback sample data".to_string(),
        }
    }

    #[test]
    fn test_generate_html_report() {
        let html = generate_html_report(
            &page(vec![
                Section::Heading {
                    text: "Dataset".to_string(),
                },
                Section::Table(Table {
                    columns: vec!["prefecture".to_string(), "sales".to_string()],
                    rows: vec![vec!["Tokyo".to_string(), "300".to_string()]],
                }),
                Section::Chart(Chart {
                    kind: ChartKind::Bar,
                    title: "sales by prefecture".to_string(),
                    x_label: "prefecture".to_string(),
                    y_label: "sales".to_string(),
                    points: vec![ChartPoint {
                        label: "Tokyo".to_string(),
                        value: 300.0,
                    }],
                    total: 300.0,
                }),
            ]),
            &ChartStyle::default(),
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Sales by prefecture</h1>"));
        assert!(html.contains("<h2>Dataset</h2>"));
        assert!(html.contains("<td class=\"num\">300</td>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("<figcaption>sales by prefecture: total 300</figcaption>"));
        assert!(html.contains("<footer>Source: fallback sample data</footer>"));
    }

    #[test]
    fn test_slider_markup() {
        let html = generate_slider(&SliderControl {
            name: "min_sales".to_string(),
            label: "Minimum sales".to_string(),
            min: 150.0,
            max: 300.0,
            step: 10.0,
            value: 250.0,
        });

        assert!(html.contains("type=\"range\""));
        assert!(html.contains("name=\"min_sales\""));
        assert!(html.contains("min=\"150\" max=\"300\" step=\"10\" value=\"250\""));
    }

    #[test]
    fn test_banner_and_no_data() {
        let html = generate_html_report(
            &page(vec![
                Section::Banner(Banner {
                    level: BannerLevel::Warning,
                    message: "No data: no rows have sales ≥ 400.".to_string(),
                }),
                Section::NoData {
                    message: "No data to chart for the current filter.".to_string(),
                },
            ]),
            &ChartStyle::default(),
        );

        assert!(html.contains("banner-warning"));
        assert!(html.contains("<p class=\"no-data\">No data to chart"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let html = generate_table(&Table {
            columns: vec!["prefecture".to_string(), "sales".to_string()],
            rows: vec![vec!["<script>".to_string(), "1".to_string()]],
        });
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
