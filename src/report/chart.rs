//! Inline SVG rendering for line and bar charts.

use super::page::{format_value, Chart, ChartKind};

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 64.0;
const Y_TICKS: usize = 4;
const BAR_COLOR: &str = "#4c78a8";
const LINE_COLOR: &str = "#f58518";

/// Figure size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
        }
    }
}

/// Plot area inside the margins.
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(style: &ChartStyle) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (style.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (style.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Pixel y for a data value on a `[0, y_max]` axis.
    fn y(&self, value: f64, y_max: f64) -> f64 {
        self.bottom() - (value / y_max) * self.height
    }
}

/// Render a chart as a standalone `<svg>` element.
pub fn render_svg(chart: &Chart, style: &ChartStyle) -> String {
    let area = PlotArea::new(style);
    let y_max = axis_max(chart);
    let rotate_labels = chart.points.len() > 8;

    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart chart-{kind}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">"#,
        kind = kind_name(chart.kind),
        w = style.width,
        h = style.height,
        title = escape_xml(&chart.title),
    ));
    out.push('\n');

    draw_y_axis(&mut out, &area, y_max);

    match chart.kind {
        ChartKind::Bar => draw_bars(&mut out, chart, &area, y_max, rotate_labels),
        ChartKind::Line => draw_line(&mut out, chart, &area, y_max, rotate_labels),
    }

    // Axes
    out.push_str(&format!(
        r##"<line x1="{l:.2}" y1="{b:.2}" x2="{r:.2}" y2="{b:.2}" stroke="#333" />"##,
        l = area.left,
        r = area.right(),
        b = area.bottom(),
    ));
    out.push('\n');
    out.push_str(&format!(
        r##"<line x1="{l:.2}" y1="{t:.2}" x2="{l:.2}" y2="{b:.2}" stroke="#333" />"##,
        l = area.left,
        t = area.top,
        b = area.bottom(),
    ));
    out.push('\n');

    // Axis titles
    out.push_str(&format!(
        r#"<text class="axis-title" x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="12">{label}</text>"#,
        x = area.left + area.width / 2.0,
        y = style.height - 8.0,
        label = escape_xml(&chart.x_label),
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<text class="axis-title" x="14" y="{y:.2}" text-anchor="middle" font-size="12" transform="rotate(-90,14,{y:.2})">{label}</text>"#,
        y = area.top + area.height / 2.0,
        label = escape_xml(&chart.y_label),
    ));
    out.push('\n');

    out.push_str("</svg>\n");
    out
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
    }
}

/// Top of the value axis; never zero so scaling stays finite.
fn axis_max(chart: &Chart) -> f64 {
    let max = chart.points.iter().map(|p| p.value).fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

fn draw_y_axis(out: &mut String, area: &PlotArea, y_max: f64) {
    for i in 0..=Y_TICKS {
        let value = y_max * i as f64 / Y_TICKS as f64;
        let y = area.y(value, y_max);
        out.push_str(&format!(
            r##"<line class="grid" x1="{l:.2}" y1="{y:.2}" x2="{r:.2}" y2="{y:.2}" stroke="#ddd" />"##,
            l = area.left,
            r = area.right(),
        ));
        out.push('\n');
        out.push_str(&format!(
            r#"<text class="tick" x="{x:.2}" y="{ty:.2}" text-anchor="end" font-size="11">{label}</text>"#,
            x = area.left - 6.0,
            ty = y + 4.0,
            label = format_value(value),
        ));
        out.push('\n');
    }
}

fn draw_category_label(out: &mut String, x: f64, area: &PlotArea, label: &str, rotate: bool) {
    let y = area.bottom() + 16.0;
    if rotate {
        out.push_str(&format!(
            r#"<text class="category" x="{x:.2}" y="{y:.2}" text-anchor="end" font-size="11" transform="rotate(-35,{x:.2},{y:.2})">{label}</text>"#,
            label = escape_xml(label),
        ));
    } else {
        out.push_str(&format!(
            r#"<text class="category" x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="11">{label}</text>"#,
            label = escape_xml(label),
        ));
    }
    out.push('\n');
}

fn draw_bars(out: &mut String, chart: &Chart, area: &PlotArea, y_max: f64, rotate: bool) {
    let slot = area.width / chart.points.len().max(1) as f64;
    let bar_width = slot * 0.7;

    for (i, point) in chart.points.iter().enumerate() {
        let x = area.left + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = area.y(point.value, y_max);
        out.push_str(&format!(
            r#"<rect class="bar" x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}"><title>{label}: {value}</title></rect>"#,
            w = bar_width,
            h = area.bottom() - y,
            color = BAR_COLOR,
            label = escape_xml(&point.label),
            value = format_value(point.value),
        ));
        out.push('\n');
        draw_category_label(out, x + bar_width / 2.0, area, &point.label, rotate);
    }
}

fn draw_line(out: &mut String, chart: &Chart, area: &PlotArea, y_max: f64, rotate: bool) {
    let n = chart.points.len();
    let x_at = |i: usize| {
        if n <= 1 {
            area.left + area.width / 2.0
        } else {
            area.left + area.width * i as f64 / (n - 1) as f64
        }
    };

    let coords: Vec<String> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.2},{:.2}", x_at(i), area.y(p.value, y_max)))
        .collect();
    out.push_str(&format!(
        r#"<polyline class="line" points="{points}" fill="none" stroke="{color}" stroke-width="2" />"#,
        points = coords.join(" "),
        color = LINE_COLOR,
    ));
    out.push('\n');

    for (i, point) in chart.points.iter().enumerate() {
        let x = x_at(i);
        out.push_str(&format!(
            r#"<circle class="point" cx="{x:.2}" cy="{y:.2}" r="3.5" fill="{color}"><title>{label}: {value}</title></circle>"#,
            y = area.y(point.value, y_max),
            color = LINE_COLOR,
            label = escape_xml(&point.label),
            value = format_value(point.value),
        ));
        out.push('\n');
        draw_category_label(out, x, area, &point.label, rotate);
    }
}

/// Escape text for XML/HTML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::page::ChartPoint;

    fn chart(kind: ChartKind, points: &[(&str, f64)]) -> Chart {
        Chart {
            kind,
            title: "Sales by prefecture".to_string(),
            x_label: "prefecture".to_string(),
            y_label: "sales".to_string(),
            points: points
                .iter()
                .map(|(label, value)| ChartPoint {
                    label: label.to_string(),
                    value: *value,
                })
                .collect(),
            total: points.iter().map(|(_, v)| v).sum(),
        }
    }

    #[test]
    fn test_bar_chart_has_one_rect_per_point() {
        let svg = render_svg(
            &chart(ChartKind::Bar, &[("Kanagawa", 250.0), ("Tokyo", 300.0)]),
            &ChartStyle::default(),
        );
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches(r#"class="bar""#).count(), 2);
        assert!(svg.contains("Tokyo: 300"));
    }

    #[test]
    fn test_line_chart_points() {
        let svg = render_svg(
            &chart(
                ChartKind::Line,
                &[("2024-01-01", 200.0), ("2024-01-02", 245.0), ("2024-01-03", 240.0)],
            ),
            &ChartStyle::default(),
        );
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches(r#"class="point""#).count(), 3);
    }

    #[test]
    fn test_tallest_bar_fills_plot_height() {
        let style = ChartStyle {
            width: 200.0,
            height: 184.0,
        };
        let svg = render_svg(&chart(ChartKind::Bar, &[("Tokyo", 300.0)]), &style);
        // 184 - 20 - 64 = 100px plot height
        assert!(svg.contains(r#"height="100.00" fill="#));
    }

    #[test]
    fn test_all_zero_values_do_not_divide_by_zero() {
        let svg = render_svg(&chart(ChartKind::Bar, &[("Tokyo", 0.0)]), &ChartStyle::default());
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let svg = render_svg(
            &chart(ChartKind::Bar, &[("<Tokyo & Co>", 1.0)]),
            &ChartStyle::default(),
        );
        assert!(svg.contains("&lt;Tokyo &amp; Co&gt;"));
        assert!(!svg.contains("<Tokyo"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a<b>"c"&'d'"#), "a&lt;b&gt;&quot;c&quot;&amp;&#39;d&#39;");
    }
}
