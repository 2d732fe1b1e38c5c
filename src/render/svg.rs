/// Inline SVG charts.
///
/// Charts are self-contained `<svg>` elements sized with a viewBox so the
/// page can scale them. Category labels are escaped.
use askama_escape::{escape, Html};

use super::format_stat;

pub const BLUE: &str = "#1f77b4";
pub const ORANGE: &str = "#ff7f0e";
pub const AMBER: &str = "#ffa500";
const MISSING_CELL: &str = "#c8c8c8";
const TEXT: &str = "#222222";

const VIRIDIS: [(u8, u8, u8); 10] = [
    (0x44, 0x01, 0x54),
    (0x48, 0x28, 0x78),
    (0x3e, 0x49, 0x89),
    (0x31, 0x68, 0x8e),
    (0x26, 0x82, 0x8e),
    (0x1f, 0x9e, 0x89),
    (0x35, 0xb7, 0x79),
    (0x6e, 0xce, 0x58),
    (0xb5, 0xde, 0x2b),
    (0xfd, 0xe7, 0x25),
];

const COOLWARM: [(u8, u8, u8); 5] = [
    (0x3b, 0x4c, 0xc0),
    (0x7b, 0x9f, 0xf9),
    (0xdd, 0xdd, 0xdd),
    (0xf4, 0x9a, 0x7b),
    (0xb4, 0x04, 0x26),
];

/// Linear interpolation through evenly spaced color stops, `t` in [0, 1].
fn interpolate(stops: &[(u8, u8, u8)], t: f64) -> String {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (stops.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(stops.len() - 1);
    let frac = scaled - lo as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = stops[lo];
    let (r1, g1, b1) = stops[hi];
    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

pub fn viridis(t: f64) -> String {
    interpolate(&VIRIDIS, t)
}

/// Diverging palette over correlation values in [-1, 1].
pub fn coolwarm(value: f64) -> String {
    interpolate(&COOLWARM, (value + 1.0) / 2.0)
}

/// Round the axis maximum up to 1, 2 or 5 times a power of ten.
fn nice_max(max: f64) -> f64 {
    if !(max > 0.0) || !max.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let normalized = max / magnitude;
    let step = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

fn compact(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn open_svg(width: u32, height: u32, title: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif" font-size="12"><text x="{cx}" y="22" text-anchor="middle" font-size="15" font-weight="bold" fill="{TEXT}">{title}</text>"#,
        w = width,
        h = height,
        cx = width / 2,
        title = escape(title, Html),
    )
}

/// Horizontal bars, one per label, colored along the viridis palette.
pub fn horizontal_bar_chart(title: &str, labels: &[String], values: &[f64]) -> String {
    const WIDTH: u32 = 720;
    const LEFT: f64 = 200.0;
    const RIGHT: f64 = 60.0;
    const TOP: f64 = 40.0;
    const BAR: f64 = 26.0;
    const GAP: f64 = 8.0;

    let n = labels.len().min(values.len());
    let height = (TOP + n as f64 * (BAR + GAP) + 30.0) as u32;
    let plot_width = WIDTH as f64 - LEFT - RIGHT;
    let max = nice_max(values.iter().copied().fold(0.0, f64::max));

    let mut svg = open_svg(WIDTH, height, title);
    for i in 0..n {
        let y = TOP + i as f64 * (BAR + GAP);
        let w = (values[i].max(0.0) / max) * plot_width;
        let color = viridis(if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 });
        svg.push_str(&format!(
            r#"<text x="{lx}" y="{ty}" text-anchor="end" fill="{TEXT}">{label}</text><rect x="{LEFT}" y="{y}" width="{w:.1}" height="{BAR}" fill="{color}"/><text x="{vx:.1}" y="{ty}" fill="{TEXT}">{value}</text>"#,
            lx = LEFT - 8.0,
            ty = y + BAR / 2.0 + 4.0,
            label = escape(&labels[i], Html),
            vx = LEFT + w + 6.0,
            value = compact(values[i]),
        ));
    }
    svg.push_str(&format!(
        r#"<line x1="{LEFT}" y1="{TOP}" x2="{LEFT}" y2="{y2}" stroke="{TEXT}"/></svg>"#,
        y2 = TOP + n as f64 * (BAR + GAP),
    ));
    svg
}

/// One series of a vertical bar chart
pub struct Series<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub values: Vec<Option<f64>>,
}

/// Vertical bars grouped per category, one bar per series. Undefined
/// values leave a gap.
pub fn grouped_bar_chart(title: &str, categories: &[String], series: &[Series<'_>]) -> String {
    const WIDTH: u32 = 760;
    const HEIGHT: u32 = 420;
    const LEFT: f64 = 70.0;
    const RIGHT: f64 = 20.0;
    const TOP: f64 = 60.0;
    const BOTTOM: f64 = 130.0;
    const TICKS: usize = 5;

    let plot_width = WIDTH as f64 - LEFT - RIGHT;
    let plot_height = HEIGHT as f64 - TOP - BOTTOM;
    let baseline = TOP + plot_height;
    let max = nice_max(
        series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .fold(0.0, f64::max),
    );

    let mut svg = open_svg(WIDTH, HEIGHT, title);

    for t in 0..=TICKS {
        let value = max * t as f64 / TICKS as f64;
        let y = baseline - plot_height * t as f64 / TICKS as f64;
        svg.push_str(&format!(
            r##"<line x1="{LEFT}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="#e0e0e0"/><text x="{tx}" y="{ty:.1}" text-anchor="end" fill="{TEXT}">{label}</text>"##,
            x2 = LEFT + plot_width,
            tx = LEFT - 6.0,
            ty = y + 4.0,
            label = compact(value),
        ));
    }

    // legend
    for (k, s) in series.iter().enumerate() {
        let x = LEFT + k as f64 * 170.0;
        svg.push_str(&format!(
            r#"<rect x="{x}" y="34" width="12" height="12" fill="{color}"/><text x="{tx}" y="45" fill="{TEXT}">{name}</text>"#,
            color = s.color,
            tx = x + 18.0,
            name = escape(s.name, Html),
        ));
    }

    let n = categories.len();
    if n > 0 && !series.is_empty() {
        let slot = plot_width / n as f64;
        let bar = slot * 0.8 / series.len() as f64;
        for (i, category) in categories.iter().enumerate() {
            let slot_x = LEFT + i as f64 * slot;
            for (k, s) in series.iter().enumerate() {
                let Some(value) = s.values.get(i).copied().flatten() else {
                    continue;
                };
                let h = (value.max(0.0) / max) * plot_height;
                svg.push_str(&format!(
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{bar:.1}" height="{h:.1}" fill="{color}"><title>{name}: {v}</title></rect>"#,
                    x = slot_x + slot * 0.1 + k as f64 * bar,
                    y = baseline - h,
                    color = s.color,
                    name = escape(s.name, Html),
                    v = format_stat(Some(value)),
                ));
            }
            let lx = slot_x + slot / 2.0;
            svg.push_str(&format!(
                r#"<text x="{lx:.1}" y="{ly}" text-anchor="end" transform="rotate(-45 {lx:.1} {ly})" fill="{TEXT}">{label}</text>"#,
                ly = baseline + 14.0,
                label = escape(category, Html),
            ));
        }
    }

    svg.push_str(&format!(
        r#"<line x1="{LEFT}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="{TEXT}"/></svg>"#,
        x2 = LEFT + plot_width,
    ));
    svg
}

/// Single-series vertical bar chart.
pub fn bar_chart(title: &str, labels: &[String], values: &[Option<f64>], color: &str) -> String {
    let series = [Series {
        name: title,
        color,
        values: values.to_vec(),
    }];
    grouped_bar_chart(title, labels, &series)
}

/// Annotated correlation heatmap. Undefined cells are grey and read `nan`.
pub fn heatmap(title: &str, labels: &[String], values: &[Vec<Option<f64>>]) -> String {
    const CELL: f64 = 90.0;
    const LEFT: f64 = 160.0;
    const TOP: f64 = 40.0;
    const BOTTOM: f64 = 140.0;
    const LEGEND: f64 = 70.0;

    let n = labels.len();
    let width = (LEFT + n as f64 * CELL + LEGEND) as u32;
    let height = (TOP + n as f64 * CELL + BOTTOM) as u32;
    let mut svg = open_svg(width, height, title);

    for (i, row_label) in labels.iter().enumerate() {
        let y = TOP + i as f64 * CELL;
        svg.push_str(&format!(
            r#"<text x="{lx}" y="{ty}" text-anchor="end" fill="{TEXT}">{label}</text>"#,
            lx = LEFT - 8.0,
            ty = y + CELL / 2.0 + 4.0,
            label = escape(row_label, Html),
        ));

        for j in 0..n {
            let x = LEFT + j as f64 * CELL;
            let value = values.get(i).and_then(|r| r.get(j)).copied().flatten();
            let (fill, annotation, ink) = match value {
                Some(v) => (
                    coolwarm(v),
                    format!("{:.2}", v),
                    if v.abs() > 0.6 { "#ffffff" } else { TEXT },
                ),
                None => (MISSING_CELL.to_string(), "nan".to_string(), TEXT),
            };
            svg.push_str(&format!(
                r##"<rect x="{x}" y="{y}" width="{CELL}" height="{CELL}" fill="{fill}" stroke="#ffffff"/><text x="{cx}" y="{cy}" text-anchor="middle" fill="{ink}">{annotation}</text>"##,
                cx = x + CELL / 2.0,
                cy = y + CELL / 2.0 + 4.0,
            ));
        }
    }

    let label_y = TOP + n as f64 * CELL + 12.0;
    for (j, col_label) in labels.iter().enumerate() {
        let lx = LEFT + j as f64 * CELL + CELL / 2.0;
        svg.push_str(&format!(
            r#"<text x="{lx}" y="{label_y}" text-anchor="end" transform="rotate(-45 {lx} {label_y})" fill="{TEXT}">{label}</text>"#,
            label = escape(col_label, Html),
        ));
    }

    // color scale from +1 (top) to -1 (bottom)
    let bar_x = LEFT + n as f64 * CELL + 20.0;
    let bar_h = (n as f64 * CELL).max(CELL);
    const STEPS: usize = 20;
    for s in 0..STEPS {
        let v = 1.0 - 2.0 * s as f64 / (STEPS - 1) as f64;
        svg.push_str(&format!(
            r#"<rect x="{bar_x}" y="{y:.1}" width="14" height="{h:.1}" fill="{fill}"/>"#,
            y = TOP + bar_h * s as f64 / STEPS as f64,
            h = bar_h / STEPS as f64 + 0.5,
            fill = coolwarm(v),
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{tx}" y="{t1}" fill="{TEXT}">1</text><text x="{tx}" y="{t2}" fill="{TEXT}">-1</text></svg>"#,
        tx = bar_x + 18.0,
        t1 = TOP + 10.0,
        t2 = TOP + bar_h,
    ));
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes() {
        assert_eq!(viridis(0.0), "#440154");
        assert_eq!(viridis(1.0), "#fde725");
        assert_eq!(coolwarm(-1.0), "#3b4cc0");
        assert_eq!(coolwarm(0.0), "#dddddd");
        assert_eq!(coolwarm(1.0), "#b40426");
        assert_eq!(coolwarm(5.0), "#b40426");
    }

    #[test]
    fn test_nice_max() {
        assert_eq!(nice_max(0.0), 1.0);
        assert_eq!(nice_max(7.0), 10.0);
        assert_eq!(nice_max(4.5), 5.0);
        assert_eq!(nice_max(18999.0), 20000.0);
        assert_eq!(nice_max(100.0), 100.0);
    }

    #[test]
    fn test_horizontal_bar_chart() {
        let labels = vec!["USBCables".to_string(), "Home&Kitchen".to_string()];
        let svg = horizontal_bar_chart("Top 2 Categories by Product Count", &labels, &[233.0, 12.0]);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Home&amp;Kitchen"));
        assert!(svg.contains(">233<"));
        assert!(svg.contains("#440154"));
    }

    #[test]
    fn test_grouped_bar_chart_skips_missing() {
        let categories = vec!["A".to_string(), "B".to_string()];
        let series = [
            Series { name: "actual_price", color: BLUE, values: vec![Some(10.0), None] },
            Series { name: "discounted_price", color: ORANGE, values: vec![Some(8.0), Some(3.0)] },
        ];
        let svg = grouped_bar_chart("Average Prices by Category", &categories, &series);

        // two legend swatches plus three bars
        assert_eq!(svg.matches("<rect").count(), 5);
        assert!(svg.contains("<title>actual_price: 10.00</title>"));
    }

    #[test]
    fn test_bar_chart_empty() {
        let svg = bar_chart("Top 10 Categories by Average Rating", &[], &[], AMBER);
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let labels = vec!["Kid's <Toys>".to_string()];
        let svg = bar_chart("Ratings \"A&B\"", &labels, &[Some(4.0)], AMBER);

        assert!(svg.contains(">Kid&#x27;s &lt;Toys&gt;<"));
        assert!(svg.contains("Ratings &quot;A&amp;B&quot;"));
        assert!(!svg.contains("<Toys>"));
    }

    #[test]
    fn test_heatmap() {
        let labels = vec!["rating".to_string(), "rating_count".to_string()];
        let values = vec![vec![Some(1.0), None], vec![None, Some(1.0)]];
        let svg = heatmap("Correlation Heatmap", &labels, &values);

        assert!(svg.contains(">1.00<"));
        assert!(svg.contains(">nan<"));
        assert!(svg.contains(MISSING_CELL));
    }
}
