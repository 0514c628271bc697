//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two chart kinds:
//! - multi-country line chart over calendar dates (one glyph per country)
//! - trend plot: markers `x` with the fitted polynomial drawn as `-`

use chrono::{Datelike, NaiveDate};

use crate::domain::CountryCode;
use crate::fit::TrendFit;

/// One line of a multi-series chart.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub glyph: char,
    /// Sorted by date.
    pub points: Vec<(NaiveDate, f64)>,
}

/// Glyph used for a country in multi-country charts.
pub fn country_glyph(country: CountryCode) -> char {
    match country {
        CountryCode::Ca => 'c',
        CountryCode::De => 'd',
        CountryCode::Fr => 'f',
        CountryCode::Uk => 'k',
        CountryCode::In => 'i',
        CountryCode::Us => 'u',
    }
}

/// Render several date series on one chart.
pub fn render_line_chart(title: &str, series: &[LineSeries], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all: Vec<(f64, f64)> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(d, y)| (day_number(d), y)))
        .collect();

    let (x_min, x_max) = x_range(&all).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(all.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for s in series {
        let pts: Vec<(f64, f64)> = s.points.iter().map(|&(d, y)| (day_number(d), y)).collect();
        draw_polyline(&mut grid, &pts, x_min, x_max, y_min, y_max, s.glyph);
    }

    let first = series.iter().filter_map(|s| s.points.first()).map(|p| p.0).min();
    let last = series.iter().filter_map(|s| s.points.last()).map(|p| p.0).max();
    let dates = match (first, last) {
        (Some(a), Some(b)) => format!("{a}..{b}"),
        _ => "-".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {title} | date=[{dates}] | y=[{}, {}]\n",
        fmt_axis(y_min),
        fmt_axis(y_max)
    ));
    push_grid(&mut out, grid);

    let legend: Vec<String> = series.iter().map(|s| format!("{}={}", s.glyph, s.label)).collect();
    out.push_str(&format!("Legend: {}\n", legend.join(" ")));
    out
}

/// Render a trend fit: smoothed (or raw) daily values plus the fitted curve.
pub fn render_trend_plot(trend: &TrendFit, width: usize, height: usize) -> String {
    let markers = trend.markers();
    let xs: Vec<(f64, f64)> = trend.points.iter().map(|p| (p.x, 0.0)).collect();
    let (x_min, x_max) = x_range(&xs).unwrap_or((0.0, 1.0));
    let curve = sample_curve(trend, x_min, x_max, width.max(2));

    let title = format!(
        "{} {} degree {}{}",
        trend.country,
        trend.metric,
        trend.fit.degree,
        if trend.smoothed { " (rolling mean)" } else { "" }
    );
    render_xy_plot(&title, &markers, Some(&curve), (x_min, x_max), width, height)
}

fn render_xy_plot(
    title: &str,
    markers: &[(f64, f64)],
    curve_points: Option<&[(f64, f64)]>,
    (x_min, x_max): (f64, f64),
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let ys = markers
        .iter()
        .chain(curve_points.unwrap_or(&[]))
        .map(|p| p.1);
    let (y_min, y_max) = y_range(ys).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so markers can overlay).
    if let Some(curve) = curve_points {
        draw_polyline(&mut grid, curve, x_min, x_max, y_min, y_max, '-');
    }

    for &(x, y) in markers {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'x';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {title} | x=[{x_min:.3}, {x_max:.3}] | y=[{}, {}]\n",
        fmt_axis(y_min),
        fmt_axis(y_max)
    ));
    push_grid(&mut out, grid);
    out
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn fmt_axis(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else if v.abs() >= 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.5}")
    }
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        Some((min_x - 1.0, max_x + 1.0))
    }
}

fn sample_curve(trend: &TrendFit, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, trend.fit.evaluate(x))
        })
        .filter(|(_, y)| y.is_finite())
        .collect()
}

fn y_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for y in values.filter(|y| y.is_finite()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        let pad = (min_y.abs() * 0.05).max(1e-9);
        Some((min_y - pad, max_y + pad))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else if grid[row][col] == ' ' {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;
    use crate::fit::{PolynomialFit, TrendPoint};

    #[test]
    fn plot_golden_snapshot_small() {
        let markers = [(1.0, 100.0), (10.0, 110.0)];
        let curve: Vec<(f64, f64)> = (0..10).map(|i| (1.0 + i as f64, 100.0)).collect();

        let txt = render_xy_plot("test", &markers, Some(&curve), (1.0, 10.0), 10, 5);
        let expected = concat!(
            "Plot: test | x=[1.000, 10.000] | y=[99.50, 110.50]\n",
            "         x\n",
            "          \n",
            "          \n",
            "          \n",
            "x---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn trend_plot_draws_fit_under_markers() {
        let d = |day| NaiveDate::from_ymd_opt(2018, 5, day).unwrap();
        let trend = TrendFit {
            country: CountryCode::Fr,
            metric: Metric::Views,
            smoothed: false,
            points: (0..4)
                .map(|i| TrendPoint {
                    x: i as f64,
                    date: d(i + 1),
                    value: Some(2.0 * i as f64),
                    smoothed: None,
                })
                .collect(),
            fit: PolynomialFit {
                degree: 1,
                coefficients: vec![2.0, 0.0],
                sse: 0.0,
                rmse: 0.0,
                n: 4,
            },
        };
        let txt = render_trend_plot(&trend, 20, 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("Plot: FR views degree 1 | x=[0.000, 3.000]"));
        assert_eq!(txt.matches('x').count() - lines[0].matches('x').count(), 4);
        assert!(txt.contains('-'));
    }

    #[test]
    fn line_chart_has_one_glyph_per_series_and_a_legend() {
        let d = |day| NaiveDate::from_ymd_opt(2018, 1, day).unwrap();
        let series = vec![
            LineSeries {
                label: "CA".to_string(),
                glyph: 'c',
                points: vec![(d(1), 1.0), (d(5), 5.0)],
            },
            LineSeries {
                label: "US".to_string(),
                glyph: 'u',
                points: vec![(d(3), 10.0)],
            },
        ];
        let txt = render_line_chart("Views", &series, 20, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Plot: Views | date=[2018-01-01..2018-01-05] | y=[0.55000, 10.45]");
        assert_eq!(lines[7], "Legend: c=CA u=US");
        let body: String = lines[1..7].concat();
        assert!(body.contains('c'));
        assert_eq!(body.matches('u').count(), 1);
    }
}
