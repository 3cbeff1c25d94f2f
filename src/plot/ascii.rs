//! ASCII line charts over dates for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden-testable).
//! Each series is drawn as a line of its own glyph; where series overlap the
//! one listed first wins.

use chrono::NaiveDate;

/// One named line on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub glyph: char,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, glyph: char, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            label: label.into(),
            glyph,
            points,
        }
    }
}

/// Axis titles and grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub width: usize,
    pub height: usize,
}

/// Render `series` as a line chart. Non-finite values are skipped.
pub fn render_line_chart(layout: &ChartLayout<'_>, series: &[Series]) -> String {
    let width = layout.width.max(10);
    let height = layout.height.max(5);

    let mut out = String::new();
    out.push_str(layout.title);
    out.push('\n');

    let Some((d_min, d_max)) = date_range(series) else {
        out.push_str("(no data)\n");
        return out;
    };
    let (x_min, x_max) = (ordinal(d_min), ordinal(d_max));
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 1.0, x_max + 1.0)
    };
    let (y_min, y_max) = y_range(series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for s in series {
        let cells: Vec<(usize, usize)> = s
            .points
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|&(d, v)| {
                (
                    map_x(ordinal(d), x_min, x_max, width),
                    map_y(v, y_min, y_max, height),
                )
            })
            .collect();
        draw_polyline(&mut grid, &cells, s.glyph);
    }

    out.push_str(&format!(
        "x: {} [{d_min} .. {d_max}] | y: {} [{y_min:.2}, {y_max:.2}]\n",
        layout.x_label, layout.y_label
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    let legend: Vec<String> = series.iter().map(|s| format!("{} {}", s.glyph, s.label)).collect();
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));
    out
}

fn ordinal(d: NaiveDate) -> f64 {
    f64::from(chrono::Datelike::num_days_from_ce(&d))
}

fn date_range(series: &[Series]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|(_, v)| v.is_finite())
        .map(|&(d, _)| d);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

fn y_range(series: &[Series]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, v) in series.iter().flat_map(|s| s.points.iter()) {
        if v.is_finite() {
            min_y = min_y.min(v);
            max_y = max_y.max(v);
        }
    }
    (min_y.is_finite() && max_y.is_finite()).then_some((min_y, max_y))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { min.abs().max(1.0) * frac };
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], cells: &[(usize, usize)], ch: char) {
    let mut prev: Option<(usize, usize)> = None;
    for &(x, y) in cells {
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, y, ch),
            None => draw_line(grid, x, y, x, y, ch),
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
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
