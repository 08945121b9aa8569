//! ASCII plotting for terminal output.
//!
//! Fixed-size grid with deterministic output (helpful for golden tests).
//!
//! Plot elements:
//! - observations: `o`, joined by a `-` line
//! - the observation with the largest kurtosis contribution: `K`

use crate::analysis::AnalysisReport;

/// Render the differenced series of an analysis report with its labels.
pub fn render_report_plot(report: &AnalysisReport, width: usize, height: usize) -> String {
    let values: Vec<f64> = report.differenced.iter().map(|o| o.value).collect();
    let mut out = render_series_plot(&values, Some(report.kurtosis.max_index), width, height);

    out.push_str(&format!("{} ({}), first difference\n", report.metadata.title, report.metadata.id));
    if let (Some(first), Some(last)) = (report.differenced.first(), report.differenced.last()) {
        out.push_str(&format!("Time 0: {}    Time n: {}\n", first.date, last.date));
    }
    out.push_str(&format!(
        "Unit root: {} (ADF p = {:.4})\n",
        if report.adf.reject_null { "no" } else { "yes" },
        report.adf.p_value
    ));
    if let Some(k) = report.kurtosis_observation() {
        out.push_str(&format!(
            "K: {:.1}% of kurtosis from {} ({})\n",
            report.kurtosis.max_share_pct,
            k.date,
            k.season.display_name()
        ));
    }
    out
}

/// Render `values` against their index, optionally marking one index with `K`.
pub fn render_series_plot(values: &[f64], highlight: Option<usize>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let x_max = values.len().saturating_sub(1).max(1) as f64;

    let (y_min, y_max) = y_range(values).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (map_x(i as f64, x_max, width), map_y(v, y_min, y_max, height)))
        .collect();

    // Line first so the points overlay it.
    for w in cells.windows(2) {
        draw_line(&mut grid, w[0], w[1], '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }
    if let Some((i, v)) = highlight.and_then(|i| values.get(i).map(|&v| (i, v))) {
        if v.is_finite() {
            grid[map_y(v, y_min, y_max, height)][map_x(i as f64, x_max, width)] = 'K';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: obs=[0, {}] | y=[{y_min:.2}, {y_max:.2}]\n",
        values.len().saturating_sub(1)
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        // Flat series: centre it.
        Some((min_y - 1.0, min_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && x0 >= 0 {
            if let Some(cell) = grid.get_mut(y0 as usize).and_then(|row| row.get_mut(x0 as usize)) {
                if *cell == ' ' {
                    *cell = ch;
                }
            }
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
