//! Fixed-size ASCII chart of steps per hour.
//!
//! Output is deterministic for a given table and size. Plot elements:
//! - hours with an entered value: `o`
//! - filled hours: `*`
//! - the piecewise-linear step curve: `-`

use crate::domain::{HourRow, RunFile};

/// Render the steps-per-hour chart for a dense table.
pub fn render_ascii_plot(rows: &[HourRow], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64, bool)> = rows
        .iter()
        .map(|r| (f64::from(r.hour.0), r.steps, r.interpolated))
        .collect();

    let (t_min, t_max) = x_range(&points).unwrap_or((0.0, 23.0));
    let (y_min, y_max) = y_range(&points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so markers can overlay).
    let mut prev = None;
    for &(t, y, _) in &points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, yy, '-'),
            None => grid[yy][x] = '-',
        }
        prev = Some((x, yy));
    }

    for &(t, y, interpolated) in &points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        grid[yy][x] = if interpolated { '*' } else { 'o' };
    }

    let label = |r: Option<&HourRow>| r.map(|r| r.label.clone()).unwrap_or_else(|| "-".to_string());
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: hours=[{}, {}] | steps=[{y_min:.0}, {y_max:.0}]\n",
        label(rows.first()),
        label(rows.last()),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Render a plot from a saved run JSON file.
pub fn render_ascii_plot_from_run_file(run: &RunFile, width: usize, height: usize) -> String {
    render_ascii_plot(&run.hours, width, height)
}

fn x_range(points: &[(f64, f64, bool)]) -> Option<(f64, f64)> {
    let min_t = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_t = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if !(min_t.is_finite() && max_t.is_finite()) {
        return None;
    }
    if max_t > min_t {
        Some((min_t, max_t))
    } else {
        Some((min_t - 0.5, max_t + 0.5))
    }
}

fn y_range(points: &[(f64, f64, bool)]) -> Option<(f64, f64)> {
    let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: centre it.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
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

/// Bresenham line between two grid cells; only blank cells are overwritten.
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
    use crate::domain::TimeKey;

    fn row(hour: i32, steps: f64, interpolated: bool) -> HourRow {
        HourRow {
            hour: TimeKey(hour),
            label: TimeKey(hour).to_string(),
            steps,
            calories: steps * 0.04,
            interpolated,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let rows = vec![
            row(6, 500.0, false),
            row(7, 825.0, true),
            row(8, 1150.0, true),
            row(9, 1475.0, true),
            row(10, 1800.0, false),
        ];

        let txt = render_ascii_plot(&rows, 10, 5);
        let expected = concat!(
            "Plot: hours=[06:00, 10:00] | steps=[435, 1865]\n",
            "        -o\n",
            "      -*  \n",
            "    -*    \n",
            " -*-      \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_series_does_not_panic() {
        let rows = vec![row(9, 1200.0, false)];
        let txt = render_ascii_plot(&rows, 10, 5);
        assert!(txt.starts_with("Plot: hours=[09:00, 09:00]"));
        let markers: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(markers, 1);
    }

    #[test]
    fn empty_rows_render_blank_grid() {
        let txt = render_ascii_plot(&[], 10, 5);
        assert_eq!(txt.lines().count(), 6);
    }
}
