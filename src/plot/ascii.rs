//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid, log10 diameter on x),
//! optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - distribution: `-` line
//! - reference void ratio: `=` row (drawn under the line)

use crate::domain::{Cpd, LogBase, Psd};

/// Render the CPD and the PSD of a run, one plot above the other.
pub fn render_distribution_plot(
    cpd: &Cpd,
    psd: &Psd,
    reference: Option<f64>,
    log_base: LogBase,
    width: usize,
    height: usize,
) -> String {
    let cpd_label = if cpd.reversed { "CPD (reversed), e" } else { "CPD, e" };
    let mut out = render_ascii_plot(cpd_label, &cpd.points(), reference, width, height);
    out.push('\n');
    out.push_str(&render_ascii_plot(log_base.label(), &psd.points(), None, width, height));
    out
}

/// Render one `(d, e)` curve with an optional horizontal reference.
pub fn render_ascii_plot(
    label: &str,
    points: &[(f64, f64)],
    reference: Option<f64>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let logged: Vec<(f64, f64)> = points
        .iter()
        .filter(|(d, e)| *d > 0.0 && d.is_finite() && e.is_finite())
        .map(|&(d, e)| (d.log10(), e))
        .collect();

    let (x_min, x_max) = x_range(&logged).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&logged, reference).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_curve(&mut grid, &logged, x_min, x_max, y_min, y_max);

    if let Some(r) = reference.filter(|r| r.is_finite()) {
        let row = map_y(r, y_min, y_max, height);
        for cell in grid[row].iter_mut().filter(|c| **c == ' ') {
            *cell = '=';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{label}: d=[{:.4}, {:.4}] um (log x) | e=[{y_min:.3}, {y_max:.3}]\n",
        10f64.powf(x_min),
        10f64.powf(x_max),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(points: &[(f64, f64)], reference: Option<f64>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if let Some(r) = reference.filter(|r| r.is_finite()) {
        min_y = min_y.min(r);
        max_y = max_y.max(r);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
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

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
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

    const POINTS: [(f64, f64); 3] = [(1.0, 0.0), (10.0, 0.5), (100.0, 1.0)];

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_ascii_plot("CPD", &POINTS, None, 10, 5);
        let expected = concat!(
            "CPD: d=[1.0000, 100.0000] um (log x) | e=[-0.050, 1.050]\n",
            "        --\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "--        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn reference_row_fills_blanks_only() {
        let txt = render_ascii_plot("CPD", &POINTS, Some(0.5), 10, 5);
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows[3], "====--====");
        assert_eq!(rows[1], "        --");
    }

    #[test]
    fn reference_outside_the_curve_widens_the_range() {
        let txt = render_ascii_plot("CPD", &POINTS, Some(2.0), 10, 5);
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows[1], "==========");
        assert!(rows[0].ends_with("e=[-0.100, 2.100]"));
    }

    #[test]
    fn stacked_plot_labels_psd_by_log_base() {
        let cpd = Cpd {
            d: vec![1.0, 10.0, 100.0],
            e: vec![0.0, 0.5, 1.0],
            reversed: false,
        };
        let psd = Psd {
            d: vec![3.0, 30.0],
            e: vec![0.5, 0.5],
        };
        let txt = render_distribution_plot(&cpd, &psd, None, LogBase::Natural, 20, 6);
        assert!(txt.starts_with("CPD, e: "));
        assert!(txt.contains(&format!("\n\n{}: ", LogBase::Natural.label())));
        assert_eq!(txt.lines().count(), 2 * 7 + 1);
    }
}
