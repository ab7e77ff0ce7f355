//! Log-diameter chart widget drawn with Plotters inside a Ratatui buffer.
//!
//! The widget plots `log10(d)` on a linear Plotters axis and labels ticks at
//! whole decades of diameter.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const CURVE: RGBColor = RGBColor(0, 255, 255);
const REFERENCE: RGBColor = RGBColor(255, 200, 0);
/// Dots per reference line.
const REFERENCE_DOTS: usize = 48;

/// `(d, e)` curve over a log diameter axis, with an optional horizontal
/// reference void ratio.
pub struct PoreChart {
    curve: Vec<(f64, f64)>,
    reference: Option<f64>,
    decades: [i32; 2],
    y_bounds: [f64; 2],
    y_label: String,
}

impl PoreChart {
    /// Skips points that cannot sit on a log axis.
    pub fn new(points: &[(f64, f64)], reference: Option<f64>, y_label: impl Into<String>) -> Self {
        let curve: Vec<(f64, f64)> = points
            .iter()
            .filter(|(d, e)| *d > 0.0 && d.is_finite() && e.is_finite())
            .map(|&(d, e)| (d.log10(), e))
            .collect();
        let reference = reference.filter(|r| r.is_finite());

        let lo = curve.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let hi = curve.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        // Whole decades, at least one wide.
        let decades = if lo.is_finite() && hi.is_finite() {
            let (a, b) = (lo.floor() as i32, hi.ceil() as i32);
            [a, b.max(a + 1)]
        } else {
            [-3, 3]
        };

        let values = curve.iter().map(|p| p.1).chain(reference);
        let (y0, y1) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), v| (a.min(v), b.max(v)));
        let y_bounds = if y0.is_finite() && y1 > y0 {
            let pad = (y1 - y0) * 0.05;
            [y0 - pad, y1 + pad]
        } else if y0.is_finite() {
            [y0 - 0.5, y0 + 0.5]
        } else {
            [0.0, 1.0]
        };

        Self {
            curve,
            reference,
            decades,
            y_bounds,
            y_label: y_label.into(),
        }
    }

    fn x_range(&self) -> (f64, f64) {
        (f64::from(self.decades[0]), f64::from(self.decades[1]))
    }

    fn reference_dots(&self) -> Vec<(f64, f64)> {
        let Some(r) = self.reference else {
            return Vec::new();
        };
        let (x0, x1) = self.x_range();
        (0..=REFERENCE_DOTS)
            .map(|i| (x0 + (x1 - x0) * i as f64 / REFERENCE_DOTS as f64, r))
            .collect()
    }
}

/// Tick label for `log10(d)`: the diameter in um.
fn decade_label(x: f64) -> String {
    let exp = x.round();
    let d = 10f64.powf(exp);
    let places = if exp < 0.0 { -exp as usize } else { 0 };
    format!("{d:.places$}")
}

impl Widget for PoreChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(area.x, area.y, "resize: chart needs 20x8", Style::default().fg(Color::Yellow));
            return;
        }

        let (x0, x1) = self.x_range();
        let [y0, y1] = self.y_bounds;
        let ticks = (self.decades[1] - self.decades[0] + 1) as usize;
        let dots = self.reference_dots();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("diameter (um)")
                .y_desc(self.y_label.as_str())
                .x_labels(ticks)
                .y_labels(5)
                .x_label_formatter(&|v| decade_label(*v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(dots.iter().map(|&p| Pixel::new(p, REFERENCE)))?;
            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &CURVE))?;
            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_axis_spans_whole_decades() {
        let chart = PoreChart::new(&[(0.02, 0.0), (0.5, 0.3), (150.0, 1.0)], None, "e");
        assert_eq!(chart.decades, [-2, 3]);
        assert_eq!(chart.curve.len(), 3);
        assert!((chart.curve[2].0 - 150f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn reference_widens_y_and_is_dotted_across() {
        let chart = PoreChart::new(&[(1.0, 0.0), (10.0, 1.0)], Some(1.2), "e");
        assert!(chart.y_bounds[1] > 1.2);
        let dots = chart.reference_dots();
        assert_eq!(dots.len(), REFERENCE_DOTS + 1);
        assert_eq!(dots[0], (0.0, 1.2));
        assert_eq!(dots[REFERENCE_DOTS], (1.0, 1.2));
    }

    #[test]
    fn bad_points_are_dropped_and_flat_curves_get_a_y_range() {
        let chart = PoreChart::new(&[(0.0, 0.5), (10.0, 0.5), (100.0, f64::NAN)], None, "e");
        assert_eq!(chart.curve, vec![(1.0, 0.5)]);
        assert_eq!(chart.decades, [1, 2]);
        assert_eq!(chart.y_bounds, [0.0, 1.0]);
        assert!(chart.reference_dots().is_empty());
    }

    #[test]
    fn decade_labels_are_diameters() {
        assert_eq!(decade_label(2.0), "100");
        assert_eq!(decade_label(0.0), "1");
        assert_eq!(decade_label(-2.0), "0.01");
    }
}
