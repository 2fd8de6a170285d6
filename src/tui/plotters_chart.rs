//! Plotters-powered step curve widget for Ratatui.
//!
//! Plotters output is drawn into the Ratatui buffer through
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only chart description; all series and bounds are computed by the caller.
pub struct StepsChart<'a> {
    /// Filled curve over every hour in the domain.
    pub line: &'a [(f64, f64)],
    /// Hours the user entered.
    pub known: &'a [(f64, f64)],
    /// Hours filled by interpolation.
    pub filled: &'a [(f64, f64)],
    /// X bounds (hour of day).
    pub x_bounds: [f64; 2],
    /// Y bounds (steps).
    pub y_bounds: [f64; 2],
}

impl Widget for StepsChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Tick labels are drawn by the caller in terminal cells.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255);
            let known_color = WHITE;
            let filled_color = RGBColor(255, 200, 0);

            chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;

            // `Circle` radii come out wrong through the ratatui backend; a pixel reads fine.
            chart.draw_series(self.filled.iter().map(|&(x, y)| Pixel::new((x, y), filled_color)))?;
            chart.draw_series(self.known.iter().map(|&(x, y)| Pixel::new((x, y), known_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
