//! Plotters-powered yield-curve chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
pub struct CurvePlottersChart<'a> {
    /// Line series for the yield curve (x = days since window start).
    pub curve: &'a [(f64, f64)],
    /// The subset of `curve` below zero, re-drawn as an inversion highlight.
    pub inverted: &'a [(f64, f64)],
    /// X bounds (days since window start).
    pub x_bounds: [f64; 2],
    /// Y bounds (percentage points).
    pub y_bounds: [f64; 2],
    /// Y-axis label (kept simple for terminal rendering).
    pub y_label: String,
    /// Formatting of y tick labels. X ticks are painted by the caller as
    /// calendar dates, so Plotters' own x labels stay disabled.
    pub fmt_y: fn(f64) -> String,
}

impl Widget for CurvePlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering, and keep x labels off because
            // the caller paints calendar dates under the chart rect.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(&self.y_label)
                .x_labels(0)
                .y_labels(5)
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal readability.
            let zero_color = RGBColor(128, 128, 128);
            let curve_color = RGBColor(0, 255, 255); // cyan
            let inverted_color = RGBColor(255, 0, 0); // red

            // 1) Zero line, when it is inside the view.
            if y0 < 0.0 && y1 > 0.0 {
                chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &zero_color))?;
            }

            // 2) The curve itself.
            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;

            // 3) Inversion highlight.
            //
            // We intentionally avoid `Circle` markers here. The underlying
            // `plotters-ratatui-backend` currently maps circle radii incorrectly
            // (pixel radius -> normalized canvas units), producing huge circles.
            //
            // A colored `Pixel` gives a clean "dot" highlight that looks good in
            // terminals and reliably overrides the base (cyan) curve point.
            chart.draw_series(
                self.inverted
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), inverted_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
