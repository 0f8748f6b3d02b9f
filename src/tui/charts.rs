//! Plotters-powered chart widgets for Ratatui.
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

/// One scatter mark, already projected to data coordinates and colored by its
/// region. Marks are prepared outside the render call so the widget stays
/// data-driven and the prep is testable separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterMark {
    pub x: f64,
    pub y: f64,
    pub color: (u8, u8, u8),
    pub selected: bool,
}

pub struct ScatterChart<'a> {
    pub marks: &'a [ScatterMark],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for ScatterChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((x0, x1, y0, y1)) = usable_bounds(self.x_bounds, self.y_bounds, area, buf) else {
            return;
        };

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
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough here.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Region-colored marks.
            //
            // We intentionally avoid `Circle` markers for the radius encoding.
            // The underlying `plotters-ratatui-backend` currently maps circle
            // radii incorrectly (pixel radius -> normalized canvas units),
            // producing huge circles. A colored `Pixel` gives a clean dot in
            // terminals; the radius value is surfaced in the header instead.
            chart.draw_series(self.marks.iter().filter(|m| !m.selected).map(|m| {
                let (r, g, b) = m.color;
                Pixel::new((m.x, m.y), RGBColor(r, g, b))
            }))?;

            // The selected country is drawn last, in white, so it reliably
            // overrides any overlapping mark.
            chart.draw_series(
                self.marks
                    .iter()
                    .filter(|m| m.selected)
                    .map(|m| Pixel::new((m.x, m.y), WHITE)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

pub struct SeriesChart<'a> {
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((x0, x1, y0, y1)) = usable_bounds(self.x_bounds, self.y_bounds, area, buf) else {
            return;
        };

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;

            // Overdraw the observation years so sparse series stay readable.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Validate bounds and area, writing a resize hint when the area is too small.
///
/// When the available area is too small, Plotters may fail to build a chart.
/// In that case, we render a small hint rather than panicking.
fn usable_bounds(
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    area: Rect,
    buf: &mut Buffer,
) -> Option<(f64, f64, f64, f64)> {
    if area.width < 20 || area.height < 6 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return None;
    }

    let [x0, x1] = x_bounds;
    let [y0, y1] = y_bounds;
    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
        || x1 <= x0
        || y1 <= y0
    {
        return None;
    }
    Some((x0, x1, y0, y1))
}
