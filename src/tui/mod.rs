//! Ratatui-based terminal UI.
//!
//! The TUI shows the three linked views side by side: the scatter plot, the
//! per-region bar chart, and the selected country's time series. A settings
//! panel drives the selection state; every change rebuilds the derived views
//! through the same pure builders the report subcommands use.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::data::Dataset;
use crate::domain::Selection;
use crate::error::AppError;
use crate::scale::{BandScale, OrdinalColor, SqrtScale};
use crate::view::{self, DashboardViews};

mod charts;

use charts::{ScatterChart, ScatterMark, SeriesChart};

/// Settings fields, in panel order.
const FIELD_LABELS: [&str; 8] = [
    "Year", "X", "Y", "Radius", "Bar", "Line", "Country", "Region",
];

const FIELD_YEAR: usize = 0;
const FIELD_X: usize = 1;
const FIELD_Y: usize = 2;
const FIELD_R: usize = 3;
const FIELD_BAR: usize = 4;
const FIELD_LINE: usize = 5;
const FIELD_COUNTRY: usize = 6;
const FIELD_REGION: usize = 7;

/// Marker-size range (in cells) the sqrt radius scale maps onto.
const RADIUS_RANGE: [f64; 2] = [1.0, 3.0];

/// Start the TUI over an already-loaded dataset.
pub fn run(dataset: Dataset, selection: Selection) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, selection);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dataset: Dataset,
    selection: Selection,
    views: DashboardViews,
    colors: OrdinalColor,
    selected_field: usize,
    /// Cursor over `dataset.countries` for the Country field.
    country_cursor: usize,
    /// Cursor over `dataset.regions` for the Region field.
    region_cursor: usize,
    status: String,
}

impl App {
    fn new(dataset: Dataset, selection: Selection) -> Self {
        let views = view::build_views(&dataset, &selection);
        let colors = OrdinalColor::new(dataset.regions.clone());
        let country_cursor = selection
            .selected_country
            .as_deref()
            .and_then(|geo| dataset.countries.iter().position(|c| c.geo == geo))
            .unwrap_or(0);
        let status = format!(
            "{} countries, {} regions, years {}-{}.",
            dataset.countries.len(),
            dataset.regions.len(),
            dataset.years.first().copied().unwrap_or(0),
            dataset.years.last().copied().unwrap_or(0),
        );
        Self {
            dataset,
            selection,
            views,
            colors,
            selected_field: 0,
            country_cursor,
            region_cursor: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_LABELS.len() - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => self.apply_field(),
            _ => {}
        }
        false
    }

    /// ←/→ on the current field. Indicator fields cycle; the year walks the
    /// dataset's year coverage; country/region fields only move their cursor
    /// (Enter applies).
    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_YEAR => {
                let years = &self.dataset.years;
                if years.is_empty() {
                    return;
                }
                let idx = years
                    .iter()
                    .position(|&y| y >= self.selection.year)
                    .unwrap_or(years.len() - 1);
                let idx = (idx as i64 + i64::from(delta)).clamp(0, years.len() as i64 - 1);
                self.selection.set_year(years[idx as usize]);
                self.status = format!("year: {}", self.selection.year);
                self.rebuild();
            }
            FIELD_X => {
                self.selection.x = cycle(self.selection.x, delta);
                self.status = format!("x: {}", self.selection.x.display_name());
                self.rebuild();
            }
            FIELD_Y => {
                self.selection.y = cycle(self.selection.y, delta);
                self.status = format!("y: {}", self.selection.y.display_name());
                self.rebuild();
            }
            FIELD_R => {
                self.selection.r = cycle(self.selection.r, delta);
                self.status = format!("radius: {}", self.selection.r.display_name());
                self.rebuild();
            }
            FIELD_BAR => {
                self.selection.bar = cycle(self.selection.bar, delta);
                self.status = format!("bar: {}", self.selection.bar.display_name());
                self.rebuild();
            }
            FIELD_LINE => {
                self.selection.line = cycle(self.selection.line, delta);
                self.status = format!("line: {}", self.selection.line.display_name());
                self.rebuild();
            }
            FIELD_COUNTRY => {
                let n = self.dataset.countries.len();
                if n > 0 {
                    self.country_cursor = wrap(self.country_cursor, delta, n);
                    self.status = format!(
                        "country cursor: {} (Enter to select)",
                        self.dataset.countries[self.country_cursor].country
                    );
                }
            }
            FIELD_REGION => {
                let n = self.dataset.regions.len();
                if n > 0 {
                    self.region_cursor = wrap(self.region_cursor, delta, n);
                    self.status = format!(
                        "region cursor: {} (Enter to toggle)",
                        self.dataset.regions[self.region_cursor]
                    );
                }
            }
            _ => {}
        }
    }

    /// Enter on the current field: select the country under the cursor, or
    /// toggle the region highlight (toggling the highlighted region again
    /// restores the all-visible baseline).
    fn apply_field(&mut self) {
        match self.selected_field {
            FIELD_COUNTRY => {
                let Some(record) = self.dataset.countries.get(self.country_cursor) else {
                    return;
                };
                self.selection.select_country(record.geo.clone());
                self.status = format!("selected: {}", record.country);
                self.rebuild();
            }
            FIELD_REGION => {
                let Some(region) = self.dataset.regions.get(self.region_cursor).cloned() else {
                    return;
                };
                self.selection.toggle_region(&region);
                self.status = match self.selection.highlighted_region.as_deref() {
                    Some(r) => format!("highlighting: {r}"),
                    None => "highlight cleared".to_string(),
                };
                // Visibility is a pure filter over the scatter projection; no
                // rebuild needed, but it is cheap and keeps one code path.
                self.rebuild();
            }
            _ => {}
        }
    }

    fn rebuild(&mut self) {
        self.views = view::build_views(&self.dataset, &self.selection);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("wd", Style::default().fg(Color::Cyan)),
            Span::raw(" — country indicators explorer"),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "year: {} | x: {} | y: {} | r: {} | bar: {}",
                self.selection.year,
                self.selection.x.display_name(),
                self.selection.y.display_name(),
                self.selection.r.display_name(),
                self.selection.bar.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let country_line = match self.selected_point() {
            Some(point) => {
                // Marker sizes in a terminal are all one cell, so report the
                // radius encoding numerically instead of drawing it.
                let radius = SqrtScale::new(self.views.scatter.r_domain, RADIUS_RANGE);
                let r_label = if point.r.is_finite() {
                    format!("{:.2} (marker {:.1})", point.r, radius.scale(point.r))
                } else {
                    "-".to_string()
                };
                format!(
                    "country: {} | {} @ {}: {} | line: {}",
                    point.country,
                    self.selection.r.display_name(),
                    self.selection.year,
                    r_label,
                    self.selection.line.display_name(),
                )
            }
            None => "country: none selected (Country field + Enter)".to_string(),
        };
        lines.push(Line::from(Span::styled(
            country_line,
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(columns[0]);
        self.draw_scatter(frame, left[0]);
        self.draw_line(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(11)])
            .split(columns[1]);
        self.draw_bars(frame, right[0]);
        self.draw_settings(frame, right[1]);
    }

    fn draw_scatter(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!(
            "Scatter — {} vs {}",
            self.selection.x.display_name(),
            self.selection.y.display_name()
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let marks = self.scatter_marks();
        let widget = ScatterChart {
            marks: &marks,
            x_bounds: padded_bounds(self.views.scatter.x_domain),
            y_bounds: padded_bounds(self.views.scatter.y_domain),
            x_label: self.selection.x.display_name(),
            y_label: self.selection.y.display_name(),
            fmt_x: fmt_axis_value,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_line(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.views.series.country.as_deref() {
            Some(country) => format!(
                "{} — {}",
                country,
                self.selection.line.display_name()
            ),
            None => "Time series — no country selected".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.views.series.points.is_empty() {
            let msg = Paragraph::new("Select a country in the scatter settings.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let points: Vec<(f64, f64)> = self
            .views
            .series
            .points
            .iter()
            .map(|p| (f64::from(p.year), p.value))
            .collect();

        let widget = SeriesChart {
            points: &points,
            x_bounds: padded_bounds(self.views.series.year_domain),
            y_bounds: padded_bounds(self.views.series.value_domain),
            x_label: "year",
            y_label: self.selection.line.display_name(),
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_bars(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Region mean — {}", self.selection.bar.display_name());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let regions = &self.views.regions;
        let highlight = self.selection.highlighted_region.as_deref();

        // Band layout over the available width, same math a graphical surface
        // would use.
        let band = BandScale::new(
            regions.bars.iter().map(|b| b.region.clone()).collect(),
            [0.0, f64::from(inner.width)],
            0.2,
        );
        let bar_width = band.bandwidth().floor().max(1.0) as u16;

        let bars: Vec<Bar> = regions
            .bars
            .iter()
            .map(|b| {
                let (r, g, bl) = self.colors.color(&b.region);
                let dimmed = highlight.is_some() && highlight != Some(b.region.as_str());
                let style = if dimmed {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Rgb(r, g, bl))
                };
                let value = b.mean.map(|m| m.max(0.0).round() as u64).unwrap_or(0);
                let text = b
                    .mean
                    .map(|m| format!("{m:.1}"))
                    .unwrap_or_else(|| "-".to_string());
                Bar::default()
                    .label(Line::from(b.region.clone()))
                    .value(value)
                    .text_value(text)
                    .style(style)
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .max(regions.max_mean.max(1.0).round() as u64);
        frame.render_widget(chart, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let country_label = self
            .dataset
            .countries
            .get(self.country_cursor)
            .map(|c| c.country.as_str())
            .unwrap_or("-");
        let region_label = self
            .dataset
            .regions
            .get(self.region_cursor)
            .map(String::as_str)
            .unwrap_or("-");

        let values: [String; 8] = [
            self.selection.year.to_string(),
            self.selection.x.display_name().to_string(),
            self.selection.y.display_name().to_string(),
            self.selection.r.display_name().to_string(),
            self.selection.bar.display_name().to_string(),
            self.selection.line.display_name().to_string(),
            country_label.to_string(),
            match self.selection.highlighted_region.as_deref() {
                Some(active) if active == region_label => format!("{region_label} [on]"),
                _ => region_label.to_string(),
            },
        ];

        let items: Vec<ListItem> = FIELD_LABELS
            .iter()
            .zip(values.iter())
            .map(|(label, value)| ListItem::new(format!("{label}: {value}")))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ field  ←/→ adjust  Enter select country / toggle region  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(
                &self.status,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    /// Scatter marks for the chart: visible, finite points colored by region.
    fn scatter_marks(&self) -> Vec<ScatterMark> {
        self.views
            .scatter
            .points
            .iter()
            .filter(|p| view::scatter::visible(p, &self.selection))
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| ScatterMark {
                x: p.x,
                y: p.y,
                color: self.colors.color(&p.region),
                selected: self.selection.selected_country.as_deref() == Some(p.geo.as_str()),
            })
            .collect()
    }

    fn selected_point(&self) -> Option<&view::ScatterPoint> {
        let geo = self.selection.selected_country.as_deref()?;
        self.views.scatter.points.iter().find(|p| p.geo == geo)
    }
}

fn cycle(indicator: crate::domain::Indicator, delta: i32) -> crate::domain::Indicator {
    if delta >= 0 {
        indicator.next()
    } else {
        indicator.prev()
    }
}

fn wrap(cursor: usize, delta: i32, len: usize) -> usize {
    let len = len as i64;
    (((cursor as i64 + i64::from(delta)) % len + len) % len) as usize
}

/// Pad a `[min, max]` domain by 5% so edge points stay visible; degenerate
/// domains get a unit of slack so the chart always has a drawable span.
fn padded_bounds(domain: [f64; 2]) -> [f64; 2] {
    let [min, max] = domain;
    if !(min.is_finite() && max.is_finite()) {
        return [0.0, 1.0];
    }
    let span = max - min;
    if span <= 0.0 {
        return [min - 0.5, max + 0.5];
    }
    let pad = span * 0.05;
    [min - pad, max + pad]
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.1}")
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_bounds_always_have_positive_span() {
        let [a, b] = padded_bounds([3.0, 3.0]);
        assert!(b > a);
        let [a, b] = padded_bounds([0.0, 10.0]);
        assert!(a < 0.0 && b > 10.0);
        assert_eq!(padded_bounds([f64::NAN, 1.0]), [0.0, 1.0]);
    }

    #[test]
    fn wrap_cycles_both_directions() {
        assert_eq!(wrap(0, -1, 5), 4);
        assert_eq!(wrap(4, 1, 5), 0);
        assert_eq!(wrap(2, 1, 5), 3);
    }

    #[test]
    fn axis_value_formatting_compacts_large_numbers() {
        assert_eq!(fmt_axis_value(2.25), "2.3");
        assert_eq!(fmt_axis_value(25_000.0), "25k");
        assert_eq!(fmt_axis_value(3_500_000.0), "3.5M");
        assert_eq!(fmt_axis_year(1990.0), "1990");
    }
}
