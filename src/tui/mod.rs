//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the lookback window, data
//! source and sample seed, then renders the yield-curve chart, the active
//! warnings and the current scenario.

use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::analysis::profile;
use crate::app::pipeline::RunOutput;
use crate::cli::RunArgs;
use crate::data::{DEFAULT_TTL, FredClient, SeriesCache, generate_sample};
use crate::domain::{AnalysisConfig, ColumnKey, DataSource, RiskLevel, SeriesKey, TimeSeries};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::CurvePlottersChart;

/// Selectable lookback windows, in days.
const LOOKBACKS: &[(&str, u32)] = &[
    ("60 days", 60),
    ("1 year", 365),
    ("2 years", 730),
    ("5 years", 1825),
    ("10 years", 3650),
];

/// Start the TUI.
pub fn run(args: RunArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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
    config: AnalysisConfig,
    lookback_idx: usize,
    selected_field: usize,
    status: String,
    fred: Option<FredClient>,
    cache: SeriesCache,
    series: BTreeMap<SeriesKey, TimeSeries>,
    run: Option<RunOutput>,
}

impl App {
    fn new(args: RunArgs) -> Result<Self, AppError> {
        let config = crate::app::analysis_config_from_args(&args);
        let fred = match config.source {
            DataSource::Fred => Some(FredClient::from_env()?),
            DataSource::Sample => None,
        };
        let lookback_idx = LOOKBACKS
            .iter()
            .position(|&(_, days)| days == args.days)
            .unwrap_or(2);

        let mut app = Self {
            config,
            lookback_idx,
            selected_field: 0,
            status: "Loading data...".to_string(),
            fred,
            cache: SeriesCache::new(DEFAULT_TTL),
            series: BTreeMap::new(),
            run: None,
        };
        app.refresh_data()?;
        Ok(app)
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
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('r') => {
                self.cache.clear();
                match self.refresh_data() {
                    Ok(()) => self.status = "Refreshed.".to_string(),
                    Err(err) => self.status = format!("Refresh failed: {err}"),
                }
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                let n = LOOKBACKS.len() as i32;
                let next = (self.lookback_idx as i32 + delta).rem_euclid(n);
                self.lookback_idx = next as usize;
                let (label, days) = LOOKBACKS[self.lookback_idx];
                self.config.start_date =
                    self.config.end_date - chrono::Duration::days(i64::from(days));
                self.status = format!("lookback: {label}");
                self.reload_with_status();
            }
            1 => {
                let next = match self.config.source {
                    DataSource::Fred => DataSource::Sample,
                    DataSource::Sample => DataSource::Fred,
                };
                if next == DataSource::Fred && self.fred.is_none() {
                    match FredClient::from_env() {
                        Ok(client) => self.fred = Some(client),
                        Err(err) => {
                            self.status = format!("Cannot switch to FRED: {err}");
                            return;
                        }
                    }
                }
                self.config.source = next;
                self.status = format!("source: {}", source_label(self.config.source));
                self.reload_with_status();
            }
            2 => {
                self.config.sample_seed = if delta >= 0 {
                    self.config.sample_seed.wrapping_add(1)
                } else {
                    self.config.sample_seed.wrapping_sub(1)
                };
                self.status = format!("seed: {}", self.config.sample_seed);
                if self.config.source == DataSource::Sample {
                    self.reload_with_status();
                }
            }
            _ => {}
        }
    }

    fn reload_with_status(&mut self) {
        if let Err(err) = self.refresh_data() {
            self.status = format!("Reload failed: {err}");
        }
    }

    fn refresh_data(&mut self) -> Result<(), AppError> {
        self.series = match self.config.source {
            DataSource::Fred => {
                let Some(fred) = &self.fred else {
                    return Err(AppError::new(2, "No FRED client available."));
                };
                fred.fetch_all_cached(
                    &mut self.cache,
                    self.config.start_date,
                    self.config.end_date,
                )
            }
            DataSource::Sample => generate_sample(
                self.config.start_date,
                self.config.end_date,
                self.config.sample_seed,
            )?,
        };
        self.recompute()
    }

    fn recompute(&mut self) -> Result<(), AppError> {
        let run = crate::app::pipeline::analyze(&self.series, &self.config)?;
        self.run = Some(run);
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(8),
                Constraint::Length(5),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_lower(frame, chunks[2]);
        self.draw_settings(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("mrisk", Style::default().fg(Color::Cyan)),
            Span::raw(" — macro credit risk monitor"),
        ]));

        let rows = self.run.as_ref().map(|r| r.table.len()).unwrap_or(0);
        lines.push(Line::from(Span::styled(
            format!(
                "window: {} → {} | source: {} | rows: {rows}",
                self.config.start_date,
                self.config.end_date,
                source_label(self.config.source),
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            let scenario = profile(run.scenario);
            let ongoing = run.inversions.iter().filter(|i| i.open_ended).count();
            lines.push(Line::from(vec![
                Span::raw("risk: "),
                Span::styled(
                    format!("{} (score {})", run.risk.level.label(), run.risk.score),
                    Style::default()
                        .fg(level_color(run.risk.level))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        " | scenario {} - {} | inversions: {} ({ongoing} ongoing)",
                        scenario.id.number(),
                        scenario.title,
                        run.inversions.len(),
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Yield curve (10Y-2Y)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let Some((curve, inverted, x_bounds, y_bounds)) =
            chart_series(run, self.config.start_date)
        else {
            let msg = Paragraph::new("No yield-curve data in window.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = CurvePlottersChart {
            curve: &curve,
            inverted: &inverted,
            x_bounds,
            y_bounds,
            y_label: "10Y-2Y (%p)".to_string(),
            fmt_y: fmt_axis_y,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(
                frame,
                inner,
                chart_rect,
                insets,
                self.config.start_date,
                x_bounds,
                y_bounds,
            );
        }
    }

    fn draw_lower(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_warnings(frame, chunks[0]);
        self.draw_scenario(frame, chunks[1]);
    }

    fn draw_warnings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = match &self.run {
            Some(run) if !run.risk.warnings.is_empty() => run
                .risk
                .warnings
                .iter()
                .map(|w| {
                    ListItem::new(format!("! {w}")).style(Style::default().fg(Color::Yellow))
                })
                .collect(),
            Some(_) => vec![ListItem::new("no warnings").style(Style::default().fg(Color::Green))],
            None => vec![ListItem::new("-")],
        };

        let list =
            List::new(items).block(Block::default().title("Warnings").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_scenario(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Scenario").borders(Borders::ALL);

        let Some(run) = &self.run else {
            frame.render_widget(Paragraph::new("-").block(block), area);
            return;
        };

        let scenario = profile(run.scenario);
        let lines = vec![
            Line::from(Span::styled(
                format!("{} - {}", scenario.id.number(), scenario.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                scenario.risk_label,
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::raw(scenario.meaning)),
        ];

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (lookback_label, _) = LOOKBACKS[self.lookback_idx];

        let items = vec![
            ListItem::new(format!("Lookback: {lookback_label}")),
            ListItem::new(format!("Source: {}", source_label(self.config.source))),
            ListItem::new(format!("Seed: {}", self.config.sample_seed)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn source_label(source: DataSource) -> &'static str {
    match source {
        DataSource::Fred => "FRED",
        DataSource::Sample => "sample",
    }
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
        RiskLevel::Critical => Color::LightRed,
    }
}

/// Build chart series for Plotters: the curve line, its inverted subset, and
/// padded bounds. X is "days since the window start".
fn chart_series(
    run: &RunOutput,
    start: NaiveDate,
) -> Option<(Vec<(f64, f64)>, Vec<(f64, f64)>, [f64; 2], [f64; 2])> {
    let mut curve = Vec::new();
    let mut inverted = Vec::new();

    for (date, value) in run.table.column_points(ColumnKey::YieldCurve) {
        let Some(y) = value else { continue };
        let x = (date - start).num_days() as f64;
        curve.push((x, y));
        if y < 0.0 {
            inverted.push((x, y));
        }
    }

    if curve.is_empty() {
        return None;
    }

    let x0 = curve.first().map(|&(x, _)| x)?;
    let x1 = curve.last().map(|&(x, _)| x)?;
    if x1 <= x0 {
        return None;
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &curve {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    // Keep zero in view so the inversion line always has a reference.
    y_min = y_min.min(0.0);
    y_max = y_max.max(0.0);

    let pad = ((y_max - y_min).abs() * 0.05).max(0.05);
    let y_bounds = [y_min - pad, y_max + pad];

    Some((curve, inverted, [x0, x1], y_bounds))
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.2}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    start: NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 4usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let date = start + chrono::Duration::days(x_val.round() as i64);
        let label = date.format("%Y-%m").to_string();
        let label_len = label.len() as u16;
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let begin = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: begin,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:+.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let begin = x.saturating_sub(label_len);
        if begin < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: begin,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("10Y-2Y")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisConfig, TimeSeries};

    #[test]
    fn chart_series_splits_out_inverted_points() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
        let config = AnalysisConfig {
            start_date: d(1),
            end_date: d(10),
            reference: SeriesKey::TenYear,
            source: DataSource::Sample,
            sample_seed: 0,
            export_table: None,
            export_assessment: None,
        };

        let mut series = BTreeMap::new();
        series.insert(
            SeriesKey::CurveDirect,
            TimeSeries::from_observations(vec![(d(1), 0.5), (d(2), -0.2), (d(3), 0.1)]),
        );
        series.insert(
            SeriesKey::TenYear,
            TimeSeries::from_observations(vec![(d(1), 4.0), (d(2), 4.0), (d(3), 4.0)]),
        );

        let run = crate::app::pipeline::analyze(&series, &config).unwrap();
        let (curve, inverted, x_bounds, y_bounds) = chart_series(&run, d(1)).unwrap();

        assert_eq!(curve.len(), 3);
        assert_eq!(inverted, vec![(1.0, -0.2)]);
        assert_eq!(x_bounds, [0.0, 2.0]);
        assert!(y_bounds[0] < -0.2 && y_bounds[1] > 0.5);
    }

    #[test]
    fn chart_series_needs_at_least_two_points() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
        let config = AnalysisConfig {
            start_date: d(1),
            end_date: d(10),
            reference: SeriesKey::TenYear,
            source: DataSource::Sample,
            sample_seed: 0,
            export_table: None,
            export_assessment: None,
        };

        let mut series = BTreeMap::new();
        series.insert(
            SeriesKey::TenYear,
            TimeSeries::from_observations(vec![(d(1), 4.0)]),
        );
        series.insert(
            SeriesKey::TwoYear,
            TimeSeries::from_observations(vec![(d(1), 3.5)]),
        );

        let run = crate::app::pipeline::analyze(&series, &config).unwrap();
        assert!(chart_series(&run, d(1)).is_none());
    }
}
