//! Ratatui-based terminal UI.
//!
//! One numeric field per hour (06:00..22:00). Typing edits the selected hour,
//! Enter fills the gaps and renders the per-hour table, the step curve, and
//! the daily calorie summary with its tip.

use std::io;
use std::time::Duration;

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
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{DEMO_MISSING_PROB, RunOutput, run_with_series};
use crate::data::generate_demo_day;
use crate::domain::{CalorieBasis, Domain, RunConfig, Sample, Series, TimeKey};
use crate::error::AppError;
use crate::io::ingest::{IngestedSeries, parse_step};
use crate::report::{basis_label, fmt_thousands};

mod plotters_chart;

use plotters_chart::StepsChart;

/// Start the TUI. With `demo_seed`, the form starts pre-filled with a demo day.
pub fn run(config: RunConfig, demo_seed: Option<u64>) -> Result<(), AppError> {
    let mut app = App::new(config);
    if let Some(seed) = demo_seed {
        app.seed = seed;
        app.load_demo();
    }

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Restores raw mode and the main screen on exit.
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

/// Text buffer for one hour of the form.
#[derive(Debug, Clone)]
struct HourField {
    key: TimeKey,
    input: String,
}

struct App {
    config: RunConfig,
    fields: Vec<HourField>,
    selected: usize,
    seed: u64,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: RunConfig) -> Self {
        let fields = Domain::day()
            .keys()
            .iter()
            .map(|&key| HourField {
                key,
                input: String::new(),
            })
            .collect();
        Self {
            config,
            fields,
            selected: 0,
            seed: 0,
            status: "Type step counts, Enter to fill the gaps.".to_string(),
            run: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.fields.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.recompute(),
            KeyCode::Backspace => {
                self.fields[self.selected].input.pop();
            }
            KeyCode::Delete => self.fields[self.selected].input.clear(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                let field = &mut self.fields[self.selected];
                if field.input.len() < 8 {
                    field.input.push(c);
                }
            }
            KeyCode::Char('g') => {
                self.seed = self.seed.wrapping_add(1);
                self.load_demo();
            }
            KeyCode::Char('b') => {
                self.config.basis = match self.config.basis {
                    CalorieBasis::PerHour => CalorieBasis::Cumulative,
                    CalorieBasis::Cumulative => CalorieBasis::PerHour,
                };
                if self.run.is_some() {
                    self.recompute();
                } else {
                    self.status = format!("basis: {}", basis_label(self.config.basis));
                }
            }
            KeyCode::Char('x') => {
                for field in &mut self.fields {
                    field.input.clear();
                }
                self.run = None;
                self.status = "Cleared.".to_string();
            }
            _ => {}
        }
        false
    }

    /// Fill the form with a generated sparse day and compute it.
    fn load_demo(&mut self) {
        match generate_demo_day(self.seed, DEMO_MISSING_PROB) {
            Ok(day) => {
                for (field, sample) in self.fields.iter_mut().zip(day.series.samples()) {
                    field.input = sample.value.map(|v| format!("{v:.0}")).unwrap_or_default();
                }
                self.recompute();
                if self.run.is_some() {
                    self.status = format!("Demo day (seed {}).", self.seed);
                }
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    /// Build a fresh series from the form fields.
    fn form_series(&self) -> Result<Series, String> {
        let mut samples = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = parse_step(&field.input).map_err(|e| format!("{}: {e}", field.key))?;
            samples.push(Sample { key: field.key, value });
        }
        Series::new(samples).map_err(|e| e.to_string())
    }

    fn recompute(&mut self) {
        let series = match self.form_series() {
            Ok(series) => series,
            Err(msg) => {
                self.status = msg;
                return;
            }
        };

        match run_with_series(IngestedSeries::from_series(series, "form"), &self.config) {
            Ok(run) => {
                self.status = format!(
                    "Filled {} of {} hour(s).",
                    run.result.interpolated_count(),
                    run.rows.len()
                );
                self.run = Some(run);
            }
            Err(err) => {
                self.run = None;
                self.status = err.message().to_string();
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("steps", Style::default().fg(Color::Cyan)),
                Span::raw(" - Step & Calorie Interpolator"),
            ]),
            Line::from(Span::styled(
                format!(
                    "kcal/step: {} | basis: {} | bands: {}",
                    self.config.kcal_per_step,
                    basis_label(self.config.basis),
                    self.config.bands.as_slice().len(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, cols[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(cols[1]);

        self.draw_chart(frame, rows[0]);
        self.draw_summary(frame, rows[1]);
    }

    /// Input fields side by side with the filled values.
    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .fields
            .iter()
            .map(|field| {
                let input = if field.input.is_empty() { "-" } else { field.input.as_str() };
                let mut spans = vec![Span::raw(format!("{} [{input:>8}]", field.key))];

                let row = self
                    .run
                    .as_ref()
                    .and_then(|run| run.rows.iter().find(|r| r.hour == field.key));
                if let Some(row) = row {
                    let style = if row.interpolated {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    spans.push(Span::styled(format!(" {:>8.0} {:>6.1}", row.steps, row.calories), style));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Hours (steps, kcal)").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Steps per hour").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Press Enter to fill the gaps (g for a demo day).")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let series = chart_series(run);
        let (chart_rect, insets) = chart_layout(inner);
        let widget = StepsChart {
            line: &series.line,
            known: &series.known,
            filled: &series.filled,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Summary").borders(Borders::ALL);
        let Some(run) = &self.run else {
            frame.render_widget(Paragraph::new("-").block(block), area);
            return;
        };

        let summary = &run.summary;
        let lines = vec![
            Line::from(format!("total steps   : {}", fmt_thousands(summary.total_steps))),
            Line::from(format!("total calories: {:.2} kcal", summary.total_calories)),
            Line::from(vec![
                Span::raw("band          : "),
                Span::styled(
                    summary.tier.label.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(summary.tier.tip.clone(), Style::default().fg(Color::Green))),
        ];
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ hour  0-9 type  ⌫ erase  Enter fill  g demo  b basis  x clear  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart data derived from a run.
struct ChartSeries {
    line: Vec<(f64, f64)>,
    known: Vec<(f64, f64)>,
    filled: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn chart_series(run: &RunOutput) -> ChartSeries {
    let line: Vec<(f64, f64)> = run.rows.iter().map(|r| (r.hour.as_f64(), r.steps)).collect();
    let (known, filled): (Vec<_>, Vec<_>) = run.rows.iter().partition(|r| !r.interpolated);
    let known = known.iter().map(|r| (r.hour.as_f64(), r.steps)).collect();
    let filled = filled.iter().map(|r| (r.hour.as_f64(), r.steps)).collect();

    let mut x_bounds = match (line.first(), line.last()) {
        (Some(&(a, _)), Some(&(b, _))) => [a, b],
        _ => [0.0, 1.0],
    };
    if x_bounds[1] <= x_bounds[0] {
        x_bounds = [x_bounds[0] - 0.5, x_bounds[0] + 0.5];
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &line {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = (y_max - y_min) * 0.05;

    ChartSeries {
        line,
        known,
        filled,
        x_bounds,
        y_bounds: [y_min - pad, y_max + pad],
    }
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

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
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
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    // Hour ticks along the bottom.
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = TimeKey(x_val.round() as i32).to_string();
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    // Step ticks down the left edge.
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("hour")
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

    let y_label = Paragraph::new("steps").style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
