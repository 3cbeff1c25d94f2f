//! Ratatui-based stock dashboard.
//!
//! A settings panel takes a ticker, an optional date range and the forecast
//! length; the chart area switches between Close/Open prices, the EWM trend
//! indicator and the SVR forecast.

use std::io;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
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

use crate::app::pipeline;
use crate::cli::DashArgs;
use crate::domain::{
    DEFAULT_FOLDS, DEFAULT_TEST_FRACTION, DataSource, ForecastConfig, ForecastRequest, ForecastRun, HistoryConfig,
    PriceHistory, normalize_ticker,
};
use crate::error::AppError;
use crate::report::{DATE_AXIS, INDICATOR_LABEL, PRICE_AXIS, forecast_title};

mod plotters_chart;

use plotters_chart::{ChartSeries, LinePlottersChart};

const FIELD_TICKER: usize = 0;
const FIELD_START: usize = 1;
const FIELD_END: usize = 2;
const FIELD_DAYS: usize = 3;
const MAX_FORECAST_DAYS: usize = 60;

/// Start the dashboard.
pub fn run(args: DashArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args);
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Prices,
    Indicator,
    Forecast,
}

impl View {
    fn title(self) -> &'static str {
        match self {
            View::Prices => "Prices",
            View::Indicator => "Indicator",
            View::Forecast => "Forecast",
        }
    }

    fn next(self) -> Self {
        match self {
            View::Prices => View::Indicator,
            View::Indicator => View::Forecast,
            View::Forecast => View::Prices,
        }
    }
}

/// Slow work deferred until after the next redraw, so the status line can
/// say what is happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    LoadHistory,
    Forecast,
}

struct App {
    source: DataSource,
    ticker_input: String,
    start_input: String,
    end_input: String,
    n_days: usize,
    selected_field: usize,
    editing: bool,
    view: View,
    status: String,
    pending: Option<Pending>,
    history: Option<PriceHistory>,
    ewm: Option<Vec<f64>>,
    forecast: Option<ForecastRun>,
}

impl App {
    fn new(args: &DashArgs) -> Self {
        Self {
            source: crate::app::data_source(&args.source),
            ticker_input: args.ticker.trim().to_ascii_uppercase(),
            start_input: String::new(),
            end_input: String::new(),
            n_days: args.n_days.clamp(2, MAX_FORECAST_DAYS),
            selected_field: FIELD_TICKER,
            editing: false,
            view: View::Prices,
            status: "Loading price history...".to_string(),
            pending: Some(Pending::LoadHistory),
            history: None,
            ewm: None,
            forecast: None,
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

            if let Some(pending) = self.pending.take() {
                self.perform(pending);
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
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
        if self.editing {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => self.selected_field = (self.selected_field + 1).min(FIELD_DAYS),
            KeyCode::Left => self.adjust_days(-1),
            KeyCode::Right => self.adjust_days(1),
            KeyCode::Enter => {
                if self.selected_field == FIELD_DAYS {
                    self.request_forecast();
                } else {
                    self.editing = true;
                    self.status = match self.selected_field {
                        FIELD_TICKER => "Editing ticker. Enter to load, Esc to cancel.".to_string(),
                        _ => "Editing date (YYYY-MM-DD, empty for none). Enter to apply, Esc to cancel.".to_string(),
                    };
                }
            }
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::Char('1') => self.view = View::Prices,
            KeyCode::Char('2') => self.view = View::Indicator,
            KeyCode::Char('3') => self.view = View::Forecast,
            KeyCode::Char('f') => self.request_forecast(),
            KeyCode::Char('r') => {
                self.status = "Reloading price history...".to_string();
                self.pending = Some(Pending::LoadHistory);
            }
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let field = self.selected_field;
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.status = "Loading price history...".to_string();
                self.pending = Some(Pending::LoadHistory);
            }
            KeyCode::Backspace => {
                if let Some(input) = self.input_mut(field) {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                let accept = if field == FIELD_TICKER {
                    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
                } else {
                    c.is_ascii_digit() || c == '-'
                };
                if accept {
                    if let Some(input) = self.input_mut(field) {
                        input.push(c.to_ascii_uppercase());
                    }
                }
            }
            _ => {}
        }
    }

    fn input_mut(&mut self, field: usize) -> Option<&mut String> {
        match field {
            FIELD_TICKER => Some(&mut self.ticker_input),
            FIELD_START => Some(&mut self.start_input),
            FIELD_END => Some(&mut self.end_input),
            _ => None,
        }
    }

    fn adjust_days(&mut self, delta: i32) {
        if self.selected_field != FIELD_DAYS {
            return;
        }
        self.n_days = if delta >= 0 {
            (self.n_days + 1).min(MAX_FORECAST_DAYS)
        } else {
            self.n_days.saturating_sub(1).max(2)
        };
        self.status = format!("Forecast days: {} (Enter or f to run)", self.n_days);
    }

    fn request_forecast(&mut self) {
        self.view = View::Forecast;
        self.status = format!("Training SVR for {}...", self.ticker_input);
        self.pending = Some(Pending::Forecast);
    }

    fn perform(&mut self, pending: Pending) {
        let result = match pending {
            Pending::LoadHistory => self.load_history(),
            Pending::Forecast => self.run_forecast(),
        };
        if let Err(err) = result {
            self.status = err.to_string();
        }
    }

    fn load_history(&mut self) -> Result<(), AppError> {
        let config = HistoryConfig {
            ticker: normalize_ticker(&self.ticker_input)?,
            source: self.source,
            start: parse_date_input(&self.start_input)?,
            end: parse_date_input(&self.end_input)?,
            plot_width: 0,
            plot_height: 0,
        };
        let history = pipeline::with_description(
            pipeline::fetch_history(&config, Local::now().date_naive())?,
            self.source,
        )?;
        let ewm = pipeline::indicator_series(&history)?;
        self.status = format!("Loaded {} bars for {}.", history.bars.len(), history.ticker);
        if self.forecast.as_ref().is_some_and(|f| f.request.ticker != history.ticker) {
            self.forecast = None;
        }
        self.history = Some(history);
        self.ewm = Some(ewm);
        Ok(())
    }

    fn run_forecast(&mut self) -> Result<(), AppError> {
        let config = ForecastConfig {
            request: ForecastRequest::new(self.ticker_input.as_str(), self.n_days)?,
            source: self.source,
            test_fraction: DEFAULT_TEST_FRACTION,
            folds: DEFAULT_FOLDS,
            fold_seed: None,
            plot: false,
            plot_width: 0,
            plot_height: 0,
            export_csv: None,
            export_json: None,
        };
        let run = pipeline::run_forecast(&config, Local::now().date_naive())?;
        self.status = format!(
            "C={} epsilon={} gamma={} | CV MAE {:.4}",
            run.params.c, run.params.epsilon, run.params.gamma, run.cv_mae
        );
        self.forecast = Some(run);
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        let name = self
            .history
            .as_ref()
            .map(|h| h.profile.display_name().to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(vec![
            Span::styled("sdash", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {name}")),
        ]));

        let mut summary = format!("view: {}", self.view.title());
        if let Some(h) = &self.history {
            if let (Some(first), Some(last)) = (h.bars.first(), h.bars.last()) {
                summary.push_str(&format!(
                    " | {} .. {} | last close {:.2}",
                    first.date, last.date, last.close
                ));
            }
        }
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Gray))));
        if let Some(h) = &self.history {
            lines.push(Line::from(h.profile.description_or_default().to_string()));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let data = chart_data(
            self.view,
            self.history.as_ref(),
            self.ewm.as_deref(),
            self.forecast.as_ref(),
        );
        let title = data
            .as_ref()
            .map(|d| d.title.clone())
            .unwrap_or_else(|| self.view.title().to_string());
        let legend: Vec<Span> = data
            .as_ref()
            .map(|d| {
                d.series
                    .iter()
                    .map(|s| {
                        let (r, g, b) = s.rgb;
                        Span::styled(format!(" {} ", s.label), Style::default().fg(Color::Rgb(r, g, b)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let block = Block::default()
            .title(title)
            .title_bottom(Line::from(legend))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(data) = data else {
            let hint = match self.view {
                View::Forecast => "Press f to train and forecast.",
                _ => "Waiting for data...",
            };
            let msg = Paragraph::new(hint).style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = LinePlottersChart {
            series: &data.series,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: DATE_AXIS,
            y_label: data.y_label,
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_price,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, &data);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let show = |s: &str, empty: &str| {
            if s.trim().is_empty() {
                empty.to_string()
            } else {
                s.trim().to_string()
            }
        };

        let items = vec![
            ListItem::new(format!("Ticker: {}", show(&self.ticker_input, "-"))),
            ListItem::new(format!("Start: {}", show(&self.start_input, "full history"))),
            ListItem::new(format!("End: {}", show(&self.end_input, "today"))),
            ListItem::new(format!("Forecast days (incl. today): {}", self.n_days)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint =
                Paragraph::new("Editing…").style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + area.width.saturating_sub(14),
                y: area.y,
                width: 12.min(area.width),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter edit/run  ←/→ days  1/2/3 or Tab view  f forecast  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn parse_date_input(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| AppError::new(2, format!("Invalid date '{trimmed}': {e}")))
}

/// Series, bounds and labels for one chart view.
#[derive(Debug, Clone, PartialEq)]
struct ChartData {
    title: String,
    y_label: &'static str,
    series: Vec<ChartSeries>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

const CYAN: (u8, u8, u8) = (0, 255, 255);
const YELLOW: (u8, u8, u8) = (255, 255, 0);
const GREEN: (u8, u8, u8) = (0, 255, 0);

fn chart_data(
    view: View,
    history: Option<&PriceHistory>,
    ewm: Option<&[f64]>,
    forecast: Option<&ForecastRun>,
) -> Option<ChartData> {
    let (title, y_label, series) = match view {
        View::Prices => {
            let h = history?;
            let close = h.bars.iter().map(|b| (day_x(b.date), b.close)).collect();
            let open = h.bars.iter().map(|b| (day_x(b.date), b.open)).collect();
            (
                format!("{} prices", h.profile.display_name()),
                "Price",
                vec![
                    ChartSeries {
                        label: "Close".to_string(),
                        points: close,
                        rgb: CYAN,
                    },
                    ChartSeries {
                        label: "Open".to_string(),
                        points: open,
                        rgb: YELLOW,
                    },
                ],
            )
        }
        View::Indicator => {
            let h = history?;
            let points = h.bars.iter().zip(ewm?.iter()).map(|(b, &v)| (day_x(b.date), v)).collect();
            (
                format!("{} {INDICATOR_LABEL}", h.profile.display_name()),
                PRICE_AXIS,
                vec![ChartSeries {
                    label: INDICATOR_LABEL.to_string(),
                    points,
                    rgb: CYAN,
                }],
            )
        }
        View::Forecast => {
            let run = forecast?;
            let points = run.points.iter().map(|p| (day_x(p.date), p.predicted_close)).collect();
            (
                forecast_title(run.request.n_days),
                PRICE_AXIS,
                vec![ChartSeries {
                    label: format!("{} predicted close", run.request.ticker),
                    points,
                    rgb: GREEN,
                }],
            )
        }
    };

    let (x_bounds, y_bounds) = bounds(&series)?;
    Some(ChartData {
        title,
        y_label,
        series,
        x_bounds,
        y_bounds,
    })
}

fn day_x(d: NaiveDate) -> f64 {
    f64::from(d.num_days_from_ce())
}

fn bounds(series: &[ChartSeries]) -> Option<([f64; 2], [f64; 2])> {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
        if x.is_finite() && y.is_finite() {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y0 = y0.min(y);
            y1 = y1.max(y);
        }
    }
    if !(x0.is_finite() && y0.is_finite()) {
        return None;
    }
    if x1 <= x0 {
        x0 -= 1.0;
        x1 += 1.0;
    }
    let pad = if y1 > y0 { (y1 - y0) * 0.05 } else { y0.abs().max(1.0) * 0.05 };
    Some(([x0, x1], [y0 - pad, y1 + pad]))
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_price(v: f64) -> String {
    format!("{v:.1}")
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

fn draw_axis_ticks(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, data: &ChartData) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x_lo, x_hi] = data.x_bounds;
    let [y_lo, y_hi] = data.y_bounds;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_axis_date(x_lo + u * (x_hi - x_lo));
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
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

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = format!("{:.0}", y_lo + u * (y_hi - y_lo));
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
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

    let x_label = Paragraph::new(DATE_AXIS)
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

    let y_label = Paragraph::new(data.y_label).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(insets.left + data.y_label.len() as u16),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use crate::data::generate_history;

    fn synthetic_history() -> PriceHistory {
        generate_history("ACME", 30, 5, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()).unwrap()
    }

    #[test]
    fn price_view_has_close_and_open() {
        let h = synthetic_history();
        let data = chart_data(View::Prices, Some(&h), None, None).unwrap();
        assert_eq!(data.series.len(), 2);
        assert_eq!(data.series[0].label, "Close");
        assert_eq!(data.series[0].points.len(), 30);
        assert_eq!(data.x_bounds, [day_x(h.bars[0].date), day_x(h.bars[29].date)]);
        let lo = h.bars.iter().map(|b| b.close.min(b.open)).fold(f64::INFINITY, f64::min);
        assert!(data.y_bounds[0] < lo);
    }

    #[test]
    fn indicator_and_forecast_need_their_data() {
        let h = synthetic_history();
        assert!(chart_data(View::Indicator, Some(&h), None, None).is_none());
        assert!(chart_data(View::Forecast, Some(&h), None, None).is_none());
        assert!(chart_data(View::Prices, None, None, None).is_none());

        let ewm = pipeline::indicator_series(&h).unwrap();
        let data = chart_data(View::Indicator, Some(&h), Some(&ewm), None).unwrap();
        assert_eq!(data.series[0].label, INDICATOR_LABEL);
        assert_eq!(data.y_label, PRICE_AXIS);
    }

    #[test]
    fn axis_date_labels_round_trip() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(fmt_axis_date(day_x(d)), "10-19");
        assert_eq!(fmt_axis_date(day_x(d) + 0.4), "10-19");
    }

    #[test]
    fn date_inputs_are_optional() {
        assert_eq!(parse_date_input("  ").unwrap(), None);
        assert_eq!(
            parse_date_input("2026-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 2)
        );
        assert_eq!(parse_date_input("2026-13-02").unwrap_err().exit_code(), 2);
    }

    #[test]
    fn forecast_days_stay_in_range() {
        let mut app = App::new(&DashArgs {
            ticker: "acme".into(),
            n_days: 1,
            source: SourceArgs {
                synthetic: true,
                seed: 1,
            },
        });
        assert_eq!(app.n_days, 2);
        assert_eq!(app.ticker_input, "ACME");
        app.selected_field = FIELD_DAYS;
        app.adjust_days(-1);
        assert_eq!(app.n_days, 2);
        app.adjust_days(1);
        assert_eq!(app.n_days, 3);
    }

    #[test]
    fn loading_synthetic_history_fills_views() {
        let mut app = App::new(&DashArgs {
            ticker: "ACME".into(),
            n_days: 5,
            source: SourceArgs {
                synthetic: true,
                seed: 9,
            },
        });
        app.start_input = "2026-01-05".into();
        app.end_input = "2026-03-02".into();
        app.load_history().unwrap();
        let h = app.history.as_ref().unwrap();
        assert_eq!(h.bars.first().unwrap().date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(app.ewm.as_ref().unwrap().len(), h.bars.len());
        assert!(h.profile.description_or_default().starts_with("Simulated daily bars for ACME"));
    }
}
