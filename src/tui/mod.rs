//! Ratatui-based terminal UI.
//!
//! A read-only browser over the saved-analyses store: the list of saved
//! analyses on the left, the selected analysis' period bar chart and metrics
//! on the right. Creating and saving analyses stays in the CLI.

use std::io;
use std::path::{Path, PathBuf};
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
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Terminal,
};

use crate::domain::{AnalysisResult, Period};
use crate::error::AppError;
use crate::report::format::{fmt_count, fmt_money, fmt_pct};
use crate::store::AnalysisStore;

/// Start the TUI over the store at `store_path`.
pub fn run(store_path: &Path) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(store_path)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!("Failed to enter alternate screen: {e}")));
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
    store_path: PathBuf,
    analyses: Vec<AnalysisResult>,
    selected: usize,
    status: String,
}

impl App {
    fn new(store_path: &Path) -> Result<Self, AppError> {
        let store = AnalysisStore::open(store_path)?;
        let status = format!(
            "{} analyses loaded from {}",
            store.len(),
            store_path.display()
        );
        Ok(Self {
            store_path: store_path.to_path_buf(),
            analyses: store.list().to_vec(),
            selected: 0,
            status,
        })
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
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.analyses.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => {
                let store = AnalysisStore::open(&self.store_path)?;
                self.analyses = store.list().to_vec();
                self.selected = self.selected.min(self.analyses.len().saturating_sub(1));
                self.status = format!("Reloaded: {} analyses.", self.analyses.len());
            }
            _ => {}
        }
        Ok(false)
    }

    fn selected_analysis(&self) -> Option<&AnalysisResult> {
        self.analyses.get(self.selected)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("promo", Style::default().fg(Color::Green)),
            Span::raw(" — saved post-promotion analyses"),
            Span::styled(
                format!("  ({} saved)", self.analyses.len()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(area);

        self.draw_list(frame, chunks[0]);
        self.draw_detail(frame, chunks[1]);
    }

    fn draw_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .analyses
            .iter()
            .map(|a| {
                ListItem::new(format!(
                    "{} | {} | {}",
                    a.retailer,
                    a.windows.promo_start,
                    fmt_pct(a.metrics.during_lift_pct)
                ))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Analyses").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        if !self.analyses.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(10)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_metrics(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales by period").borders(Borders::ALL);

        let Some(analysis) = self.selected_analysis() else {
            let msg = Paragraph::new("No saved analyses. Run `promo analyze --save ...` first.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let bars: Vec<Bar> = Period::ALL
            .iter()
            .map(|period| {
                let dollars = analysis.aggregate(*period).total_dollars;
                let color = match period {
                    Period::Pre => Color::Gray,
                    Period::During => Color::Green,
                    Period::Post => Color::Magenta,
                };
                Bar::default()
                    .label(Line::from(period.display_name()))
                    .value(dollars.round().max(0.0) as u64)
                    .text_value(fmt_money(dollars))
                    .style(Style::default().fg(color))
            })
            .collect();

        let bar_width = ((area.width.saturating_sub(8)) / 3).clamp(8, 20);
        let chart = BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(2)
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Metrics").borders(Borders::ALL);

        let Some(a) = self.selected_analysis() else {
            frame.render_widget(block, area);
            return;
        };
        let m = &a.metrics;

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(format!(
            "{} | {}",
            a.retailer,
            a.product_group_display()
        )));
        lines.push(Line::from(format!(
            "Promo {} .. {} ({} days)",
            a.windows.promo_start, a.windows.promo_end, a.windows.promo_days
        )));
        lines.push(Line::from(format!(
            "Lift during {} (expected {}) | post {}",
            fmt_pct(m.during_lift_pct),
            fmt_pct(a.financials.expected_lift_pct),
            fmt_pct(m.post_lift_pct),
        )));
        lines.push(Line::from(format!(
            "ROI {} (expected {}) | total spend {}",
            fmt_pct(m.roi_pct),
            fmt_pct(a.financials.expected_roi_pct),
            fmt_money(m.total_trade_spend),
        )));
        lines.push(Line::from(format!(
            "Incremental: {} sales | {} units | {} profit",
            fmt_money(m.incremental_sales),
            fmt_count(m.incremental_units),
            fmt_money(m.incremental_profit),
        )));
        if !a.notes.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Notes: {}", a.notes),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
