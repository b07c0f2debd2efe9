use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flat_ledger::{SpendBreakdown, SpendCategory};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph},
    Frame, Terminal,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io;

/// Spend analysis chart, one bar per category
pub struct SpendChart {
    pub account_number: String,
    pub totals: Vec<(SpendCategory, Decimal)>,
}

impl SpendChart {
    pub fn new(account_number: &str, breakdown: &SpendBreakdown) -> Self {
        SpendChart {
            account_number: account_number.to_string(),
            totals: breakdown.iter().collect(),
        }
    }

    /// Bar heights: magnitude of each total, rounded to whole units
    pub fn bars(&self) -> Vec<(&'static str, u64)> {
        self.totals
            .iter()
            .map(|(category, total)| {
                let height = total.abs().round().to_u64().unwrap_or(u64::MAX);
                (category.label(), height)
            })
            .collect()
    }
}

pub fn run_chart(chart: &SpendChart) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, chart);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    chart: &SpendChart,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, chart))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => return Ok(()),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, chart: &SpendChart) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Chart
            Constraint::Length(3), // Totals + help
        ])
        .split(f.size());

    render_bars(f, chunks[0], chart);
    render_footer(f, chunks[1], chart);
}

fn render_bars(f: &mut Frame, area: Rect, chart: &SpendChart) {
    let bars = chart.bars();

    let widget = BarChart::default()
        .block(
            Block::default()
                .title(format!(" Spend Analysis - Account {} ", chart.account_number))
                .borders(Borders::ALL),
        )
        .data(bars.as_slice())
        .bar_width(15)
        .bar_gap(4)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .label_style(Style::default().fg(Color::White));

    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, chart: &SpendChart) {
    let mut spans = vec![];
    for (i, (category, total)) in chart.totals.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        spans.push(Span::styled(
            category.label(),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(format!(": {:.2}", total)));
    }
    spans.push(Span::styled(
        "   [q] close",
        Style::default().fg(Color::DarkGray),
    ));

    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bars_use_magnitudes_in_category_order() {
        let mut breakdown = SpendBreakdown::new();
        breakdown.add(SpendCategory::Atm, dec!(-40.4)).unwrap();
        breakdown.add(SpendCategory::Pos, dec!(20.6)).unwrap();

        let chart = SpendChart::new("1001", &breakdown);

        assert_eq!(
            chart.bars(),
            vec![("Online Shopping", 0), ("POS", 21), ("ATM", 40)]
        );
    }
}
