// History widget: recorded assignments grouped by year, newest first.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::exchange::{Assignment, Year};
use crate::tui::ViewState;

/// Render the history panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.history.is_empty() {
        let paragraph = Paragraph::new("  No years recorded yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("History"));
        frame.render_widget(paragraph, area);
        return;
    }

    let lines = flatten(&state.history);
    let total = lines.len();

    let scroll_offset = state.scroll_offset.get("history").copied().unwrap_or(0);

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);

    // Clamp scroll offset
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = scroll_offset.min(max_offset);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|line| match line {
            HistoryLine::YearHeader(year) => ListItem::new(Line::from(Span::styled(
                format!("{year}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))),
            HistoryLine::Pair(giver, receiver) => ListItem::new(Line::from(vec![
                Span::styled(format!("  {giver}"), Style::default().fg(Color::White)),
                Span::styled(" -> ", Style::default().fg(Color::Gray)),
                Span::styled(receiver, Style::default().fg(Color::White)),
            ])),
        })
        .collect();

    let title = format!("History ({} years)", state.history.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);

    // Render vertical scrollbar if content overflows
    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// A single display line of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLine {
    YearHeader(Year),
    Pair(String, String),
}

/// Flatten history entries into display lines, newest year first.
pub fn flatten(history: &[(Year, Assignment)]) -> Vec<HistoryLine> {
    let mut lines = Vec::new();
    for (year, assignment) in history.iter().rev() {
        lines.push(HistoryLine::YearHeader(*year));
        for (giver, receiver) in assignment.iter() {
            lines.push(HistoryLine::Pair(giver.to_string(), receiver.to_string()));
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
