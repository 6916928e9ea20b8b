// Proposal widget: the drawn giver -> receiver pairs awaiting lock-in.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::exchange::Assignment;
use crate::tui::ViewState;

/// Render the proposal panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some((year, assignment)) = &state.proposal else {
        let paragraph = Paragraph::new("  No assignment drawn. Press g to draw.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Proposal"));
        frame.render_widget(paragraph, area);
        return;
    };

    let items: Vec<ListItem> = assignment
        .iter()
        .map(|(giver, receiver)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {giver}"), Style::default().fg(Color::White)),
                Span::styled(" -> ", Style::default().fg(Color::Gray)),
                Span::styled(receiver.to_string(), Style::default().fg(Color::Green)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(panel_title(*year, assignment)),
    );
    frame.render_widget(list, area);
}

/// Panel title including year and pair count.
pub fn panel_title(year: u16, assignment: &Assignment) -> String {
    format!("Proposal for {year} ({} pairs)", assignment.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
