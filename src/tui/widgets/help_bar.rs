// Help bar widget: keyboard shortcut hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the help bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Context-sensitive shortcut hints.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.editing_year {
        " 0-9:Edit year | Backspace:Delete | Enter/Esc:Done"
    } else if state.proposal.is_some() {
        " g:Redraw | c:Lock in | d:Discard | y:Year | Up/Down:Scroll | q:Quit"
    } else {
        " g:Draw | y:Year | Up/Down:Scroll | q:Quit"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
