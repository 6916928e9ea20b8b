// Year banner widget: target year input and the status line.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::{StatusKind, ViewState};

/// Render the year banner into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::raw(" Target year: ")];

    let year_style = if state.editing_year {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };
    spans.push(Span::styled(year_display(state), year_style));

    if let Some(status) = &state.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.text.clone(),
            Style::default().fg(status_color(status.kind)),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Exchange"),
    );
    frame.render_widget(paragraph, area);
}

/// The year input text, with a cursor marker while editing.
pub fn year_display(state: &ViewState) -> String {
    if state.editing_year {
        format!("{}_", state.year_input)
    } else if state.year_input.is_empty() {
        "----".to_string()
    } else {
        state.year_input.clone()
    }
}

/// Status line color per severity.
pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Info => Color::Cyan,
        StatusKind::Success => Color::Green,
        StatusKind::Warn => Color::Yellow,
        StatusKind::Error => Color::Red,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::StatusLine;

    #[test]
    fn year_display_plain() {
        let state = ViewState::new(2026);
        assert_eq!(year_display(&state), "2026");
    }

    #[test]
    fn year_display_editing_shows_cursor() {
        let mut state = ViewState::new(2026);
        state.editing_year = true;
        assert_eq!(year_display(&state), "2026_");
    }

    #[test]
    fn year_display_empty_placeholder() {
        let mut state = ViewState::default();
        state.year_input.clear();
        assert_eq!(year_display(&state), "----");
    }

    #[test]
    fn status_colors_by_kind() {
        assert_eq!(status_color(StatusKind::Info), Color::Cyan);
        assert_eq!(status_color(StatusKind::Success), Color::Green);
        assert_eq!(status_color(StatusKind::Warn), Color::Yellow);
        assert_eq!(status_color(StatusKind::Error), Color::Red);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.status = Some(StatusLine::new("Drawn for 2025", StatusKind::Info));
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
