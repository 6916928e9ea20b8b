// Status bar widget: exchange name, participant count, recorded years.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [exchange name] [participant count] [recorded years]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    spans.push(Span::styled(
        format!(" {} ", title(state)),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("{} participants", state.participant_count),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        years_label(state.history.len()),
        Style::default().fg(Color::White),
    ));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// The display title, falling back while the first snapshot is in flight.
pub fn title(state: &ViewState) -> &str {
    if state.exchange_name.is_empty() {
        "Gift Exchange"
    } else {
        &state.exchange_name
    }
}

/// Human label for the number of recorded years.
pub fn years_label(count: usize) -> String {
    match count {
        1 => "1 year recorded".to_string(),
        n => format!("{n} years recorded"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
