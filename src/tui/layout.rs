// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the exchange dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Year Banner (3 rows)                              |
// +-------------------------+------------------------+
// | Proposal (50%)           | History (50%)          |
// |                          |                        |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: exchange name, participant count, recorded years.
    pub status_bar: Rect,
    /// Second block: target year input and draw state.
    pub year_banner: Rect,
    /// Left side of the middle section: the drawn assignment.
    pub proposal: Rect,
    /// Right side of the middle section: history grouped by year.
    pub history: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | year banner(3) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // year banner
            Constraint::Min(8),    // middle section (proposal + history)
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let year_banner = vertical[1];
    let middle = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: proposal (50%) | history (50%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(middle);

    AppLayout {
        status_bar,
        year_banner,
        proposal: horizontal[0],
        history: horizontal[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
