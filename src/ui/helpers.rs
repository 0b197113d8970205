use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Build the textual payload for a book card: title, author, year and genre,
/// then the read status. The card's border block carries the selection
/// highlight; here only the title weight and pointer change.
pub(crate) fn build_book_card_lines(book: &Book, selected: bool) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", book.title)
    } else {
        book.title.clone()
    };

    let author_text = if book.author.trim().is_empty() {
        "Unknown author".to_string()
    } else {
        format!("by {}", book.author.trim())
    };

    let status_style = if book.read {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Blue)
    };

    vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(author_text, Style::default().fg(Color::Gray))),
        Line::from(Span::raw(format!("{} • {}", book.year, book.genre.label()))),
        Line::from(Span::styled(book.read_label().to_string(), status_style)),
    ]
}
