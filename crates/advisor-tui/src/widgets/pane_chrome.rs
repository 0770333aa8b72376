//! PaneChrome — bordered pane with focus styling, plus popup placement.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::feed::SlotHint;
use crate::theme::{
    style_focused_border, style_unfocused_border, C_CAUTION, C_MUTED, C_NUMBER_HINT, C_PRIMARY,
};

/// Right-aligned tag in the pane title, e.g. "LOADING" or "TIMEOUT".
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// Badge for a feed slot that is not showing fresh data.
pub fn slot_badge(hint: SlotHint) -> Option<Badge<'static>> {
    let (text, color) = match hint {
        SlotHint::Ready => return None,
        SlotHint::Loading => ("LOADING", C_MUTED),
        SlotHint::TimedOut => ("TIMEOUT", C_CAUTION),
        SlotHint::Failed => ("ERR", C_CAUTION),
    };
    Some(Badge { text, color })
}

/// `[key] title` block with the focus colour scheme.
pub fn pane_chrome<'a>(
    title: &'a str,
    hotkey: Option<char>,
    focused: bool,
    badge: Option<Badge<'a>>,
) -> Block<'a> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };
    let title_style = if focused {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };

    let mut title_spans = Vec::new();
    if let Some(key) = hotkey {
        title_spans.push(Span::styled(
            format!("[{}] ", key),
            Style::default().fg(C_NUMBER_HINT),
        ));
    }
    title_spans.push(Span::styled(title, title_style));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title_spans));

    match badge {
        Some(b) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}

/// A `percent_x` wide, `height` tall rect centered in `r`.
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(r.height)),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

pub fn contains(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits() {
        let outer = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 20, outer);
        assert_eq!(popup.height, 20);
        assert!(popup.y + popup.height <= 40);
        assert!(popup.x >= 19 && popup.x <= 21);
    }

    #[test]
    fn test_centered_rect_clamps_height() {
        let outer = Rect::new(0, 0, 80, 10);
        assert_eq!(centered_rect(50, 30, outer).height, 10);
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(5, 5, 3, 2);
        assert!(contains(r, 5, 5));
        assert!(contains(r, 7, 6));
        assert!(!contains(r, 8, 6));
        assert!(!contains(Rect::default(), 0, 0));
    }
}
