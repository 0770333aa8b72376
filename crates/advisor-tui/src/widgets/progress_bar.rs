//! Smooth Unicode seek bar for the transport panel.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_POSITIVE, C_SECONDARY};
use crate::transport::format_elapsed;

const EIGHTHS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Render `elapsed ▕bar▏ duration` into `area` and return the rect the bar
/// itself occupies, for click-to-seek.
pub fn draw_progress(frame: &mut Frame, area: Rect, position_secs: u32, duration_secs: u32) -> Rect {
    if area.width < 8 || area.height == 0 {
        return Rect::default();
    }

    let left = format!("{} ", format_elapsed(position_secs));
    let right = format!(" {}", format_elapsed(duration_secs));
    let label_w = (left.chars().count() + right.chars().count()) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4);

    let progress = if duration_secs == 0 {
        0.0
    } else {
        position_secs as f64 / duration_secs as f64
    };

    let bar_rect = Rect {
        x: area.x + left.chars().count() as u16,
        y: area.y,
        width: bar_w,
        height: 1,
    };
    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(C_SECONDARY)),
        Span::styled(smooth_bar(progress, bar_w as usize), Style::default().fg(C_POSITIVE)),
        Span::styled(right, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
    bar_rect
}

/// Fill `width` cells to `progress` (0..=1) with eighth-block resolution.
pub fn smooth_bar(progress: f64, width: usize) -> String {
    let eighths = (progress.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full = eighths / 8;
    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full.min(width) {
        bar.push('█');
    }
    if full < width {
        bar.push(EIGHTHS[eighths % 8]);
        for _ in (full + 1)..width {
            bar.push('·');
        }
    }
    bar
}

/// Map a click column inside the bar to a position in seconds.
pub fn seek_target(bar: Rect, column: u16, duration_secs: u32) -> Option<i64> {
    if bar.width == 0 || column < bar.x || column >= bar.x + bar.width {
        return None;
    }
    let frac = (column - bar.x) as f64 / (bar.width.saturating_sub(1).max(1)) as f64;
    Some((frac * duration_secs as f64).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_bar_width() {
        assert_eq!(smooth_bar(0.0, 10).chars().count(), 10);
        assert_eq!(smooth_bar(0.55, 10).chars().count(), 10);
        assert_eq!(smooth_bar(1.0, 10), "█".repeat(10));
    }

    #[test]
    fn test_seek_target_edges() {
        let bar = Rect::new(10, 0, 11, 1);
        assert_eq!(seek_target(bar, 10, 3600), Some(0));
        assert_eq!(seek_target(bar, 20, 3600), Some(3600));
        assert_eq!(seek_target(bar, 15, 3600), Some(1800));
        assert_eq!(seek_target(bar, 9, 3600), None);
        assert_eq!(seek_target(bar, 21, 3600), None);
    }
}
