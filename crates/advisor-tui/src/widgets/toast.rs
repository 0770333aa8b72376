//! Toast notifications — short-lived messages in the top-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_INFO, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastLevel {
    Info,
    Warning,
}

impl ToastLevel {
    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Warning => "!",
        }
    }

    fn style(self) -> Style {
        let color = match self {
            Self::Info => C_TOAST_INFO,
            Self::Warning => C_TOAST_WARNING,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    fn lifetime(self) -> Duration {
        match self {
            Self::Info => Duration::from_secs(3),
            Self::Warning => Duration::from_secs(4),
        }
    }
}

struct Toast {
    message: String,
    level: ToastLevel,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 4,
        }
    }

    /// Queue a message. A repeat of a message already on screen replaces it.
    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel) {
        let message = message.into();
        self.toasts.retain(|t| t.message != message);
        self.toasts.push_back(Toast {
            message,
            level,
            expires: Instant::now() + level.lifetime(),
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, ToastLevel::Info);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, ToastLevel::Warning);
    }

    /// Drop expired toasts. Returns true if any were removed.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    #[cfg(test)]
    pub fn messages(&self) -> impl Iterator<Item = (&str, ToastLevel)> {
        self.toasts.iter().map(|t| (t.message.as_str(), t.level))
    }

    /// Newest toast on top, stacked downward from the top-right corner.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let bottom = area.y + area.height;
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            if y >= bottom {
                break;
            }
            let text = format!(" {} {} ", toast.level.icon(), toast.message);
            let w = (text.chars().count() as u16).min(max_width);
            let rect = Rect {
                x: area.x + area.width.saturating_sub(w + 1),
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text, toast.level.style()))),
                rect,
            );
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_replace() {
        let mut t = ToastManager::new();
        t.warning("prices unavailable");
        t.warning("prices unavailable");
        t.info("loaded");
        let msgs: Vec<_> = t.messages().collect();
        assert_eq!(
            msgs,
            vec![
                ("prices unavailable", ToastLevel::Warning),
                ("loaded", ToastLevel::Info)
            ]
        );
    }

    #[test]
    fn test_queue_is_capped() {
        let mut t = ToastManager::new();
        for i in 0..20 {
            t.push(format!("feed error {}", i), ToastLevel::Warning);
        }
        assert_eq!(t.messages().count(), 8);
        assert!(!t.tick());
    }
}
