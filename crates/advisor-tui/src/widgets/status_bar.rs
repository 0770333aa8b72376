//! Status bar — bottom line with the input mode and the keys that apply to it.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_FILTER, C_MODE_NORMAL, C_MODE_OVERLAY, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
}

/// What the keys bar should advertise for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysContext {
    Normal { market_impact: bool, transport: bool },
    Filter,
    Overlay,
}

impl KeysContext {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal { .. } => "NORMAL",
            Self::Filter => "FILTER",
            Self::Overlay => "OVERLAY",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal { .. } => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
            Self::Overlay => C_MODE_OVERLAY,
        }
    }

    fn keys(self) -> String {
        match self {
            Self::Normal {
                market_impact,
                transport,
            } => {
                let mut keys = String::from(" ↑↓/jk move  Enter select  / filter  1-4/Tab panel");
                if market_impact {
                    keys.push_str("  [ ] s/m/l timeframe");
                }
                keys.push_str("  a audio");
                if transport {
                    keys.push_str("  Space play  -/+ vol  ,/. seek");
                }
                keys.push_str("  t transcript  u summary  ? help  q quit");
                keys
            }
            Self::Filter => " type to filter  ↑↓ move  Enter keep  Esc clear+close".to_string(),
            Self::Overlay => " ↑↓/jk scroll  PgUp/PgDn page  Esc/q/x close".to_string(),
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, ctx: KeysContext) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", ctx.label()),
            Style::default().fg(ctx.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(ctx.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_follow_context() {
        let plain = KeysContext::Normal {
            market_impact: false,
            transport: false,
        }
        .keys();
        assert!(!plain.contains("timeframe"));
        assert!(!plain.contains("Space play"));

        let full = KeysContext::Normal {
            market_impact: true,
            transport: true,
        }
        .keys();
        assert!(full.contains("timeframe"));
        assert!(full.contains("Space play"));

        assert!(KeysContext::Overlay.keys().contains("close"));
    }
}
