//! TransportPanel component — "Listen to Call" player strip.
//!
//! Drawn only while the transport is visible. Keys are routed by the App;
//! this component handles clicks on the play icon and the seek bar.

use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_POSITIVE, C_PRIMARY, C_SECONDARY},
    transport::{play_button_icon, UNAVAILABLE_NOTICE},
    widgets::{
        pane_chrome::{contains, pane_chrome},
        progress_bar::{draw_progress, seek_target, smooth_bar},
    },
};

const VOLUME_BAR_WIDTH: usize = 10;

pub struct TransportPanel {
    play_rect: Rect,
    bar_rect: Rect,
}

impl TransportPanel {
    pub fn new() -> Self {
        Self {
            play_rect: Rect::default(),
            bar_rect: Rect::default(),
        }
    }

    /// Rows the panel needs, borders included.
    pub fn height(state: &AppState) -> u16 {
        if state.transport.has_engine() {
            4
        } else {
            5
        }
    }
}

impl Component for TransportPanel {
    fn id(&self) -> ComponentId {
        ComponentId::TransportPanel
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        if contains(self.play_rect, event.column, event.row) {
            return vec![Action::TogglePlay];
        }
        if contains(self.bar_rect, event.column, event.row) {
            if let Some(pos) = seek_target(self.bar_rect, event.column, state.transport.duration_secs()) {
                return vec![Action::SeekTo(pos)];
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("Listen to Call", Some('a'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.play_rect = Rect::default();
        self.bar_rect = Rect::default();
        if inner.height == 0 || inner.width < 4 {
            return;
        }

        let t = &state.transport;
        let icon = format!(" {} ", play_button_icon(t.is_playing()));
        let mut spans = vec![
            Span::styled(
                icon,
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if t.is_playing() { "playing  " } else { "paused   " },
                Style::default().fg(C_SECONDARY),
            ),
            Span::styled("vol ", Style::default().fg(C_MUTED)),
            Span::styled(
                smooth_bar(f64::from(t.volume()), VOLUME_BAR_WIDTH),
                Style::default().fg(C_POSITIVE),
            ),
            Span::styled(
                format!(" {:>3.0}%", t.volume() * 100.0),
                Style::default().fg(C_PRIMARY),
            ),
        ];
        if let Some(resource) = t.resource() {
            spans.push(Span::styled(format!("  {}", resource), Style::default().fg(C_MUTED)));
        }
        let controls = Line::from(spans);
        let row = Rect { height: 1, ..inner };
        frame.render_widget(Paragraph::new(controls), row);
        self.play_rect = Rect {
            width: 3.min(row.width),
            ..row
        };

        if inner.height >= 2 {
            let bar_row = Rect {
                x: inner.x + 1,
                y: inner.y + 1,
                width: inner.width.saturating_sub(2),
                height: 1,
            };
            self.bar_rect = draw_progress(frame, bar_row, t.position_secs(), t.duration_secs());
        }

        if !t.has_engine() && inner.height >= 3 {
            let notice = Rect {
                y: inner.y + 2,
                height: 1,
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", UNAVAILABLE_NOTICE),
                    Style::default().fg(C_MUTED),
                )),
                notice,
            );
        }
    }
}
