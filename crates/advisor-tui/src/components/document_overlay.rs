//! DocumentOverlay component — modal popup for the call transcript or the
//! call summary.
//!
//! One instance per [`OverlayKind`]. While open and topmost it receives
//! every key: Esc/q/x close it, scroll keys move its content, everything
//! else is swallowed.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use advisor_proto::model::{CallDocuments, CallSummary, TranscriptSection};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::analysis_panel::{bullet, heading, metric_line},
    feed::SlotHint,
    overlay::OverlayKind,
    theme::{C_ACCENT, C_CAUTION, C_MUTED, C_OVERLAY_BG, C_PANEL_BORDER_FOCUSED, C_PRIMARY},
    widgets::pane_chrome::centered_rect,
};

const PAGE: u16 = 10;

pub struct DocumentOverlay {
    kind: OverlayKind,
    scroll: u16,
}

impl DocumentOverlay {
    pub fn new(kind: OverlayKind) -> Self {
        Self { kind, scroll: 0 }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn popup(&self, area: Rect) -> Rect {
        match self.kind {
            OverlayKind::Transcript => centered_rect(80, area.height.saturating_sub(4), area),
            OverlayKind::Summary => centered_rect(60, area.height.saturating_mul(2) / 3, area),
        }
    }

    fn title(&self, docs: Option<&CallDocuments>) -> String {
        match (self.kind, docs) {
            (OverlayKind::Transcript, Some(d)) => d.transcript_title.clone(),
            (OverlayKind::Summary, Some(d)) => d.summary.title.clone(),
            (kind, None) => kind.label().to_string(),
        }
    }
}

fn transcript_lines(sections: &[TranscriptSection]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in sections {
        lines.push(Line::from(Span::styled(
            format!(" {}", section.heading),
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )));
        for line in &section.lines {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {}: ", line.speaker),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ),
                Span::styled(line.text.clone(), Style::default().fg(C_PRIMARY)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn summary_lines(summary: &CallSummary) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Key Highlights")];
    lines.extend(summary.highlights.iter().map(|h| bullet(h)));
    lines.push(Line::from(""));
    lines.push(heading("Financial Performance"));
    lines.extend(summary.performance.iter().map(metric_line));
    lines.push(Line::from(""));
    lines.push(heading("Strategic Initiatives"));
    lines.extend(summary.initiatives.iter().map(|i| bullet(i)));
    lines
}

impl Component for DocumentOverlay {
    fn id(&self) -> ComponentId {
        match self.kind {
            OverlayKind::Transcript => ComponentId::Transcript,
            OverlayKind::Summary => ComponentId::Summary,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => {
                return vec![Action::CloseOverlay(self.kind)];
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        // Consume all keys while open
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if *action == Action::OpenOverlay(self.kind) {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !state.overlays.is_open(self.kind) {
            return;
        }

        let popup = self.popup(area);
        let slot = &state.feeds.documents;
        let docs = slot.value();

        let lines = match docs {
            Some(d) => match self.kind {
                OverlayKind::Transcript => transcript_lines(&d.transcript),
                OverlayKind::Summary => summary_lines(&d.summary),
            },
            None => {
                let (text, color) = match slot.hint() {
                    SlotHint::Failed => (
                        format!(" {} unavailable: {}", self.kind.label(), slot.error().unwrap_or("unknown error")),
                        C_CAUTION,
                    ),
                    SlotHint::TimedOut => (" still waiting for the call documents…".to_string(), C_CAUTION),
                    SlotHint::Loading | SlotHint::Ready => (" loading…".to_string(), C_MUTED),
                };
                vec![Line::from(Span::styled(text, Style::default().fg(color)))]
            }
        };
        self.scroll = self.scroll.min((lines.len() as u16).saturating_sub(1));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
            .title(Line::from(Span::styled(
                format!(" {} · {} ", self.title(docs), state.company()),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )))
            .title_bottom(
                Line::from(Span::styled(" esc/q/x close ", Style::default().fg(C_MUTED)))
                    .right_aligned(),
            )
            .style(Style::default().bg(C_OVERLAY_BG));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_close_keys_target_own_kind() {
        let mut overlay = DocumentOverlay::new(OverlayKind::Summary);
        let state = crate::app::tests::test_state();
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('x')] {
            assert_eq!(
                overlay.handle_key(key(code), &state),
                vec![Action::CloseOverlay(OverlayKind::Summary)]
            );
        }
    }

    #[test]
    fn test_other_keys_swallowed() {
        let mut overlay = DocumentOverlay::new(OverlayKind::Transcript);
        let state = crate::app::tests::test_state();
        for code in [KeyCode::Char('1'), KeyCode::Char('a'), KeyCode::Enter, KeyCode::Tab] {
            assert!(overlay.handle_key(key(code), &state).is_empty());
        }
        overlay.handle_key(key(KeyCode::PageDown), &state);
        assert_eq!(overlay.scroll(), PAGE);
        overlay.on_action(&Action::OpenOverlay(OverlayKind::Transcript), &state);
        assert_eq!(overlay.scroll(), 0);
    }

    #[test]
    fn test_summary_sections() {
        let docs = advisor_proto::feed::mock_documents("Tech Corp");
        let lines = summary_lines(&docs.summary);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text[0], " Key Highlights");
        assert!(text.iter().any(|l| l == " Strategic Initiatives"));
    }
}
