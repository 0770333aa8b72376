//! CallList component — sidebar of earnings calls with a search filter.
//!
//! Moving the cursor only highlights a row; Enter (or a click) selects the
//! company. Filtering never changes the selection.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use advisor_proto::model::EarningsCallEntry;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{status_color, C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::pane_chrome,
        scrollable_list::ScrollableList,
    },
};

pub struct CallList {
    list: ScrollableList<EarningsCallEntry>,
    filter_input: FilterInput,
}

impl CallList {
    pub fn new(state: &AppState) -> Self {
        let mut list = ScrollableList::new(call_matches);
        list.set_items(state.selection.list_entries().to_vec());
        if let Some(idx) = state.selection.position(state.company()) {
            list.select_original(idx);
        }
        Self {
            list,
            filter_input: FilterInput::new("search companies…"),
        }
    }

    pub fn cursor_company(&self) -> Option<&str> {
        self.list.cursor_item().map(|e| e.company.as_str())
    }

    fn select_cursor(&self) -> Vec<Action> {
        match self.list.cursor_item() {
            Some(entry) => vec![Action::SelectCompany(entry.company.clone())],
            None => vec![],
        }
    }

    fn render_row(entry: &EarningsCallEntry, is_cursor: bool, is_selected: bool, width: usize) -> ListItem<'static> {
        let marker = if is_selected { "▶ " } else { "  " };
        let name_style = match (is_selected, is_cursor) {
            (true, _) => Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            (false, false) => Style::default().fg(C_SECONDARY),
        };
        let status = entry.status.label();
        let name_w = width.saturating_sub(marker.width() + status.width() + 1);

        let first = Line::from(vec![
            Span::styled(marker, Style::default().fg(C_ACCENT)),
            Span::styled(pad_to_width(&entry.company, name_w), name_style),
            Span::raw(" "),
            Span::styled(status, Style::default().fg(status_color(entry.status))),
        ]);
        let second = Line::from(vec![
            Span::raw("  "),
            Span::styled(entry.scheduled_time.clone(), Style::default().fg(C_MUTED)),
        ]);

        let item = ListItem::new(vec![first, second]);
        if is_cursor {
            item.style(Style::default().bg(C_SELECTION_BG))
        } else {
            item
        }
    }
}

/// Whitespace-separated terms, all of which must appear in the company name
/// or status, case-insensitively.
pub fn call_matches(entry: &EarningsCallEntry, query: &str) -> bool {
    let text = format!("{} {}", entry.company, entry.status.label()).to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .all(|term| text.contains(term))
}

/// Truncate with an ellipsis or pad with spaces to exactly `width` columns.
fn pad_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + ch.to_string().width() + 1 > width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    let pad = width.saturating_sub(out.width());
    out.push_str(&" ".repeat(pad));
    out
}

impl Component for CallList {
    fn id(&self) -> ComponentId {
        ComponentId::CallList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => {
                    self.list.set_filter(&q);
                    vec![]
                }
                FilterAction::Confirmed => {
                    let mut actions = vec![Action::CloseFilter];
                    actions.extend(self.select_cursor());
                    actions
                }
                FilterAction::Cancelled => {
                    self.list.set_filter("");
                    vec![Action::CloseFilter]
                }
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.select_cursor(),
            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                // Two rows per entry, one border row above.
                if event.row <= area.y {
                    return vec![];
                }
                let row = (event.row - area.y - 1) as usize / 2;
                if let Some(entry) = self.list.click(row) {
                    return vec![Action::SelectCompany(entry.company.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::SelectCompany(company) = action {
            if let Some(idx) = state.selection.position(company) {
                self.list.select_original(idx);
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("earnings calls", None, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let filter_h = u16::from(self.filter_input.is_active() || !self.list.filter().is_empty());
        let list_area = Rect {
            height: inner.height.saturating_sub(filter_h),
            ..inner
        };

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no calls match", Style::default().fg(C_MUTED))),
                list_area,
            );
        } else {
            let rows = (list_area.height / 2) as usize;
            self.list.ensure_visible(rows);
            let selected = state.company();
            let width = list_area.width as usize;
            let items: Vec<ListItem> = self
                .list
                .visible(rows)
                .map(|(is_cursor, entry)| {
                    Self::render_row(entry, is_cursor, entry.company == selected, width)
                })
                .collect();
            frame.render_widget(List::new(items), list_area);
        }

        if filter_h > 0 {
            let filter_area = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.filter_input.draw(frame, filter_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_proto::model::CallStatus;

    #[test]
    fn test_call_matches_terms() {
        let entry = EarningsCallEntry::new("Global Industries", "3:30:00 PM", CallStatus::Ongoing);
        assert!(call_matches(&entry, "glob"));
        assert!(call_matches(&entry, "IND ongoing"));
        assert!(!call_matches(&entry, "global past"));
        assert!(call_matches(&entry, "   "));
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("Tech", 6), "Tech  ");
        assert_eq!(pad_to_width("Innovation Labs", 8), "Innovat…");
        assert_eq!(pad_to_width("Innovation Labs", 8).width(), 8);
    }
}
