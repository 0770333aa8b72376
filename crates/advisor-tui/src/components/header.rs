//! Header component — 2-row top bar.
//!
//! Row 1: company, call status and time, last price with change since open.
//! Row 2: active panel/timeframe, transport summary, last update time.
//!
//! Not focusable.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use advisor_proto::model::PriceSeries;

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    feed::SlotHint,
    theme::{status_color, style_tone, C_ACCENT, C_CAUTION, C_MUTED, C_PRIMARY, C_SECONDARY},
    transport::{format_elapsed, play_button_icon},
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let mut lines = vec![build_row1(state)];
        if area.height >= 2 {
            lines.push(build_row2(state));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn build_row1(state: &AppState) -> Line<'static> {
    let entry = state.entry();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", entry.company),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            entry.status.label().to_string(),
            Style::default().fg(status_color(entry.status)),
        ),
        Span::styled(format!(" · {}", entry.scheduled_time), Style::default().fg(C_MUTED)),
        Span::raw("   "),
    ];
    spans.extend(price_spans(state));
    Line::from(spans)
}

fn price_spans(state: &AppState) -> Vec<Span<'static>> {
    let slot = &state.feeds.prices;
    match slot.hint() {
        SlotHint::Ready => match slot.value().and_then(price_summary) {
            Some((last, change, pct)) => vec![
                Span::styled(format!("${:.2} ", last), Style::default().fg(C_PRIMARY)),
                Span::styled(
                    format!("{} {:+.2} ({:+.2}%)", if change >= 0.0 { "▲" } else { "▼" }, change, pct),
                    style_tone(Some(change >= 0.0)),
                ),
            ],
            None => vec![Span::styled("no price data", Style::default().fg(C_MUTED))],
        },
        SlotHint::Loading => vec![Span::styled("loading prices…", Style::default().fg(C_MUTED))],
        SlotHint::TimedOut => vec![Span::styled("prices timed out", Style::default().fg(C_CAUTION))],
        SlotHint::Failed => vec![Span::styled("prices unavailable", Style::default().fg(C_CAUTION))],
    }
}

/// `(last, change, change %)` for a non-empty series.
fn price_summary(series: &PriceSeries) -> Option<(f64, f64, f64)> {
    let last = series.last()?.price;
    Some((last, series.change()?, series.change_pct()?))
}

fn build_row2(state: &AppState) -> Line<'static> {
    let view = state.view();
    let mut panel = format!(" {}", view.panel.label());
    if let Some(tf) = view.timeframe {
        panel.push_str(&format!(" · {}", tf.label()));
    }
    let mut spans = vec![Span::styled(panel, Style::default().fg(C_ACCENT))];

    let t = &state.transport;
    let ts = t.state();
    if ts.is_playing || t.visible() {
        spans.push(Span::styled(
            format!(
                "   {} {} / {}  vol {:.0}%",
                play_button_icon(ts.is_playing),
                format_elapsed(ts.position_secs),
                format_elapsed(t.duration_secs()),
                ts.volume * 100.0
            ),
            Style::default().fg(C_SECONDARY),
        ));
    }

    if let Some(ts) = state.feeds.last_updated() {
        spans.push(Span::styled(
            format!("   updated {}", ts.format("%H:%M:%S")),
            Style::default().fg(C_MUTED),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_proto::model::PricePoint;

    #[test]
    fn test_price_summary() {
        let series = PriceSeries::new(vec![
            PricePoint {
                time_label: "0:00".into(),
                price: 180.0,
            },
            PricePoint {
                time_label: "1:00".into(),
                price: 189.0,
            },
        ]);
        let (last, change, pct) = price_summary(&series).unwrap();
        assert_eq!(last, 189.0);
        assert_eq!(change, 9.0);
        assert!((pct - 5.0).abs() < 1e-9);
        assert!(price_summary(&PriceSeries::default()).is_none());
    }
}
