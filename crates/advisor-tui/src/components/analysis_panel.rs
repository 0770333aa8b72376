//! AnalysisPanel component — category tabs, timeframe chips and the one
//! active analytics panel.
//!
//! The body is chosen by a single `match` on the loaded bundle. The bundle is
//! only exposed by `AppState::active_analytics` when it belongs to the active
//! category, so a late bundle for another tab is never drawn.

use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use advisor_proto::model::{
    AnalysisCategory, AnalyticsBundle, FinancialReport, InvestorReport, LongTermFigures,
    MarketImpactReport, MediumTermFigures, Metric, SentimentReport, ShortTermFigures,
    Timeframe, TimeframeFigures,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    feed::{FeedSlot, SlotHint},
    theme::{
        severity_color, style_heading, style_muted, style_secondary, style_tone, C_ACCENT,
        C_BG, C_CAUTION, C_MUTED, C_NEGATIVE, C_NUMBER_HINT, C_POSITIVE, C_PRIMARY,
        C_SECONDARY,
    },
    widgets::{
        pane_chrome::{pane_chrome, slot_badge},
        progress_bar::smooth_bar,
    },
};

const GAUGE_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 24;

/// Clickable column range on one row.
#[derive(Debug, Clone, Copy)]
struct Hit<T> {
    row: u16,
    x0: u16,
    x1: u16,
    target: T,
}

impl<T: Copy> Hit<T> {
    fn matches(&self, col: u16, row: u16) -> Option<T> {
        (row == self.row && col >= self.x0 && col < self.x1).then_some(self.target)
    }
}

pub struct AnalysisPanel {
    scroll: u16,
    tab_hits: Vec<Hit<AnalysisCategory>>,
    chip_hits: Vec<Hit<Timeframe>>,
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            tab_hits: Vec::new(),
            chip_hits: Vec::new(),
        }
    }

    /// Lay out one row of selectable labels starting at `area.x`, recording
    /// where each landed.
    fn selector_row<T: Copy + PartialEq>(
        area: Rect,
        items: &[(T, String)],
        active: T,
        hits: &mut Vec<Hit<T>>,
    ) -> Line<'static> {
        let mut spans = Vec::new();
        let mut x = area.x;
        let end = area.x + area.width;
        for (target, text) in items {
            let w = text.chars().count() as u16;
            if x + w <= end {
                hits.push(Hit {
                    row: area.y,
                    x0: x,
                    x1: x + w,
                    target: *target,
                });
            }
            let style = if *target == active {
                Style::default()
                    .fg(C_BG)
                    .bg(C_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            spans.push(Span::styled(text.clone(), style));
            spans.push(Span::raw(" "));
            x = x.saturating_add(w + 1);
        }
        Line::from(spans)
    }
}

impl Component for AnalysisPanel {
    fn id(&self) -> ComponentId {
        ComponentId::AnalysisPanel
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(cat) = self
                    .tab_hits
                    .iter()
                    .find_map(|h| h.matches(event.column, event.row))
                {
                    return vec![Action::SetCategory(cat)];
                }
                if let Some(tf) = self
                    .chip_hits
                    .iter()
                    .find_map(|h| h.matches(event.column, event.row))
                {
                    return vec![Action::SetTimeframe(tf)];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SetCategory(_)
            | Action::NextCategory
            | Action::PrevCategory
            | Action::SetTimeframe(_)
            | Action::NextTimeframe
            | Action::PrevTimeframe
            | Action::SelectCompany(_) => self.scroll = 0,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome(
            "analysis",
            None,
            focused,
            slot_badge(state.feeds.analytics.hint()),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        self.tab_hits.clear();
        self.chip_hits.clear();

        let active = state.category.active();
        let tabs: Vec<(AnalysisCategory, String)> = AnalysisCategory::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, format!(" {} {} ", i + 1, c.label())))
            .collect();
        let tab_row = Rect { height: 1, ..inner };
        let line = Self::selector_row(tab_row, &tabs, active, &mut self.tab_hits);
        frame.render_widget(Paragraph::new(line), tab_row);

        let mut body_y = inner.y + 1;
        if active == AnalysisCategory::MarketImpact && inner.height > 2 {
            let chips: Vec<(Timeframe, String)> = Timeframe::ALL
                .iter()
                .map(|tf| (*tf, format!(" {} ", tf.label())))
                .collect();
            let chip_row = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            let line = Self::selector_row(
                chip_row,
                &chips,
                state.timeframe.active(),
                &mut self.chip_hits,
            );
            frame.render_widget(Paragraph::new(line), chip_row);
            body_y += 1;
        }

        let body = Rect {
            y: body_y + 1,
            height: (inner.y + inner.height).saturating_sub(body_y + 1),
            ..inner
        };
        if body.height == 0 {
            return;
        }

        // Scroll range counts wrapped rows, not logical lines.
        let paragraph = Paragraph::new(body_lines(state)).wrap(Wrap { trim: false });
        let rows = u16::try_from(paragraph.line_count(body.width)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.min(rows.saturating_sub(body.height));
        frame.render_widget(paragraph.scroll((self.scroll, 0)), body);
    }
}

// ── Body composition ──────────────────────────────────────────────────────────

fn body_lines(state: &AppState) -> Vec<Line<'static>> {
    match state.active_analytics() {
        Some(AnalyticsBundle::Sentiment(r)) => sentiment_lines(r),
        Some(AnalyticsBundle::Financial(r)) => financial_lines(r),
        Some(AnalyticsBundle::Investor(r)) => investor_lines(r),
        Some(AnalyticsBundle::MarketImpact(r)) => market_impact_lines(r, state.timeframe.active()),
        None => placeholder_lines(state.category.active(), &state.feeds.analytics),
    }
}

fn placeholder_lines(category: AnalysisCategory, slot: &FeedSlot<AnalyticsBundle>) -> Vec<Line<'static>> {
    let (text, color) = match slot.hint() {
        SlotHint::Failed => (
            format!(" analytics unavailable: {}", slot.error().unwrap_or("unknown error")),
            C_CAUTION,
        ),
        SlotHint::TimedOut => (
            format!(" {} is taking longer than expected…", category.label()),
            C_CAUTION,
        ),
        SlotHint::Loading | SlotHint::Ready => {
            (format!(" loading {}…", category.label().to_lowercase()), C_MUTED)
        }
    };
    vec![Line::from(Span::styled(text, Style::default().fg(color)))]
}

pub(crate) fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!(" {}", text), style_heading()))
}

fn kv(label: &str, value: impl Into<String>, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("   {:<w$}", label, w = LABEL_WIDTH), style_secondary()),
        Span::styled(value.into(), style),
    ])
}

pub(crate) fn metric_line(m: &Metric) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("   {:<w$}", m.label, w = LABEL_WIDTH), style_secondary()),
        Span::styled(m.value.clone(), style_tone(m.positive).add_modifier(Modifier::BOLD)),
    ];
    if let Some(delta) = &m.delta {
        let arrow = match m.positive {
            Some(true) => "↑ ",
            Some(false) => "↓ ",
            None => "",
        };
        spans.push(Span::styled(
            format!("  {}{}", arrow, delta),
            style_tone(m.positive),
        ));
    }
    Line::from(spans)
}

fn gauge(label: &str, pct: u8) -> Line<'static> {
    let pct = pct.min(100);
    Line::from(vec![
        Span::styled(format!("   {:<w$}", label, w = LABEL_WIDTH), style_secondary()),
        Span::styled(
            smooth_bar(f64::from(pct) / 100.0, GAUGE_WIDTH),
            Style::default().fg(C_ACCENT),
        ),
        Span::styled(format!(" {}%", pct), Style::default().fg(C_PRIMARY)),
    ])
}

pub(crate) fn bullet(text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("   • ", Style::default().fg(C_NUMBER_HINT)),
        Span::styled(text.to_string(), Style::default().fg(C_PRIMARY)),
    ])
}

fn sentiment_lines(r: &SentimentReport) -> Vec<Line<'static>> {
    vec![
        heading("Executive Tone"),
        kv(
            "tone score",
            format!("{:+}%", r.executive_score),
            style_tone(Some(r.executive_score >= 0)).add_modifier(Modifier::BOLD),
        ),
        kv("", r.executive_note.clone(), style_muted()),
        Line::from(""),
        heading("Key Word Analysis"),
        kv("positive words", r.positive_words.to_string(), Style::default().fg(C_POSITIVE)),
        kv("negative words", r.negative_words.to_string(), Style::default().fg(C_NEGATIVE)),
        kv(
            "hesitation markers",
            r.hesitation_markers.to_string(),
            Style::default().fg(C_CAUTION),
        ),
        Line::from(""),
        heading("Industry Comparison"),
        kv("industry rank", r.industry_rank.clone(), Style::default().fg(C_PRIMARY)),
        kv("vs competitors", r.competitor_note.clone(), Style::default().fg(C_PRIMARY)),
    ]
}

fn financial_lines(r: &FinancialReport) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Key Metrics")];
    lines.extend(r.headline.iter().map(metric_line));
    lines.push(Line::from(""));
    lines.push(heading("Forward Guidance"));
    lines.extend(r.guidance.iter().map(metric_line));
    lines.push(Line::from(""));
    lines.push(heading("Growth Signals"));
    lines.extend(r.growth_signals.iter().map(|s| bullet(s)));
    lines.push(Line::from(""));
    lines.push(heading("Risk Factors"));
    for risk in &r.risks {
        let color = severity_color(risk.severity);
        lines.push(Line::from(vec![
            Span::styled("   ● ", Style::default().fg(color)),
            Span::styled(risk.text.clone(), Style::default().fg(C_PRIMARY)),
            Span::styled(
                format!("  {:?}", risk.severity).to_lowercase(),
                Style::default().fg(color),
            ),
        ]));
    }
    lines
}

fn investor_lines(r: &InvestorReport) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Q&A Analysis"),
        gauge("response quality", r.response_quality),
        kv(
            "questions addressed",
            format!("{}/{}", r.questions_addressed, r.questions_total),
            Style::default().fg(C_PRIMARY),
        ),
        kv("follow-ups", r.follow_ups.to_string(), Style::default().fg(C_PRIMARY)),
        Line::from(""),
        heading("Past Call Comparison"),
    ];
    lines.extend(r.past_call_comparison.iter().map(metric_line));
    lines.extend([
        Line::from(""),
        heading("Social & News"),
        kv(
            "positive mentions",
            r.positive_mentions.to_string(),
            Style::default().fg(C_POSITIVE),
        ),
        kv(
            "negative mentions",
            r.negative_mentions.to_string(),
            Style::default().fg(C_NEGATIVE),
        ),
        gauge("positive news", r.news_positive_pct),
        Line::from(""),
        heading("Market Reaction"),
        kv(
            "price after call",
            r.price_move_after_call.clone(),
            signed_tone(&r.price_move_after_call),
        ),
        kv("volume", r.volume_increase.clone(), signed_tone(&r.volume_increase)),
        kv("volatility", r.volatility.clone(), Style::default().fg(C_CAUTION)),
    ]);
    lines
}

fn market_impact_lines(r: &MarketImpactReport, tf: Timeframe) -> Vec<Line<'static>> {
    match r.for_timeframe(tf) {
        TimeframeFigures::Short(f) => short_term_lines(f),
        TimeframeFigures::Medium(f) => medium_term_lines(f),
        TimeframeFigures::Long(f) => long_term_lines(f),
    }
}

fn short_term_lines(f: &ShortTermFigures) -> Vec<Line<'static>> {
    vec![
        heading("Price Action"),
        kv(
            "intraday range",
            format!("{}  ({})", f.intraday_range, f.spread),
            Style::default().fg(C_PRIMARY),
        ),
        kv("volume", f.volume.clone(), Style::default().fg(C_PRIMARY)),
        kv("vwap", f.vwap.clone(), Style::default().fg(C_PRIMARY)),
        Line::from(""),
        heading("Options Activity"),
        metric_line(&f.call_volume),
        metric_line(&f.put_volume),
        kv("put/call ratio", f.put_call_ratio.clone(), Style::default().fg(C_PRIMARY)),
    ]
}

fn medium_term_lines(f: &MediumTermFigures) -> Vec<Line<'static>> {
    vec![
        heading("Analyst Ratings"),
        kv("buy", f.buy.to_string(), Style::default().fg(C_POSITIVE)),
        kv("hold", f.hold.to_string(), Style::default().fg(C_CAUTION)),
        kv("sell", f.sell.to_string(), Style::default().fg(C_NEGATIVE)),
        kv("price target", f.price_target.clone(), Style::default().fg(C_PRIMARY)),
        Line::from(""),
        heading("Sector Comparison"),
        kv(
            "relative performance",
            f.relative_performance.clone(),
            signed_tone(&f.relative_performance),
        ),
        kv("sector rank", f.sector_rank.clone(), Style::default().fg(C_PRIMARY)),
        kv("beta", f.beta.clone(), Style::default().fg(C_PRIMARY)),
    ]
}

fn long_term_lines(f: &LongTermFigures) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Management Credibility"),
        gauge("promise delivery", f.promise_delivery),
        kv("guidance accuracy", f.guidance_accuracy.clone(), Style::default().fg(C_PRIMARY)),
        kv("ceo confidence", f.ceo_confidence.clone(), Style::default().fg(C_PRIMARY)),
        Line::from(""),
        heading("Phrase Impact"),
    ];
    lines.extend(f.phrase_impacts.iter().map(metric_line));
    lines
}

/// Colour a "+4.2%" / "-0.8%" style figure by its sign.
fn signed_tone(value: &str) -> Style {
    match value.trim_start().chars().next() {
        Some('+') => style_tone(Some(true)),
        Some('-') => style_tone(Some(false)),
        _ => Style::default().fg(C_PRIMARY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_state;
    use advisor_proto::feed::mock_analytics;
    use ratatui::{backend::TestBackend, buffer::Buffer, crossterm::event::KeyModifiers, Terminal};

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_market_impact_follows_timeframe() {
        let report = mock_analytics().market_impact;
        let short = text(&market_impact_lines(&report, Timeframe::Short));
        let long = text(&market_impact_lines(&report, Timeframe::Long));
        assert!(short.contains("Options Activity"));
        assert!(!short.contains("Management Credibility"));
        assert!(long.contains("promise delivery"));
        assert!(long.contains("85%"));
    }

    #[test]
    fn test_failed_slot_placeholder() {
        let mut slot: FeedSlot<AnalyticsBundle> = FeedSlot::default();
        let ticket = crate::feed::FeedTicket {
            seq: 1,
            company: "Tech Corp".into(),
            category: Some(AnalysisCategory::Financial),
        };
        slot.request(ticket.clone());
        assert!(slot.accept(&ticket, "Tech Corp", Err("connection refused".into())));
        let lines = placeholder_lines(AnalysisCategory::Financial, &slot);
        assert_eq!(text(&lines), " analytics unavailable: connection refused");
    }

    #[test]
    fn test_signed_tone() {
        assert_eq!(signed_tone("+4.2%"), style_tone(Some(true)));
        assert_eq!(signed_tone("-0.8%"), style_tone(Some(false)));
        assert_eq!(signed_tone("High"), Style::default().fg(C_PRIMARY));
    }

    fn scroll_down(panel: &mut AnalysisPanel, state: &AppState) {
        let event = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        panel.handle_mouse(event, Rect::default(), state);
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_wrapped_body_scrolls_to_last_row() {
        let mut state = test_state();
        state.category.set_category(AnalysisCategory::Financial);
        state
            .feeds
            .analytics
            .fill(mock_analytics().bundle(AnalysisCategory::Financial));

        let mut terminal = Terminal::new(TestBackend::new(36, 10)).unwrap();
        let mut panel = AnalysisPanel::new();
        for _ in 0..200 {
            scroll_down(&mut panel, &state);
            terminal
                .draw(|f| panel.draw(f, f.area(), false, &state))
                .unwrap();
        }

        let buf = terminal.backend().buffer().clone();
        // Row 8 is the last body row above the bottom border.
        let last = row_text(&buf, 8);
        let last = last.trim_end_matches(|c: char| c == '│' || c.is_whitespace());
        assert!(last.ends_with("low"), "last body row was {:?}", last);
        let all: String = (0..10).map(|y| row_text(&buf, y)).collect();
        assert!(!all.contains("Key Metrics"));
    }

    #[test]
    fn test_hit_matches() {
        let hit = Hit {
            row: 3,
            x0: 10,
            x1: 15,
            target: Timeframe::Long,
        };
        assert_eq!(hit.matches(10, 3), Some(Timeframe::Long));
        assert_eq!(hit.matches(15, 3), None);
        assert_eq!(hit.matches(12, 4), None);
    }
}
