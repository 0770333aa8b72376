//! PriceChart component — line chart of the selected company's price history.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use advisor_proto::model::PriceSeries;

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    feed::SlotHint,
    theme::{C_CHART_AXIS, C_CHART_LINE, C_MUTED, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, slot_badge},
};

pub struct PriceChart {
    points: Vec<(f64, f64)>,
}

impl PriceChart {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }
}

/// Y bounds with a little headroom so the line never sits on the border.
fn y_bounds(series: &PriceSeries) -> [f64; 2] {
    match series.bounds() {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.1;
            [lo - pad, hi + pad]
        }
        Some((lo, _)) => [lo - 1.0, lo + 1.0],
        None => [0.0, 1.0],
    }
}

/// First, middle and last time labels.
fn x_labels(series: &PriceSeries) -> Vec<String> {
    let pts = &series.points;
    match pts.len() {
        0 => Vec::new(),
        1 => vec![pts[0].time_label.clone()],
        n => vec![
            pts[0].time_label.clone(),
            pts[n / 2].time_label.clone(),
            pts[n - 1].time_label.clone(),
        ],
    }
}

impl Component for PriceChart {
    fn id(&self) -> ComponentId {
        ComponentId::PriceChart
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let slot = &state.feeds.prices;
        let block = pane_chrome("price history", None, focused, slot_badge(slot.hint()));

        let Some(series) = slot.value().filter(|s| !s.is_empty()) else {
            let msg = match slot.error() {
                Some(e) => format!("  price history unavailable: {}", e),
                None if slot.hint() == SlotHint::TimedOut => "  still waiting for prices…".to_string(),
                None => "  loading…".to_string(),
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))).block(block),
                area,
            );
            return;
        };

        self.points.clear();
        self.points
            .extend(series.points.iter().enumerate().map(|(i, p)| (i as f64, p.price)));

        let [lo, hi] = y_bounds(series);
        let axis_style = Style::default().fg(C_CHART_AXIS);
        let label_style = Style::default().fg(C_SECONDARY);

        let x_axis = Axis::default()
            .style(axis_style)
            .bounds([0.0, (series.len().saturating_sub(1)).max(1) as f64])
            .labels(x_labels(series).into_iter().map(|l| Span::styled(l, label_style)));
        let y_axis = Axis::default()
            .style(axis_style)
            .bounds([lo, hi])
            .labels([
                Span::styled(format!("{:.0}", lo), label_style),
                Span::styled(format!("{:.0}", hi), label_style),
            ]);

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_CHART_LINE))
            .data(&self.points);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis);
        frame.render_widget(chart, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_proto::feed::mock_prices;

    #[test]
    fn test_bounds_have_headroom() {
        let series = mock_prices("Tech Corp", 180.0, 10.0);
        let (lo, hi) = series.bounds().unwrap();
        let [blo, bhi] = y_bounds(&series);
        assert!(blo < lo && bhi > hi);
    }

    #[test]
    fn test_flat_series_bounds() {
        let series = mock_prices("Tech Corp", 180.0, 0.0);
        assert_eq!(y_bounds(&series), [179.0, 181.0]);
    }

    #[test]
    fn test_x_labels() {
        let series = mock_prices("Tech Corp", 180.0, 10.0);
        assert_eq!(x_labels(&series), vec!["0:00", "12:00", "23:00"]);
        assert!(x_labels(&PriceSeries::default()).is_empty());
    }
}
