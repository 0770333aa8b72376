//! AppState — the dashboard's view state, passed read-only to components.
//!
//! The App event loop is the only writer.

use advisor_proto::model::{AnalysisCategory, AnalyticsBundle, EarningsCallEntry, Timeframe};

use crate::feed::FeedSlots;
use crate::overlay::{OverlayKind, OverlayState};
use crate::selection::SelectionRegistry;
use crate::switches::{CategorySwitch, TimeframeSwitch};
use crate::transport::TransportController;
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    // ── Controllers ─────────────────────────────────────────────────────────
    pub selection: SelectionRegistry,
    pub category: CategorySwitch,
    pub timeframe: TimeframeSwitch,
    pub transport: TransportController,
    pub overlays: OverlayState,

    // ── Provider data ───────────────────────────────────────────────────────
    pub feeds: FeedSlots,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    pub show_help: bool,
    pub show_keys_bar: bool,
    pub volume_step: f32,
    pub seek_step_secs: u32,
}

/// What the next frame will show, derived from the controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub company: String,
    pub panel: AnalysisCategory,
    /// `Some` only while the market-impact panel is showing.
    pub timeframe: Option<Timeframe>,
    /// Open overlays, bottom first.
    pub overlays: Vec<OverlayKind>,
    pub transport_visible: bool,
}

impl AppState {
    pub fn company(&self) -> &str {
        self.selection.selected()
    }

    pub fn entry(&self) -> &EarningsCallEntry {
        self.selection.selected_entry()
    }

    /// The loaded bundle, if it belongs to the active category.
    pub fn active_analytics(&self) -> Option<&AnalyticsBundle> {
        self.feeds
            .analytics
            .value()
            .filter(|b| b.category() == self.category.active())
    }

    pub fn view(&self) -> DashboardView {
        let panel = self.category.active();
        DashboardView {
            company: self.company().to_string(),
            panel,
            timeframe: (panel == AnalysisCategory::MarketImpact)
                .then(|| self.timeframe.active()),
            overlays: self.overlays.open_stack(),
            transport_visible: self.transport.visible(),
        }
    }
}
