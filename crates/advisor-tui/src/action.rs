//! Action enum — all user-initiated intents flowing through the dashboard.

use advisor_proto::model::{AnalysisCategory, Timeframe};

use crate::overlay::OverlayKind;

/// Identifier for each drawable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    CallList,
    Header,
    PriceChart,
    AnalysisPanel,
    TransportPanel,
    Transcript,
    Summary,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Selection ────────────────────────────────────────────────────────────
    SelectCompany(String),

    // ── Filter ───────────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,

    // ── Analysis ─────────────────────────────────────────────────────────────
    SetCategory(AnalysisCategory),
    NextCategory,
    PrevCategory,
    SetTimeframe(Timeframe),
    NextTimeframe,
    PrevTimeframe,

    // ── Transport ────────────────────────────────────────────────────────────
    ToggleTransport,
    TogglePlay,
    Volume(f32),
    SeekRelative(i64),
    SeekTo(i64),

    // ── Overlays ─────────────────────────────────────────────────────────────
    OpenOverlay(OverlayKind),
    CloseOverlay(OverlayKind),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
