//! Color palette and style constants for the advisor dashboard.

use ratatui::style::{Color, Modifier, Style};

use advisor_proto::model::{CallStatus, Severity};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 18, 24);
pub const C_OVERLAY_BG: Color = Color::Rgb(20, 22, 32);
pub const C_ACCENT: Color = Color::Rgb(96, 140, 255); // brand blue, active tab
pub const C_POSITIVE: Color = Color::Rgb(80, 200, 120);
pub const C_NEGATIVE: Color = Color::Rgb(255, 95, 95);
pub const C_CAUTION: Color = Color::Rgb(255, 184, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 30, 44);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(96, 140, 255);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_FILTER_BG: Color = Color::Rgb(20, 20, 32);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_CHART_LINE: Color = Color::Rgb(130, 202, 157);
pub const C_CHART_AXIS: Color = Color::Rgb(60, 60, 76);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_FILTER: Color = Color::Rgb(255, 200, 80);
pub const C_MODE_OVERLAY: Color = Color::Rgb(180, 120, 220);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_heading() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

/// Green for good news, red for bad, plain when there is no direction.
pub fn style_tone(positive: Option<bool>) -> Style {
    match positive {
        Some(true) => Style::default().fg(C_POSITIVE),
        Some(false) => Style::default().fg(C_NEGATIVE),
        None => style_default(),
    }
}

pub fn status_color(status: CallStatus) -> Color {
    match status {
        CallStatus::Upcoming => C_ACCENT,
        CallStatus::Ongoing => C_POSITIVE,
        CallStatus::Past => C_SECONDARY,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => C_NEGATIVE,
        Severity::Medium => C_CAUTION,
        Severity::Low => C_POSITIVE,
    }
}
