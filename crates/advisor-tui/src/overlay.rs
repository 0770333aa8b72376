//! Visibility of the transcript and summary overlays.
//!
//! The two are independent and may be open together. Paint order is fixed:
//! the summary sits above the transcript, and the topmost open overlay owns
//! all input.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Transcript,
    Summary,
}

impl OverlayKind {
    /// Bottom to top.
    pub const PAINT_ORDER: [OverlayKind; 2] = [Self::Transcript, Self::Summary];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transcript => "transcript",
            Self::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub transcript_open: bool,
    pub summary_open: bool,
}

impl OverlayState {
    pub fn open_transcript(&mut self) {
        self.set(OverlayKind::Transcript, true);
    }

    pub fn close_transcript(&mut self) {
        self.set(OverlayKind::Transcript, false);
    }

    pub fn open_summary(&mut self) {
        self.set(OverlayKind::Summary, true);
    }

    pub fn close_summary(&mut self) {
        self.set(OverlayKind::Summary, false);
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::Transcript => self.transcript_open,
            OverlayKind::Summary => self.summary_open,
        }
    }

    pub fn any_open(&self) -> bool {
        self.transcript_open || self.summary_open
    }

    /// Open overlays, bottom first.
    pub fn open_stack(&self) -> Vec<OverlayKind> {
        OverlayKind::PAINT_ORDER
            .into_iter()
            .filter(|k| self.is_open(*k))
            .collect()
    }

    pub fn topmost(&self) -> Option<OverlayKind> {
        OverlayKind::PAINT_ORDER
            .into_iter()
            .rev()
            .find(|k| self.is_open(*k))
    }

    fn set(&mut self, kind: OverlayKind, open: bool) {
        if self.is_open(kind) != open {
            debug!("overlay {} -> {}", kind.label(), if open { "open" } else { "closed" });
        }
        match kind {
            OverlayKind::Transcript => self.transcript_open = open,
            OverlayKind::Summary => self.summary_open = open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_closed() {
        let o = OverlayState::default();
        assert!(!o.any_open());
        assert_eq!(o.topmost(), None);
        assert!(o.open_stack().is_empty());
    }

    #[test]
    fn test_overlays_are_not_exclusive() {
        let mut o = OverlayState::default();
        o.open_transcript();
        o.open_summary();
        assert!(o.is_open(OverlayKind::Transcript));
        assert!(o.is_open(OverlayKind::Summary));
        assert_eq!(
            o.open_stack(),
            vec![OverlayKind::Transcript, OverlayKind::Summary]
        );
    }

    #[test]
    fn test_topmost_follows_paint_order() {
        let mut o = OverlayState::default();
        o.open_summary();
        o.open_transcript();
        assert_eq!(o.topmost(), Some(OverlayKind::Summary));
        o.close_summary();
        assert_eq!(o.topmost(), Some(OverlayKind::Transcript));
        o.close_transcript();
        assert!(!o.any_open());
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut o = OverlayState::default();
        o.open_summary();
        o.open_summary();
        assert_eq!(o.open_stack(), vec![OverlayKind::Summary]);
        o.close_summary();
        assert!(!o.summary_open);
    }
}
