//! Loading state for provider responses.
//!
//! Every fetch is issued with a [`FeedTicket`]. A slot remembers the last
//! ticket it issued and only accepts a response carrying that same ticket,
//! for the company that is still selected when the response lands. Anything
//! else is a late answer to a question nobody is asking any more.
//!
//! # States
//! ```text
//!  Idle                  — nothing requested yet
//!  Loading { since }     — request in flight
//!  Ready { value, .. }   — response applied
//!  Failed(msg)           — provider returned an error
//!  TimedOut              — in flight for longer than FEED_TIMEOUT
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};

use advisor_proto::model::{AnalysisCategory, AnalyticsBundle, CallDocuments, PriceSeries};
use chrono::{DateTime, Local};
use tracing::debug;

/// How long a request may stay in flight before the slot shows a timeout.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity of one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTicket {
    pub seq: u64,
    pub company: String,
    pub category: Option<AnalysisCategory>,
}

#[derive(Debug, Clone)]
enum SlotState<T> {
    Idle,
    Loading { since: Instant },
    Ready { value: T, loaded_at: DateTime<Local> },
    Failed(String),
    TimedOut,
}

/// How a panel should present its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotHint {
    Ready,
    Loading,
    TimedOut,
    Failed,
}

#[derive(Debug, Clone)]
pub struct FeedSlot<T> {
    state: SlotState<T>,
    latest: Option<FeedTicket>,
    timeout: Duration,
}

impl<T> Default for FeedSlot<T> {
    fn default() -> Self {
        Self {
            state: SlotState::Idle,
            latest: None,
            timeout: FEED_TIMEOUT,
        }
    }
}

impl<T> FeedSlot<T> {
    #[cfg(test)]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            SlotState::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        match &self.state {
            SlotState::Ready { loaded_at, .. } => Some(*loaded_at),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SlotState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn hint(&self) -> SlotHint {
        match self.state {
            SlotState::Ready { .. } => SlotHint::Ready,
            SlotState::Idle | SlotState::Loading { .. } => SlotHint::Loading,
            SlotState::TimedOut => SlotHint::TimedOut,
            SlotState::Failed(_) => SlotHint::Failed,
        }
    }

    #[cfg(test)]
    pub fn latest_ticket(&self) -> Option<&FeedTicket> {
        self.latest.as_ref()
    }

    /// Mark a new request in flight. Earlier tickets become stale.
    pub fn request(&mut self, ticket: FeedTicket) {
        self.latest = Some(ticket);
        self.state = SlotState::Loading {
            since: Instant::now(),
        };
    }

    /// Fill from a local cache. Any request still in flight becomes stale.
    pub fn fill(&mut self, value: T) {
        self.latest = None;
        self.state = SlotState::Ready {
            value,
            loaded_at: Local::now(),
        };
    }

    /// Called every tick. Returns true if the slot just timed out.
    pub fn tick(&mut self) -> bool {
        if let SlotState::Loading { since } = self.state {
            if since.elapsed() >= self.timeout {
                self.state = SlotState::TimedOut;
                return true;
            }
        }
        false
    }

    /// Apply a response if it answers the latest request for the company
    /// still selected. Returns true when applied.
    pub fn accept(
        &mut self,
        ticket: &FeedTicket,
        current_company: &str,
        result: Result<T, String>,
    ) -> bool {
        if self.latest.as_ref() != Some(ticket) {
            debug!("[feed] stale response #{} for {:?} dropped", ticket.seq, ticket.company);
            return false;
        }
        if ticket.company != current_company {
            debug!(
                "[feed] response #{} for {:?} dropped, {:?} is selected",
                ticket.seq, ticket.company, current_company
            );
            return false;
        }
        self.state = match result {
            Ok(value) => SlotState::Ready {
                value,
                loaded_at: Local::now(),
            },
            Err(msg) => SlotState::Failed(msg),
        };
        true
    }
}

/// All provider-backed state for the dashboard.
#[derive(Default)]
pub struct FeedSlots {
    seq: u64,
    pub analytics: FeedSlot<AnalyticsBundle>,
    pub prices: FeedSlot<PriceSeries>,
    pub documents: FeedSlot<CallDocuments>,
    analytics_cache: HashMap<(String, AnalysisCategory), AnalyticsBundle>,
}

impl FeedSlots {
    pub fn issue(&mut self, company: &str, category: Option<AnalysisCategory>) -> FeedTicket {
        self.seq += 1;
        FeedTicket {
            seq: self.seq,
            company: company.to_string(),
            category,
        }
    }

    pub fn cached_analytics(
        &self,
        company: &str,
        category: AnalysisCategory,
    ) -> Option<&AnalyticsBundle> {
        self.analytics_cache.get(&(company.to_string(), category))
    }

    pub fn cache_analytics(&mut self, company: &str, bundle: AnalyticsBundle) {
        self.analytics_cache
            .insert((company.to_string(), bundle.category()), bundle);
    }

    /// Returns true if any slot changed state.
    pub fn tick(&mut self) -> bool {
        let a = self.analytics.tick();
        let p = self.prices.tick();
        let d = self.documents.tick();
        a || p || d
    }

    /// Most recent load time across the company-wide slots.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        [
            self.analytics.loaded_at(),
            self.prices.loaded_at(),
            self.documents.loaded_at(),
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(slots: &mut FeedSlots, company: &str) -> FeedTicket {
        slots.issue(company, None)
    }

    #[test]
    fn test_tickets_are_unique() {
        let mut slots = FeedSlots::default();
        let a = ticket(&mut slots, "Tech Corp");
        let b = ticket(&mut slots, "Tech Corp");
        assert_ne!(a, b);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_latest_response_wins() {
        let mut slots = FeedSlots::default();
        let first = ticket(&mut slots, "Tech Corp");
        slots.prices.request(first.clone());
        let second = ticket(&mut slots, "Tech Corp");
        slots.prices.request(second.clone());

        let old = PriceSeries::default();
        assert!(!slots.prices.accept(&first, "Tech Corp", Ok(old)));
        assert_eq!(slots.prices.hint(), SlotHint::Loading);

        let fresh = advisor_proto::feed::mock_prices("Tech Corp", 180.0, 10.0);
        assert!(slots.prices.accept(&second, "Tech Corp", Ok(fresh.clone())));
        assert_eq!(slots.prices.value(), Some(&fresh));
        assert!(slots.prices.loaded_at().is_some());
    }

    #[test]
    fn test_response_for_deselected_company_dropped() {
        let mut slots = FeedSlots::default();
        let t = ticket(&mut slots, "Tech Corp");
        slots.documents.request(t.clone());
        let docs = advisor_proto::feed::mock_documents("Tech Corp");
        assert!(!slots.documents.accept(&t, "Global Industries", Ok(docs)));
        assert!(slots.documents.value().is_none());
    }

    #[test]
    fn test_failure_is_recorded() {
        let mut slots = FeedSlots::default();
        let t = ticket(&mut slots, "Tech Corp");
        slots.prices.request(t.clone());
        assert!(slots.prices.accept(&t, "Tech Corp", Err("feed unavailable".into())));
        assert_eq!(slots.prices.hint(), SlotHint::Failed);
        assert_eq!(slots.prices.error(), Some("feed unavailable"));
    }

    #[test]
    fn test_timeout_then_late_response() {
        let mut slot: FeedSlot<PriceSeries> = FeedSlot::with_timeout(Duration::ZERO);
        let t = FeedTicket {
            seq: 1,
            company: "Innovation Labs".into(),
            category: None,
        };
        slot.request(t.clone());
        assert!(slot.tick());
        assert_eq!(slot.hint(), SlotHint::TimedOut);
        assert!(!slot.tick());

        assert!(slot.accept(&t, "Innovation Labs", Ok(PriceSeries::default())));
        assert_eq!(slot.hint(), SlotHint::Ready);
    }

    #[test]
    fn test_fill_makes_inflight_stale() {
        let mut slots = FeedSlots::default();
        let t = slots.issue("Tech Corp", Some(AnalysisCategory::Financial));
        slots.analytics.request(t.clone());

        let set = advisor_proto::feed::mock_analytics();
        slots.analytics.fill(set.bundle(AnalysisCategory::Sentiment));
        assert!(!slots.analytics.accept(
            &t,
            "Tech Corp",
            Ok(set.bundle(AnalysisCategory::Financial))
        ));
        assert_eq!(
            slots.analytics.value().map(|b| b.category()),
            Some(AnalysisCategory::Sentiment)
        );
    }

    #[test]
    fn test_analytics_cache_keyed_by_company_and_category() {
        let mut slots = FeedSlots::default();
        let set = advisor_proto::feed::mock_analytics();
        slots.cache_analytics("Tech Corp", set.bundle(AnalysisCategory::Investor));
        assert!(slots
            .cached_analytics("Tech Corp", AnalysisCategory::Investor)
            .is_some());
        assert!(slots
            .cached_analytics("Tech Corp", AnalysisCategory::Sentiment)
            .is_none());
        assert!(slots
            .cached_analytics("Global Industries", AnalysisCategory::Investor)
            .is_none());
    }
}
