use serde::{Deserialize, Serialize};

/// Lifecycle of an earnings call relative to "now" in the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Upcoming,
    Ongoing,
    Past,
}

impl CallStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Past => "past",
        }
    }
}

/// One selectable earnings call. `company` is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EarningsCallEntry {
    pub company: String,
    pub scheduled_time: String,
    #[serde(default)]
    pub status: CallStatus,
}

impl EarningsCallEntry {
    pub fn new(company: impl Into<String>, scheduled_time: impl Into<String>, status: CallStatus) -> Self {
        Self {
            company: company.into(),
            scheduled_time: scheduled_time.into(),
            status,
        }
    }
}

/// Catalog shipped with the binary, in sidebar order.
pub fn default_catalog() -> Vec<EarningsCallEntry> {
    vec![
        EarningsCallEntry::new("Tech Corp", "2:00:00 PM", CallStatus::Upcoming),
        EarningsCallEntry::new("Global Industries", "3:30:00 PM", CallStatus::Ongoing),
        EarningsCallEntry::new("Innovation Labs", "10:00:00 AM", CallStatus::Past),
    ]
}

pub const DEFAULT_INITIAL_COMPANY: &str = "Innovation Labs";

/// The four mutually exclusive analytic panels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisCategory {
    #[default]
    Sentiment,
    Financial,
    Investor,
    MarketImpact,
}

impl AnalysisCategory {
    /// Tab order.
    pub const ALL: [AnalysisCategory; 4] = [
        Self::Sentiment,
        Self::Financial,
        Self::Investor,
        Self::MarketImpact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sentiment => "Sentiment Analysis",
            Self::Financial => "Financial Metrics",
            Self::Investor => "Investor Reactions",
            Self::MarketImpact => "Market Impact",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Financial => "financial",
            Self::Investor => "investor",
            Self::MarketImpact => "market-impact",
        }
    }
}

/// Horizon filter for the market-impact panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Short,
    Medium,
    Long,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Self::Short, Self::Medium, Self::Long];

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short Term",
            Self::Medium => "Medium Term",
            Self::Long => "Long Term",
        }
    }
}

// ── Price history ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub time_label: String,
    pub price: f64,
}

/// Ordered price samples for one company. Read-only once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Absolute change from the first to the last sample.
    pub fn change(&self) -> Option<f64> {
        Some(self.last()?.price - self.first()?.price)
    }

    /// Percentage change from the first to the last sample.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.first()?.price;
        if first == 0.0 {
            return None;
        }
        Some(self.change()? / first * 100.0)
    }

    /// (min, max) price, for chart bounds.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.price);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

// ── Analytics bundles ─────────────────────────────────────────────────────────

/// A labelled figure with an optional delta caption, e.g. "EPS $2.45 ↑ 15% vs Expected".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub delta: Option<String>,
    /// Direction of the delta, used for colouring. `None` = neutral.
    #[serde(default)]
    pub positive: Option<bool>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
            positive: None,
        }
    }

    pub fn up(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self.positive = Some(true);
        self
    }

    pub fn down(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self.positive = Some(false);
        self
    }

    /// Colour the value without a delta caption.
    pub fn tone(mut self, positive: bool) -> Self {
        self.positive = Some(positive);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFactor {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentReport {
    /// Executive tone score in percent, signed.
    pub executive_score: i32,
    pub executive_note: String,
    pub positive_words: u32,
    pub negative_words: u32,
    pub hesitation_markers: u32,
    pub industry_rank: String,
    pub competitor_note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialReport {
    pub headline: Vec<Metric>,
    pub guidance: Vec<Metric>,
    pub growth_signals: Vec<String>,
    pub risks: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestorReport {
    /// Q&A response quality, 0..=100.
    pub response_quality: u8,
    pub questions_addressed: u32,
    pub questions_total: u32,
    pub follow_ups: u32,
    pub past_call_comparison: Vec<Metric>,
    pub positive_mentions: u32,
    pub negative_mentions: u32,
    pub news_positive_pct: u8,
    pub price_move_after_call: String,
    pub volume_increase: String,
    pub volatility: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortTermFigures {
    pub intraday_range: String,
    pub spread: String,
    pub volume: String,
    pub vwap: String,
    pub call_volume: Metric,
    pub put_volume: Metric,
    pub put_call_ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediumTermFigures {
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub price_target: String,
    pub relative_performance: String,
    pub sector_rank: String,
    pub beta: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LongTermFigures {
    /// Promise delivery rate, 0..=100.
    pub promise_delivery: u8,
    pub guidance_accuracy: String,
    pub ceo_confidence: String,
    pub phrase_impacts: Vec<Metric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketImpactReport {
    pub short: ShortTermFigures,
    pub medium: MediumTermFigures,
    pub long: LongTermFigures,
}

/// Figures for one timeframe, borrowed out of a [`MarketImpactReport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeframeFigures<'a> {
    Short(&'a ShortTermFigures),
    Medium(&'a MediumTermFigures),
    Long(&'a LongTermFigures),
}

impl MarketImpactReport {
    pub fn for_timeframe(&self, tf: Timeframe) -> TimeframeFigures<'_> {
        match tf {
            Timeframe::Short => TimeframeFigures::Short(&self.short),
            Timeframe::Medium => TimeframeFigures::Medium(&self.medium),
            Timeframe::Long => TimeframeFigures::Long(&self.long),
        }
    }
}

/// Pre-computed analytics for one `(company, category)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum AnalyticsBundle {
    Sentiment(SentimentReport),
    Financial(FinancialReport),
    Investor(InvestorReport),
    MarketImpact(MarketImpactReport),
}

impl AnalyticsBundle {
    pub fn category(&self) -> AnalysisCategory {
        match self {
            Self::Sentiment(_) => AnalysisCategory::Sentiment,
            Self::Financial(_) => AnalysisCategory::Financial,
            Self::Investor(_) => AnalysisCategory::Investor,
            Self::MarketImpact(_) => AnalysisCategory::MarketImpact,
        }
    }
}

// ── Call documents ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeakerLine {
    pub speaker: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSection {
    pub heading: String,
    pub lines: Vec<SpeakerLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallSummary {
    pub title: String,
    pub highlights: Vec<String>,
    pub performance: Vec<Metric>,
    pub initiatives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallDocuments {
    pub transcript_title: String,
    pub transcript: Vec<TranscriptSection>,
    pub summary: CallSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    time_label: format!("{}:00", i),
                    price,
                })
                .collect(),
        )
    }

    #[test]
    fn test_price_series_change_and_bounds() {
        let s = series(&[180.0, 186.0, 183.0, 189.0]);
        assert_eq!(s.change(), Some(9.0));
        assert_eq!(s.change_pct(), Some(5.0));
        assert_eq!(s.bounds(), Some((180.0, 189.0)));
    }

    #[test]
    fn test_empty_series_has_no_summary() {
        let s = PriceSeries::default();
        assert!(s.change().is_none());
        assert!(s.change_pct().is_none());
        assert!(s.bounds().is_none());
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&AnalysisCategory::MarketImpact).unwrap();
        assert_eq!(json, "\"market-impact\"");
        let tf: Timeframe = serde_json::from_str("\"long\"").unwrap();
        assert_eq!(tf, Timeframe::Long);
        let status: CallStatus = serde_json::from_str("\"ongoing\"").unwrap();
        assert_eq!(status, CallStatus::Ongoing);
    }

    #[test]
    fn test_default_catalog_contains_initial_company() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().any(|e| e.company == DEFAULT_INITIAL_COMPANY));
    }
}
