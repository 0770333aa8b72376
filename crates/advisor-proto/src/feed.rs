//! StaticFeed — an in-memory provider backed by pre-shaped records.
//!
//! Records come either from the built-in mock figures (`StaticFeed::mock`) or
//! from a JSON file keyed by company name (`StaticFeed::from_json_file`).

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::*;
use crate::provider::{
    AnalyticsProvider, CallFeed, DocumentProvider, FeedError, PriceHistoryProvider,
};

/// Hourly samples in a generated price series.
pub const MOCK_PRICE_POINTS: usize = 24;

/// One report per category, so a lookup always yields the matching variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AnalyticsSet {
    pub sentiment: SentimentReport,
    pub financial: FinancialReport,
    pub investor: InvestorReport,
    pub market_impact: MarketImpactReport,
}

impl AnalyticsSet {
    pub fn bundle(&self, category: AnalysisCategory) -> AnalyticsBundle {
        match category {
            AnalysisCategory::Sentiment => AnalyticsBundle::Sentiment(self.sentiment.clone()),
            AnalysisCategory::Financial => AnalyticsBundle::Financial(self.financial.clone()),
            AnalysisCategory::Investor => AnalyticsBundle::Investor(self.investor.clone()),
            AnalysisCategory::MarketImpact => {
                AnalyticsBundle::MarketImpact(self.market_impact.clone())
            }
        }
    }
}

/// Everything the dashboard shows for one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedRecord {
    pub analytics: AnalyticsSet,
    pub prices: PriceSeries,
    pub documents: CallDocuments,
    #[serde(default)]
    pub audio: Option<String>,
}

pub struct StaticFeed {
    records: HashMap<String, FeedRecord>,
    latency: Duration,
}

impl StaticFeed {
    pub fn new(records: HashMap<String, FeedRecord>) -> Self {
        Self {
            records,
            latency: Duration::ZERO,
        }
    }

    /// Built-in figures for every catalog entry. Prices are `base + [0, spread)`,
    /// seeded by company name so a session sees a stable series.
    pub fn mock(catalog: &[EarningsCallEntry], price_base: f64, price_spread: f64) -> Self {
        let records = catalog
            .iter()
            .map(|entry| {
                let record = FeedRecord {
                    analytics: mock_analytics(),
                    prices: mock_prices(&entry.company, price_base, price_spread),
                    documents: mock_documents(&entry.company),
                    audio: None,
                };
                (entry.company.clone(), record)
            })
            .collect();
        Self::new(records)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, FeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, FeedError> {
        let records: HashMap<String, FeedRecord> = serde_json::from_str(content)?;
        Ok(Self::new(records))
    }

    /// Artificial delay applied before every response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn companies(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    async fn record(&self, company: &str) -> Result<&FeedRecord, FeedError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.records.get(company).ok_or_else(|| {
            debug!("[feed] no record for {:?}", company);
            FeedError::UnknownCompany(company.to_string())
        })
    }
}

#[async_trait]
impl AnalyticsProvider for StaticFeed {
    async fn fetch_analytics(
        &self,
        company: &str,
        category: AnalysisCategory,
    ) -> Result<AnalyticsBundle, FeedError> {
        Ok(self.record(company).await?.analytics.bundle(category))
    }
}

#[async_trait]
impl PriceHistoryProvider for StaticFeed {
    async fn fetch_price_history(&self, company: &str) -> Result<PriceSeries, FeedError> {
        Ok(self.record(company).await?.prices.clone())
    }
}

#[async_trait]
impl DocumentProvider for StaticFeed {
    async fn fetch_documents(&self, company: &str) -> Result<CallDocuments, FeedError> {
        Ok(self.record(company).await?.documents.clone())
    }
}

impl CallFeed for StaticFeed {
    fn audio_resource(&self, company: &str) -> Option<String> {
        self.records.get(company).and_then(|r| r.audio.clone())
    }
}

// ── Mock figures ──────────────────────────────────────────────────────────────

fn company_seed(company: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    company.hash(&mut hasher);
    hasher.finish()
}

pub fn mock_prices(company: &str, base: f64, spread: f64) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(company_seed(company));
    let spread = if spread.is_finite() { spread.max(0.0) } else { 0.0 };
    let points = (0..MOCK_PRICE_POINTS)
        .map(|hour| PricePoint {
            time_label: format!("{}:00", hour),
            price: if spread > 0.0 {
                base + rng.gen_range(0.0..spread)
            } else {
                base
            },
        })
        .collect();
    PriceSeries::new(points)
}

pub fn mock_analytics() -> AnalyticsSet {
    AnalyticsSet {
        sentiment: SentimentReport {
            executive_score: 85,
            executive_note: "Positive tone increase from last call".into(),
            positive_words: 78,
            negative_words: 12,
            hesitation_markers: 5,
            industry_rank: "Top 15%".into(),
            competitor_note: "25% more positive than competitors".into(),
        },
        financial: FinancialReport {
            headline: vec![
                Metric::new("EPS", "$2.45").up("15% vs Expected"),
                Metric::new("Revenue", "$89.5B").up("8% YoY"),
                Metric::new("Operating Margin", "28.5%").up("2.5pts"),
                Metric::new("Cash Flow", "$12.3B").up("12% QoQ"),
            ],
            guidance: vec![
                Metric::new("Revenue Forecast", "$92-95B (Q1 2024)"),
                Metric::new("EPS Forecast", "$2.50-2.60"),
                Metric::new("Cost Reduction Target", "$2B by 2024"),
            ],
            growth_signals: vec![
                "Expansion into APAC market planned for Q2".into(),
                "New product line launch in development".into(),
                "Strategic acquisition of TechStart ($500M)".into(),
            ],
            risks: vec![
                RiskFactor {
                    text: "Supply chain disruptions in Asia".into(),
                    severity: Severity::High,
                },
                RiskFactor {
                    text: "Regulatory changes in EU market".into(),
                    severity: Severity::Medium,
                },
                RiskFactor {
                    text: "Increased competition in core markets".into(),
                    severity: Severity::Low,
                },
            ],
        },
        investor: InvestorReport {
            response_quality: 85,
            questions_addressed: 12,
            questions_total: 15,
            follow_ups: 8,
            past_call_comparison: vec![
                Metric::new("Confidence Level", "↑ 15% vs Last Call").tone(true),
                Metric::new("Key Terms Changed", "+3 New Terms"),
            ],
            positive_mentions: 1245,
            negative_mentions: 234,
            news_positive_pct: 85,
            price_move_after_call: "+4.2%".into(),
            volume_increase: "+156%".into(),
            volatility: "High".into(),
        },
        market_impact: MarketImpactReport {
            short: ShortTermFigures {
                intraday_range: "$182.5 - $189.3".into(),
                spread: "3.7% Spread".into(),
                volume: "2.5M shares".into(),
                vwap: "$185.75".into(),
                call_volume: Metric::new("Call Volume", "12,450").up("234% vs Avg"),
                put_volume: Metric::new("Put Volume", "8,320").down("156% vs Avg"),
                put_call_ratio: "0.67".into(),
            },
            medium: MediumTermFigures {
                buy: 15,
                hold: 8,
                sell: 2,
                price_target: "$185".into(),
                relative_performance: "+2.8%".into(),
                sector_rank: "#3 of 25".into(),
                beta: "1.15".into(),
            },
            long: LongTermFigures {
                promise_delivery: 85,
                guidance_accuracy: "92%".into(),
                ceo_confidence: "High".into(),
                phrase_impacts: vec![
                    Metric::new("\"Strategic Investment\"", "+1.2%").tone(true),
                    Metric::new("\"Market Challenges\"", "-0.8%").tone(false),
                ],
            },
        },
    }
}

pub fn mock_documents(company: &str) -> CallDocuments {
    let line = |speaker: &str, text: String| SpeakerLine {
        speaker: speaker.to_string(),
        text,
    };
    CallDocuments {
        transcript_title: "Q4 2023 Earnings Call Transcript".into(),
        transcript: vec![
            TranscriptSection {
                heading: "Opening Remarks - CEO John Smith".into(),
                lines: vec![line(
                    "CEO",
                    format!(
                        "Good morning everyone, and thank you for joining us today. I'm pleased to \
                         report another strong quarter for {}, with revenue growth exceeding our \
                         expectations and significant progress across all our key initiatives...",
                        company
                    ),
                )],
            },
            TranscriptSection {
                heading: "Financial Overview - CFO Sarah Johnson".into(),
                lines: vec![line(
                    "CFO",
                    "Our Q4 revenue reached $89.5 billion, representing an 8% year-over-year \
                     increase. Operating margin improved to 28.5%, up 250 basis points from the \
                     previous quarter..."
                        .into(),
                )],
            },
            TranscriptSection {
                heading: "Q&A Session".into(),
                lines: vec![
                    line(
                        "Analyst (Morgan Stanley)",
                        "Can you provide more color on the expansion plans in the APAC region?"
                            .into(),
                    ),
                    line(
                        "CEO Response",
                        "Certainly. We're seeing tremendous opportunity in the APAC market..."
                            .into(),
                    ),
                ],
            },
        ],
        summary: CallSummary {
            title: "Call Summary".into(),
            highlights: vec![
                "Revenue growth of 8% year-over-year, exceeding analyst expectations".into(),
                "Operating margin improvement to 28.5%".into(),
                "Announced expansion plans in APAC region".into(),
                "New product line launch scheduled for Q2".into(),
            ],
            performance: vec![
                Metric::new("Revenue", "$89.5B").up("8% YoY"),
                Metric::new("EPS", "$2.45").up("15% vs Expected"),
            ],
            initiatives: vec![
                "APAC market expansion planned for Q2".into(),
                "Strategic acquisition of TechStart ($500M)".into(),
                "Cost reduction initiative targeting $2B by 2024".into(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_prices_stay_in_band() {
        let s = mock_prices("Tech Corp", 180.0, 10.0);
        assert_eq!(s.len(), MOCK_PRICE_POINTS);
        assert_eq!(s.first().unwrap().time_label, "0:00");
        assert_eq!(s.last().unwrap().time_label, "23:00");
        assert!(s.points.iter().all(|p| p.price >= 180.0 && p.price < 190.0));
    }

    #[test]
    fn test_mock_prices_are_stable_per_company() {
        assert_eq!(
            mock_prices("Tech Corp", 180.0, 10.0),
            mock_prices("Tech Corp", 180.0, 10.0)
        );
    }

    #[test]
    fn test_zero_spread_is_flat() {
        let s = mock_prices("Tech Corp", 100.0, 0.0);
        assert!(s.points.iter().all(|p| p.price == 100.0));
    }

    #[test]
    fn test_non_finite_spread_is_flat() {
        let config: crate::config::Config = toml::from_str("[feed]\nprice_spread = inf").unwrap();
        assert!(config.feed.price_spread.is_infinite());
        let s = mock_prices("Tech Corp", 100.0, config.feed.price_spread);
        assert!(s.points.iter().all(|p| p.price == 100.0));
        let s = mock_prices("Tech Corp", 100.0, f64::NAN);
        assert!(s.points.iter().all(|p| p.price == 100.0));
    }

    #[test]
    fn test_json_record_round_trip() {
        let mut records = HashMap::new();
        records.insert(
            "Acme".to_string(),
            FeedRecord {
                analytics: mock_analytics(),
                prices: mock_prices("Acme", 50.0, 5.0),
                documents: mock_documents("Acme"),
                audio: Some("acme-q4.mp3".into()),
            },
        );
        let json = serde_json::to_string(&records).unwrap();
        let feed = StaticFeed::from_json_str(&json).unwrap();
        assert_eq!(feed.companies().collect::<Vec<_>>(), vec!["Acme"]);
        assert_eq!(feed.audio_resource("Acme").as_deref(), Some("acme-q4.mp3"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = StaticFeed::from_json_str("{ not json").err().unwrap();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}
