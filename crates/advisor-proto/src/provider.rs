//! Provider interfaces the dashboard consumes.
//!
//! Analytics, price history and call documents are all pre-computed
//! elsewhere; the dashboard only asks for them by company key. Implementations
//! may be slow (network, disk), so every call is async and the caller is
//! expected to run it off the UI task.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AnalysisCategory, AnalyticsBundle, CallDocuments, PriceSeries};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no data for company {0:?}")]
    UnknownCompany(String),
    #[error("feed file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("feed file malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feed unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AnalyticsProvider: Send + Sync {
    async fn fetch_analytics(
        &self,
        company: &str,
        category: AnalysisCategory,
    ) -> Result<AnalyticsBundle, FeedError>;
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_price_history(&self, company: &str) -> Result<PriceSeries, FeedError>;
}

#[async_trait]
pub trait DocumentProvider: Send + Sync {
    async fn fetch_documents(&self, company: &str) -> Result<CallDocuments, FeedError>;
}

/// Convenience bound for a single type serving every feed.
pub trait CallFeed: AnalyticsProvider + PriceHistoryProvider + DocumentProvider {
    /// Audio resource reference for a company's call, if one exists.
    fn audio_resource(&self, _company: &str) -> Option<String> {
        None
    }
}
