// External data and broker provider module
pub mod paper;
pub mod replay;

pub use paper::PaperBroker;
pub use replay::{NoEarnings, SnapshotMarketData, StaticSentiment};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{BarFrame, NewsSentiment, Order, Timeframe};

/// Failures surfaced by external collaborators. Orchestration catches
/// these per symbol; they never abort a whole cycle.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("timeframe {0} not supported by this provider")]
    UnsupportedTimeframe(Timeframe),
    #[error("no data for {symbol}: {reason}")]
    NoData { symbol: String, reason: String },
    #[error("order rejected: {0}")]
    OrderRejected(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Bar Frame and benchmark data source.
pub trait MarketData: Send {
    /// Tail of the `lookback` most recent rows for the symbol and
    /// timeframe.
    fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarFrame, ProviderError>;

    fn get_last_close(&self, symbol: &str) -> Result<f64, ProviderError>;

    /// Current volatility index reading.
    fn get_vix(&self) -> Result<f64, ProviderError>;

    /// Market benchmark ticker used for regime classification.
    fn get_reference_symbol(&self) -> String;
}

/// Order placement and account queries.
pub trait Broker: Send {
    /// Submit an order, returning the broker-assigned order id.
    fn place_order(&mut self, order: &Order) -> Result<String, ProviderError>;

    /// Net liquidation value used for position sizing.
    fn get_balance(&self) -> Result<f64, ProviderError>;
}

/// Market mood inputs for entry scoring.
pub trait SentimentProvider: Send {
    /// Fear & Greed index, 0-100.
    fn get_fear_greed(&self) -> Result<u8, ProviderError>;

    fn get_news_sentiment(&self, symbol: &str) -> Result<NewsSentiment, ProviderError>;
}

/// Upcoming earnings dates, used to gate new entries.
pub trait EarningsProvider: Send {
    fn next_earnings(&self, symbol: &str) -> Result<Option<DateTime<Utc>>, ProviderError>;
}
