pub mod frame;

pub use frame::{Bar, BarFrame, Field, FieldValue};

use serde::{Deserialize, Serialize};

/// Timeframes the decision engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Daily,
    FourHour,
    OneHour,
}

impl Timeframe {
    /// Label used in provider requests and snapshot file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "D",
            Timeframe::FourHour => "4H",
            Timeframe::OneHour => "1H",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single order intent handed to the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub qty: i64,
    pub side: OrderSide,
    pub price: f64,
}

impl Order {
    pub fn new(symbol: &str, qty: i64, side: OrderSide, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            qty,
            side,
            price,
        }
    }
}

/// Ticker-specific news tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
    Pos,
    Neg,
    #[default]
    Neutral,
}

/// Sentiment inputs to entry scoring. `fg` is the Fear & Greed index
/// (0-100); absent means no veto or band adjustment applies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub fg: Option<u8>,
    pub news: NewsSentiment,
}

impl SentimentSnapshot {
    pub fn new(fg: Option<u8>, news: NewsSentiment) -> Self {
        Self { fg, news }
    }

    /// Neutral snapshot with the given Fear & Greed reading.
    pub fn with_fg(fg: u8) -> Self {
        Self {
            fg: Some(fg),
            news: NewsSentiment::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_labels() {
        assert_eq!(Timeframe::Daily.to_string(), "D");
        assert_eq!(Timeframe::FourHour.to_string(), "4H");
        assert_eq!(Timeframe::OneHour.to_string(), "1H");
    }

    #[test]
    fn test_order_creation() {
        let order = Order::new("AAPL", 9, OrderSide::Buy, 110.0);
        assert_eq!(order.symbol, "AAPL");
        assert_eq!(order.qty, 9);
        assert_eq!(order.side, OrderSide::Buy);
    }

    #[test]
    fn test_sentiment_defaults() {
        let snapshot = SentimentSnapshot::default();
        assert_eq!(snapshot.fg, None);
        assert_eq!(snapshot.news, NewsSentiment::Neutral);
    }

    #[test]
    fn test_news_sentiment_serde_labels() {
        assert_eq!(
            serde_json::to_string(&NewsSentiment::Pos).unwrap(),
            "\"pos\""
        );
        let news: NewsSentiment = serde_json::from_str("\"neg\"").unwrap();
        assert_eq!(news, NewsSentiment::Neg);
    }
}
