use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{EarningsProvider, MarketData, ProviderError, SentimentProvider};
use crate::models::{Bar, BarFrame, Field, FieldValue, NewsSentiment, Timeframe};

/// Market data served from JSON snapshot files on disk.
///
/// The directory holds one file per symbol and timeframe, named
/// `<SYMBOL>_<TF>.json` (an array of column-name to value rows, oldest
/// first), plus a `vix.json` with the current volatility reading. A
/// directory without 1H files reports 1H requests as unsupported.
pub struct SnapshotMarketData {
    dir: PathBuf,
    reference_symbol: String,
}

impl SnapshotMarketData {
    pub fn new(dir: impl Into<PathBuf>, reference_symbol: &str) -> Self {
        Self {
            dir: dir.into(),
            reference_symbol: reference_symbol.to_string(),
        }
    }

    fn frame_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", symbol, timeframe.as_str()))
    }

    fn load_frame(&self, symbol: &str, timeframe: Timeframe) -> Result<BarFrame, ProviderError> {
        let path = self.frame_path(symbol, timeframe);
        if !path.exists() {
            if timeframe == Timeframe::OneHour {
                return Err(ProviderError::UnsupportedTimeframe(timeframe));
            }
            return Err(ProviderError::NoData {
                symbol: symbol.to_string(),
                reason: format!("missing snapshot {}", path.display()),
            });
        }
        let raw = fs::read_to_string(&path)?;
        let rows: Vec<HashMap<String, FieldValue>> = serde_json::from_str(&raw)?;
        let mut frame = BarFrame::new();
        for row in rows {
            let mut bar = Bar::new();
            for (name, value) in row {
                match Field::from_name(&name) {
                    Some(field) => bar.set(field, value),
                    None => debug!("Skipping unknown column {} in {}", name, path.display()),
                }
            }
            frame.push(bar);
        }
        Ok(frame)
    }
}

impl MarketData for SnapshotMarketData {
    fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarFrame, ProviderError> {
        Ok(self.load_frame(symbol, timeframe)?.tail(lookback))
    }

    fn get_last_close(&self, symbol: &str) -> Result<f64, ProviderError> {
        let frame = self.load_frame(symbol, Timeframe::Daily)?;
        if frame.is_empty() {
            return Err(ProviderError::NoData {
                symbol: symbol.to_string(),
                reason: "empty daily snapshot".to_string(),
            });
        }
        Ok(frame.current().num(Field::Close))
    }

    fn get_vix(&self) -> Result<f64, ProviderError> {
        let path = self.dir.join("vix.json");
        if !path.exists() {
            return Err(ProviderError::NoData {
                symbol: "VIX".to_string(),
                reason: format!("missing snapshot {}", path.display()),
            });
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn get_reference_symbol(&self) -> String {
        self.reference_symbol.clone()
    }
}

/// Fixed no-information sentiment: Fear & Greed 50, neutral news.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSentiment;

impl SentimentProvider for StaticSentiment {
    fn get_fear_greed(&self) -> Result<u8, ProviderError> {
        debug!("Static sentiment: fear/greed 50");
        Ok(50)
    }

    fn get_news_sentiment(&self, symbol: &str) -> Result<NewsSentiment, ProviderError> {
        debug!("Static sentiment: neutral news for {}", symbol);
        Ok(NewsSentiment::Neutral)
    }
}

/// Earnings source that never reports an upcoming date.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEarnings;

impl EarningsProvider for NoEarnings {
    fn next_earnings(&self, _symbol: &str) -> Result<Option<DateTime<Utc>>, ProviderError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SPY_4H.json"),
            r#"[
                {"close": 100.0, "supertrend": 1, "pullback": true, "mystery": 9.0},
                {"close": 101.5, "supertrend": -1}
            ]"#,
        )
        .unwrap();
        fs::write(dir.path().join("SPY_D.json"), r#"[{"close": 420.5}]"#).unwrap();
        fs::write(dir.path().join("vix.json"), "18.5").unwrap();
        dir
    }

    #[test]
    fn test_get_bars_returns_tail() {
        let dir = snapshot_dir();
        let market = SnapshotMarketData::new(dir.path(), "SPY");
        let frame = market.get_bars("SPY", Timeframe::FourHour, 1).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.current().num(Field::Close), 101.5);
    }

    #[test]
    fn test_unknown_columns_are_skipped() {
        let dir = snapshot_dir();
        let market = SnapshotMarketData::new(dir.path(), "SPY");
        let frame = market.get_bars("SPY", Timeframe::FourHour, 10).unwrap();
        assert_eq!(frame.len(), 2);
        let first = frame.row(0).unwrap();
        assert_eq!(first.num(Field::Close), 100.0);
        assert!(first.flag(Field::Pullback));
    }

    #[test]
    fn test_missing_symbol_is_no_data() {
        let dir = snapshot_dir();
        let market = SnapshotMarketData::new(dir.path(), "SPY");
        let err = market.get_bars("QQQ", Timeframe::Daily, 2).unwrap_err();
        assert!(matches!(err, ProviderError::NoData { .. }));
    }

    #[test]
    fn test_missing_one_hour_is_unsupported() {
        let dir = snapshot_dir();
        let market = SnapshotMarketData::new(dir.path(), "SPY");
        let err = market.get_bars("SPY", Timeframe::OneHour, 2).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::UnsupportedTimeframe(Timeframe::OneHour)
        ));
    }

    #[test]
    fn test_last_close_reads_daily_snapshot() {
        let dir = snapshot_dir();
        let market = SnapshotMarketData::new(dir.path(), "SPY");
        assert_eq!(market.get_last_close("SPY").unwrap(), 420.5);
    }

    #[test]
    fn test_vix_reads_scalar_file() {
        let dir = snapshot_dir();
        let market = SnapshotMarketData::new(dir.path(), "SPY");
        assert_eq!(market.get_vix().unwrap(), 18.5);
    }

    #[test]
    fn test_static_sentiment_is_neutral() {
        let sentiment = StaticSentiment;
        assert_eq!(sentiment.get_fear_greed().unwrap(), 50);
        assert_eq!(
            sentiment.get_news_sentiment("AAPL").unwrap(),
            NewsSentiment::Neutral
        );
    }

    #[test]
    fn test_no_earnings_reports_none() {
        let earnings = NoEarnings;
        assert_eq!(earnings.next_earnings("AAPL").unwrap(), None);
    }
}
