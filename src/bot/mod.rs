// Trading cycle orchestration module
use std::collections::HashMap;

use anyhow::Context;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::{EarningsPolicy, Settings};
use crate::execution::{build_bracket, next_state, PositionState};
use crate::models::{Field, Order, OrderSide, SentimentSnapshot, Timeframe};
use crate::providers::{Broker, EarningsProvider, MarketData, SentimentProvider};
use crate::regime::{Regime, RegimeClassifier};
use crate::risk::portfolio_qty;
use crate::scoring::{compute_exit_score, EntryScorer};

/// Rows fetched for entry scoring and for the 4H/1H exit frames.
const SCORE_LOOKBACK: usize = 2;
/// Rows fetched for the daily exit frame.
const EXIT_DAILY_LOOKBACK: usize = 1;
/// Bracket levels relative to the entry price.
const STOP_PCT: f64 = 0.95;
const TARGET1_PCT: f64 = 1.02;
const TARGET2_PCT: f64 = 1.05;

/// Coordinator that pulls data, evaluates signals and places orders.
///
/// Holds one position state per symbol; the scorers and classifier do
/// the thinking, the bot only routes between them and the broker.
/// Symbols are processed one at a time, so a failing symbol never
/// touches another symbol's state.
pub struct TradingBot<M, B, S, E>
where
    M: MarketData,
    B: Broker,
    S: SentimentProvider,
    E: EarningsProvider,
{
    market_data: M,
    broker: B,
    sentiment: S,
    earnings: E,
    classifier: RegimeClassifier,
    scorer: EntryScorer,
    entry_threshold: f64,
    exit_threshold: i32,
    portfolio_pct: f64,
    earnings_policy: EarningsPolicy,
    earnings_block_days: i64,
    max_positions: usize,
    regime_lookback: usize,
    regime: Regime,
    positions: HashMap<String, PositionState>,
    position_sizes: HashMap<String, i64>,
}

impl<M, B, S, E> TradingBot<M, B, S, E>
where
    M: MarketData,
    B: Broker,
    S: SentimentProvider,
    E: EarningsProvider,
{
    pub fn new(market_data: M, broker: B, sentiment: S, earnings: E, settings: &Settings) -> Self {
        let classifier = RegimeClassifier::new(
            settings.regime_vix_tr,
            settings.regime_vix_ro,
            settings.adx_trend,
        );
        let scorer = EntryScorer::new(
            Default::default(),
            settings.sentiment_fg_block,
            settings.sentiment_overheat_rsi,
            settings.news_sent_pos_bonus,
            settings.news_sent_neg_penalty,
        );
        Self {
            market_data,
            broker,
            sentiment,
            earnings,
            classifier,
            scorer,
            entry_threshold: settings.entry_threshold,
            exit_threshold: settings.exit_threshold,
            portfolio_pct: settings.portfolio_pct,
            earnings_policy: settings.earnings_policy,
            earnings_block_days: settings.earnings_block_days,
            max_positions: settings.max_positions,
            regime_lookback: settings.regime_lookback,
            regime: Regime::default(),
            positions: HashMap::new(),
            position_sizes: HashMap::new(),
        }
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Current state for a symbol; unseen symbols read as `Init`.
    pub fn state(&self, symbol: &str) -> PositionState {
        self.positions.get(symbol).copied().unwrap_or_default()
    }

    /// Recorded share count for a symbol, if it holds a position.
    pub fn position_size(&self, symbol: &str) -> Option<i64> {
        self.position_sizes.get(symbol).copied()
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Reclassify the market regime from the reference symbol's 4H
    /// frame and the volatility index. Provider failures keep the
    /// previous regime; a boundary is never aborted over it.
    pub fn refresh_regime(&mut self) -> Regime {
        let reference = self.market_data.get_reference_symbol();
        let fetched = self
            .market_data
            .get_bars(&reference, Timeframe::FourHour, self.regime_lookback)
            .and_then(|frame| self.market_data.get_vix().map(|vix| (frame, vix)));
        match fetched {
            Ok((frame, vix)) => {
                let next = self.classifier.detect_regime(&frame, vix);
                if next != self.regime {
                    info!("Regime change: {} -> {}", self.regime, next);
                }
                self.regime = next;
            }
            Err(e) => {
                warn!("Regime refresh failed ({}); keeping {}", e, self.regime);
            }
        }
        self.regime
    }

    /// Run one evaluation cycle for a symbol: entry check from `Init`,
    /// exit check from `Filled`/`Managed`, no-op otherwise.
    pub fn run_cycle(&mut self, symbol: &str) -> anyhow::Result<()> {
        match self.state(symbol) {
            PositionState::Init => self.attempt_entry(symbol),
            PositionState::Filled | PositionState::Managed => self.check_exit(symbol),
            _ => Ok(()),
        }
    }

    fn attempt_entry(&mut self, symbol: &str) -> anyhow::Result<()> {
        // 1. Earnings gate
        if self.blocked_by_earnings(symbol)? {
            info!(
                "Skipping {}: earnings within {} days",
                symbol, self.earnings_block_days
            );
            return Ok(());
        }

        // 2. Open-position cap
        if self.open_positions() >= self.max_positions {
            debug!(
                "Skipping {}: {} open positions at the cap",
                symbol, self.max_positions
            );
            return Ok(());
        }

        // 3. Score the setup
        let daily = self
            .market_data
            .get_bars(symbol, Timeframe::Daily, SCORE_LOOKBACK)
            .with_context(|| format!("daily bars for {}", symbol))?;
        let h4 = self
            .market_data
            .get_bars(symbol, Timeframe::FourHour, SCORE_LOOKBACK)
            .with_context(|| format!("4H bars for {}", symbol))?;
        let snapshot = self.sentiment_snapshot(symbol)?;
        let (score, _) = self.scorer.score(&daily, &h4, self.regime, &snapshot);
        if score < self.entry_threshold {
            debug!(
                "{} entry score {:.2} below threshold {:.2}",
                symbol, score, self.entry_threshold
            );
            return Ok(());
        }

        // 4. Size and place the bracket
        let price = daily.current().num(Field::Close);
        let balance = self.broker.get_balance()?;
        let qty = portfolio_qty(balance, self.portfolio_pct, price);
        if qty <= 0 {
            warn!("{} sized to zero shares at {:.2}; skipping", symbol, price);
            return Ok(());
        }
        let bracket = build_bracket(
            symbol,
            qty,
            price,
            price * STOP_PCT,
            price * TARGET1_PCT,
            price * TARGET2_PCT,
        );
        for order in bracket.orders() {
            self.broker.place_order(order)?;
        }
        info!(
            "🚀 Entered {} x{} @ {:.2} (score {:.2}, regime {})",
            symbol, qty, price, score, self.regime
        );

        self.positions
            .insert(symbol.to_string(), next_state(PositionState::Init, true, false));
        self.position_sizes.insert(symbol.to_string(), qty);
        Ok(())
    }

    fn check_exit(&mut self, symbol: &str) -> anyhow::Result<()> {
        let h4 = self
            .market_data
            .get_bars(symbol, Timeframe::FourHour, SCORE_LOOKBACK)
            .with_context(|| format!("4H bars for {}", symbol))?;
        let daily = self
            .market_data
            .get_bars(symbol, Timeframe::Daily, EXIT_DAILY_LOOKBACK)
            .with_context(|| format!("daily bars for {}", symbol))?;
        let h1 = self
            .market_data
            .get_bars(symbol, Timeframe::OneHour, SCORE_LOOKBACK)
            .with_context(|| format!("1H bars for {}", symbol))?;

        let comp = compute_exit_score(&h4, &daily, &h1);
        if comp.total < self.exit_threshold {
            return Ok(());
        }
        let qty = self.position_sizes.get(symbol).copied().unwrap_or(0);
        if qty <= 0 {
            debug!("{} exit signal without a recorded position size", symbol);
            return Ok(());
        }

        let price = daily.current().num(Field::Close);
        let order = Order::new(symbol, qty, OrderSide::Sell, price);
        self.broker.place_order(&order)?;
        info!(
            "🏁 Exited {} x{} @ {:.2} (exit score {})",
            symbol, qty, price, comp.total
        );

        // The exit event is acknowledged from Managed so a position
        // closed straight out of Filled still lands on Exited.
        self.positions
            .insert(symbol.to_string(), next_state(PositionState::Managed, false, true));
        self.position_sizes.remove(symbol);
        Ok(())
    }

    fn sentiment_snapshot(&self, symbol: &str) -> anyhow::Result<SentimentSnapshot> {
        let fg = self.sentiment.get_fear_greed().context("fear/greed lookup")?;
        let news = self
            .sentiment
            .get_news_sentiment(symbol)
            .with_context(|| format!("news sentiment for {}", symbol))?;
        Ok(SentimentSnapshot::new(Some(fg), news))
    }

    fn blocked_by_earnings(&self, symbol: &str) -> anyhow::Result<bool> {
        if self.earnings_policy != EarningsPolicy::BlockNew {
            return Ok(false);
        }
        let next = self
            .earnings
            .next_earnings(symbol)
            .with_context(|| format!("earnings date for {}", symbol))?;
        let Some(next) = next else {
            return Ok(false);
        };
        let now = Utc::now();
        Ok(next >= now && next <= now + Duration::days(self.earnings_block_days))
    }

    fn open_positions(&self) -> usize {
        self.positions
            .values()
            .filter(|s| matches!(s, PositionState::Filled | PositionState::Managed))
            .count()
    }
}
