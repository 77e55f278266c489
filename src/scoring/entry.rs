/// Entry scoring: additive component rules over the daily and 4H
/// frames, per-component regime multipliers, then sentiment
/// adjustments. The final score always lands in [0, 100].
use tracing::debug;

use crate::models::{Bar, BarFrame, Field, NewsSentiment, SentimentSnapshot};
use crate::regime::Regime;

/// RSI band that earns the momentum bonus.
const RSI_BAND_LOW: f64 = 55.0;
const RSI_BAND_HIGH: f64 = 70.0;
/// RSI above this is penalized as overbought.
const RSI_OVERBOUGHT: f64 = 75.0;
/// Average volume floor for the liquidity bonus.
const LIQUIDITY_FLOOR: f64 = 1_000_000.0;
/// Session volume must beat this multiple of the average.
const SESSION_VOL_MULT: f64 = 1.2;
/// 4H RSI must sit above this (and be rising) for its bonus.
const H4_RSI_FLOOR: f64 = 55.0;
/// Bollinger position threshold for the location bonus.
const BB_POS_MIN: f64 = 0.5;

/// Fear & Greed caution band and the hot-market level. The band
/// penalty and the overheat penalty are both fixed at 5 points; only
/// the hard-block level and the overheat RSI are configurable.
const FG_CAUTION_LOW: u8 = 25;
const FG_CAUTION_HIGH: u8 = 45;
const FG_HOT: u8 = 80;
const FG_PENALTY: f64 = 5.0;

/// Point values for each entry rule.
#[derive(Debug, Clone)]
pub struct EntryWeights {
    pub close_above_sma200: f64,
    pub close_above_sma50: f64,
    pub sma50_above_sma200: f64,
    pub daily_supertrend: f64,
    pub h4_supertrend: f64,
    pub rsi_in_band: f64,
    pub macd_bullish: f64,
    pub macd_hist_rising: f64,
    pub h4_rsi_rising: f64,
    pub liquidity: f64,
    pub session_volume: f64,
    pub obv_rising: f64,
    pub pullback: f64,
    pub bb_position: f64,
    pub overbought_penalty: f64,
    pub extended_penalty: f64,
    pub gap_up_penalty: f64,
}

impl Default for EntryWeights {
    fn default() -> Self {
        Self {
            close_above_sma200: 12.0,
            close_above_sma50: 10.0,
            sma50_above_sma200: 10.0,
            daily_supertrend: 8.0,
            h4_supertrend: 5.0,
            rsi_in_band: 10.0,
            macd_bullish: 8.0,
            macd_hist_rising: 6.0,
            h4_rsi_rising: 6.0,
            liquidity: 5.0,
            session_volume: 6.0,
            obv_rising: 4.0,
            pullback: 6.0,
            bb_position: 4.0,
            overbought_penalty: 5.0,
            extended_penalty: 6.0,
            gap_up_penalty: 3.0,
        }
    }
}

/// Component breakdown kept alongside the score for observability.
/// Trend, momentum, volume and setup are post-multiplier values;
/// penalties carry no multiplier and are always <= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntryComponents {
    pub trend: f64,
    pub momentum: f64,
    pub volume: f64,
    pub setup: f64,
    pub penalties: f64,
}

/// Per-component multipliers keyed by regime.
#[derive(Debug, Clone, Copy)]
pub struct RegimeMultipliers {
    pub trend: f64,
    pub momentum: f64,
    pub volume: f64,
    pub setup: f64,
}

impl RegimeMultipliers {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Trending => Self {
                trend: 1.15,
                momentum: 1.10,
                volume: 1.0,
                setup: 0.90,
            },
            Regime::Ranging => Self {
                trend: 0.85,
                momentum: 0.95,
                volume: 1.0,
                setup: 1.20,
            },
            Regime::RiskOff => Self {
                trend: 0.90,
                momentum: 0.85,
                volume: 0.90,
                setup: 0.80,
            },
        }
    }
}

pub struct EntryScorer {
    weights: EntryWeights,
    fg_block: u8,
    overheat_rsi: f64,
    news_pos_bonus: f64,
    news_neg_penalty: f64,
}

impl Default for EntryScorer {
    fn default() -> Self {
        Self {
            weights: EntryWeights::default(),
            fg_block: 25,
            overheat_rsi: 70.0,
            news_pos_bonus: 3.0,
            news_neg_penalty: 5.0,
        }
    }
}

impl EntryScorer {
    pub fn new(
        weights: EntryWeights,
        fg_block: u8,
        overheat_rsi: f64,
        news_pos_bonus: f64,
        news_neg_penalty: f64,
    ) -> Self {
        Self {
            weights,
            fg_block,
            overheat_rsi,
            news_pos_bonus,
            news_neg_penalty,
        }
    }

    /// Score an entry opportunity.
    ///
    /// Aggregation: component sum is capped at 100 before penalties,
    /// floored at 0 after them, then sentiment adjustments apply and
    /// the result is clamped to [0, 100].
    pub fn score(
        &self,
        daily: &BarFrame,
        h4: &BarFrame,
        regime: Regime,
        sentiment: &SentimentSnapshot,
    ) -> (f64, EntryComponents) {
        let d0 = daily.current();
        let d1 = daily.previous();
        let h0 = h4.current();
        let h1 = h4.previous();

        let w = &self.weights;
        let mut trend = 0.0;
        let mut momentum = 0.0;
        let mut volume = 0.0;
        let mut setup = 0.0;
        let mut penalties = 0.0;

        // Trend
        if d0.num(Field::Close) > d0.num(Field::Sma200) {
            trend += w.close_above_sma200;
        }
        if d0.num(Field::Close) > d0.num(Field::Sma50) {
            trend += w.close_above_sma50;
        }
        if d0.num(Field::Sma50) > d0.num(Field::Sma200) {
            trend += w.sma50_above_sma200;
        }
        if d0.num(Field::Supertrend) > 0.0 {
            trend += w.daily_supertrend;
        }
        if h0.num(Field::Supertrend) > 0.0 {
            trend += w.h4_supertrend;
        }

        // Momentum
        let rsi = d0.num(Field::Rsi);
        if (RSI_BAND_LOW..=RSI_BAND_HIGH).contains(&rsi) {
            momentum += w.rsi_in_band;
        }
        if rsi > RSI_OVERBOUGHT {
            penalties -= w.overbought_penalty;
        }
        if d0.num(Field::MacdLine) > d0.num(Field::MacdSignal) {
            momentum += w.macd_bullish;
        }
        let hist = d0.num(Field::MacdHist);
        if hist > 0.0 && hist > d1.num(Field::MacdHist) {
            momentum += w.macd_hist_rising;
        }
        let h4_rsi = h0.num(Field::Rsi);
        if h4_rsi > H4_RSI_FLOOR && h4_rsi > h1.num(Field::Rsi) {
            momentum += w.h4_rsi_rising;
        }

        // Volume
        let avg_vol = d0.num(Field::AvgVol);
        if avg_vol >= LIQUIDITY_FLOOR {
            volume += w.liquidity;
        }
        if avg_vol > 0.0 && d0.num(Field::SessionVol) >= SESSION_VOL_MULT * avg_vol {
            volume += w.session_volume;
        }
        if d0.num(Field::ObvSlope) > 0.0 {
            volume += w.obv_rising;
        }

        // Setup / location
        if d0.flag(Field::Pullback) {
            setup += w.pullback;
        }
        if d0.num(Field::BbPos) >= BB_POS_MIN {
            setup += w.bb_position;
        }

        // Penalties
        if d0.flag(Field::Extended) {
            penalties -= w.extended_penalty;
        }
        if d0.flag(Field::GapUp) {
            penalties -= w.gap_up_penalty;
        }

        let mult = RegimeMultipliers::for_regime(regime);
        let components = EntryComponents {
            trend: trend * mult.trend,
            momentum: momentum * mult.momentum,
            volume: volume * mult.volume,
            setup: setup * mult.setup,
            penalties,
        };

        let mut score =
            components.trend + components.momentum + components.volume + components.setup;
        score = score.min(100.0);
        score += components.penalties;
        score = score.max(0.0);

        score = self.apply_sentiment(score, &d0, regime, sentiment);
        let score = score.clamp(0.0, 100.0);
        debug!(
            "Entry score {:.2} under {}: trend {:.2} momentum {:.2} volume {:.2} setup {:.2} penalties {:.2}",
            score,
            regime,
            components.trend,
            components.momentum,
            components.volume,
            components.setup,
            components.penalties
        );
        (score, components)
    }

    /// Fear & Greed below the block level and negative news under
    /// risk-off are hard vetoes; everything else nudges the score.
    fn apply_sentiment(
        &self,
        mut score: f64,
        d0: &Bar,
        regime: Regime,
        sentiment: &SentimentSnapshot,
    ) -> f64 {
        if let Some(fg) = sentiment.fg {
            if fg < self.fg_block {
                return 0.0;
            }
            if (FG_CAUTION_LOW..=FG_CAUTION_HIGH).contains(&fg) {
                score -= FG_PENALTY;
            }
            if fg > FG_HOT && d0.num(Field::Rsi) > self.overheat_rsi {
                score -= FG_PENALTY;
            }
        }
        match sentiment.news {
            NewsSentiment::Pos => score += self.news_pos_bonus,
            NewsSentiment::Neg => {
                if regime == Regime::RiskOff {
                    return 0.0;
                }
                score -= self.news_neg_penalty;
            }
            NewsSentiment::Neutral => {}
        }
        score
    }
}
