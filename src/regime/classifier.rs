/// Market regime classifier over the reference symbol's 4H frame plus
/// the volatility index.
///
/// Ordered rules, first match wins:
/// - Risk-off: price below the 200 SMA, or VIX at/above the risk-off level
/// - Trending: close > SMA50 > SMA200 with ADX strength and a calm VIX
/// - Ranging: flat 50 SMA slope, weak ADX, VIX in the middle band
/// - Default: Trending

use crate::models::{BarFrame, Field};

/// How far back the ranging-slope test reaches.
const SLOPE_WINDOW: usize = 20;
/// Slope below this fraction per window counts as flat.
const SLOPE_FLAT_MAX: f64 = 0.0005;
/// VIX floor for the ranging verdict.
const RANGE_VIX_FLOOR: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Regime {
    #[default]
    Trending,
    Ranging,
    RiskOff,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Trending => "TR",
            Regime::Ranging => "RG",
            Regime::RiskOff => "RO",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct RegimeClassifier {
    vix_trending: f64,
    vix_risk_off: f64,
    adx_trend: f64,
}

impl Default for RegimeClassifier {
    fn default() -> Self {
        Self {
            vix_trending: 22.0,
            vix_risk_off: 26.0,
            adx_trend: 20.0,
        }
    }
}

impl RegimeClassifier {
    pub fn new(vix_trending: f64, vix_risk_off: f64, adx_trend: f64) -> Self {
        Self {
            vix_trending,
            vix_risk_off,
            adx_trend,
        }
    }

    /// Classify the current regime from the reference 4H frame and VIX.
    ///
    /// Total over any input: missing columns read as their defaults and
    /// short frames simply cannot produce a Ranging verdict.
    pub fn detect_regime(&self, frame: &BarFrame, vix: f64) -> Regime {
        let row = frame.current();
        let close = row.num(Field::Close);
        let sma50 = row.num(Field::Sma50);
        let sma200 = row.num(Field::Sma200);
        let adx = row.num(Field::Adx);

        // 1. Risk-off if price < 200 SMA or VIX at the risk-off level
        if close < sma200 || vix >= self.vix_risk_off {
            return Regime::RiskOff;
        }

        // 2. Trending: stacked SMAs, trend-strength ADX, calm VIX
        if close > sma50 && sma50 > sma200 && adx >= self.adx_trend && vix < self.vix_trending {
            return Regime::Trending;
        }

        // 3. Ranging: flat 50 SMA slope, weak ADX, mid-band VIX
        if self.sma50_is_flat(frame)
            && adx < self.adx_trend
            && (RANGE_VIX_FLOOR..self.vix_risk_off).contains(&vix)
        {
            return Regime::Ranging;
        }

        Regime::Trending
    }

    /// Normalized 50 SMA drift over the slope window. Frames shorter
    /// than the window and non-positive base values never count as
    /// flat, so the ranging verdict stays unreachable for them.
    fn sma50_is_flat(&self, frame: &BarFrame) -> bool {
        if frame.len() < SLOPE_WINDOW {
            return false;
        }
        let base = match frame.row(frame.len() - SLOPE_WINDOW) {
            Some(bar) => bar.num(Field::Sma50),
            None => return false,
        };
        if base <= 0.0 {
            return false;
        }
        let last = frame.current().num(Field::Sma50);
        let slope = (last - base).abs() / (SLOPE_WINDOW as f64 * base);
        slope < SLOPE_FLAT_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;

    fn reference_frame(close: f64, sma50: f64, sma200: f64, adx: f64, rows: usize) -> BarFrame {
        let bar = Bar::new()
            .with(Field::Close, close)
            .with(Field::Sma50, sma50)
            .with(Field::Sma200, sma200)
            .with(Field::Adx, adx);
        BarFrame::from_rows(vec![bar; rows])
    }

    #[test]
    fn test_trending() {
        let frame = reference_frame(110.0, 100.0, 90.0, 25.0, 25);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 15.0), Regime::Trending);
    }

    #[test]
    fn test_ranging_on_flat_sma50() {
        // Constant SMA50 gives a zero slope; close == sma50 rules out Trending
        let frame = reference_frame(100.0, 100.0, 90.0, 10.0, 25);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 20.0), Regime::Ranging);
    }

    #[test]
    fn test_risk_off_on_price_below_sma200() {
        let frame = reference_frame(80.0, 100.0, 90.0, 25.0, 25);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 15.0), Regime::RiskOff);
    }

    #[test]
    fn test_risk_off_on_elevated_vix() {
        // Bullish structure but VIX at the risk-off threshold wins
        let frame = reference_frame(110.0, 100.0, 90.0, 25.0, 25);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 30.0), Regime::RiskOff);
    }

    #[test]
    fn test_short_frame_cannot_range() {
        let frame = reference_frame(100.0, 100.0, 90.0, 10.0, 5);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 20.0), Regime::Trending);
    }

    #[test]
    fn test_low_vix_falls_through_to_trending_default() {
        // Flat and weak-ADX but VIX below the ranging floor
        let frame = reference_frame(100.0, 100.0, 90.0, 10.0, 25);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 15.0), Regime::Trending);
    }

    #[test]
    fn test_non_positive_sma50_base_cannot_range() {
        let frame = reference_frame(100.0, 0.0, 0.0, 10.0, 25);
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.detect_regime(&frame, 20.0), Regime::Trending);
    }

    #[test]
    fn test_custom_thresholds() {
        let frame = reference_frame(110.0, 100.0, 90.0, 25.0, 25);
        // Tighter risk-off threshold flips the same inputs to RiskOff
        let classifier = RegimeClassifier::new(12.0, 14.0, 20.0);
        assert_eq!(classifier.detect_regime(&frame, 15.0), Regime::RiskOff);
    }
}
