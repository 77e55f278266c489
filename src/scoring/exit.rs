/// Exit scoring: nine fixed-weight bearish flags across the 4H, daily
/// and 1H frames. The total is a plain integer sum, max 15, compared by
/// callers against an external exit threshold.
use crate::models::{BarFrame, Field};

const H4_SUPERTREND_FLIP: i32 = 3;
const H4_MACD_CROSS: i32 = 2;
const H4_CLOSE_BELOW_SMA20: i32 = 1;
const H4_RSI_BELOW_50: i32 = 1;
const H4_BEARISH_PATTERN: i32 = 1;
const D1_CLOSE_BELOW_SMA50: i32 = 2;
const D1_VOLUME_SPIKE: i32 = 2;
const D1_TRENDLINE_BREAK: i32 = 2;
const H1_ACCEL_CONFIRMATION: i32 = 1;

/// Volume above this multiple of the average counts as a spike.
const VOLUME_SPIKE_MULT: f64 = 1.5;
const RSI_EXIT_LEVEL: f64 = 50.0;

/// Per-flag contributions plus their sum. Each field is either zero or
/// its fixed weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitComponents {
    pub h4_supertrend_flip: i32,
    pub h4_macd_cross: i32,
    pub h4_close_below_sma20: i32,
    pub h4_rsi_below_50: i32,
    pub h4_bearish_pattern: i32,
    pub d1_close_below_sma50: i32,
    pub d1_volume_spike: i32,
    pub d1_trendline_break: i32,
    pub h1_accel_confirmation: i32,
    pub total: i32,
}

impl ExitComponents {
    /// Sum of the nine flag contributions; always equals `total`.
    pub fn sum(&self) -> i32 {
        self.h4_supertrend_flip
            + self.h4_macd_cross
            + self.h4_close_below_sma20
            + self.h4_rsi_below_50
            + self.h4_bearish_pattern
            + self.d1_close_below_sma50
            + self.d1_volume_spike
            + self.d1_trendline_break
            + self.h1_accel_confirmation
    }
}

/// Compute the exit score from the 4H, daily and 1H frames.
///
/// Every flag compares the current row against the previous one where
/// direction matters, with the usual missing-field defaults. The 1H
/// acceleration confirmation needs at least two 1H rows.
pub fn compute_exit_score(h4: &BarFrame, daily: &BarFrame, h1: &BarFrame) -> ExitComponents {
    let mut comp = ExitComponents::default();

    let c4 = h4.current();
    let p4 = h4.previous();

    if c4.num(Field::Supertrend) < 0.0 && p4.num(Field::Supertrend) > 0.0 {
        comp.h4_supertrend_flip = H4_SUPERTREND_FLIP;
    }
    if c4.num(Field::MacdLine) < c4.num(Field::MacdSignal)
        && p4.num(Field::MacdLine) >= p4.num(Field::MacdSignal)
    {
        comp.h4_macd_cross = H4_MACD_CROSS;
    }
    if c4.num(Field::Close) < c4.num(Field::Sma20) {
        comp.h4_close_below_sma20 = H4_CLOSE_BELOW_SMA20;
    }
    if c4.num(Field::Rsi) < RSI_EXIT_LEVEL && p4.num(Field::Rsi) >= RSI_EXIT_LEVEL {
        comp.h4_rsi_below_50 = H4_RSI_BELOW_50;
    }
    if c4.flag(Field::BearishPattern) {
        comp.h4_bearish_pattern = H4_BEARISH_PATTERN;
    }

    let d0 = daily.current();
    if d0.num(Field::Close) < d0.num(Field::Sma50) {
        comp.d1_close_below_sma50 = D1_CLOSE_BELOW_SMA50;
    }
    let avg_vol = d0.num(Field::AvgVol);
    if avg_vol > 0.0 && d0.num(Field::Volume) > VOLUME_SPIKE_MULT * avg_vol {
        comp.d1_volume_spike = D1_VOLUME_SPIKE;
    }
    if d0.flag(Field::TrendlineBreak) {
        comp.d1_trendline_break = D1_TRENDLINE_BREAK;
    }

    // 1H confirmation: SuperTrend flip and MACD cross must land on the
    // same pair of rows
    if h1.len() >= 2 {
        let c1 = h1.current();
        let p1 = h1.previous();
        let st_flip = c1.num(Field::Supertrend) < 0.0 && p1.num(Field::Supertrend) > 0.0;
        let macd_cross = c1.num(Field::MacdLine) < c1.num(Field::MacdSignal)
            && p1.num(Field::MacdLine) >= p1.num(Field::MacdSignal);
        if st_flip && macd_cross {
            comp.h1_accel_confirmation = H1_ACCEL_CONFIRMATION;
        }
    }

    comp.total = comp.sum();
    comp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;

    fn bearish_h4() -> BarFrame {
        BarFrame::from_rows(vec![
            Bar::new()
                .with(Field::Supertrend, 1.0)
                .with(Field::MacdLine, 1.0)
                .with(Field::MacdSignal, 0.0)
                .with(Field::Close, 105.0)
                .with(Field::Sma20, 100.0)
                .with(Field::Rsi, 55.0)
                .with_flag(Field::BearishPattern, false),
            Bar::new()
                .with(Field::Supertrend, -1.0)
                .with(Field::MacdLine, -1.0)
                .with(Field::MacdSignal, 0.0)
                .with(Field::Close, 95.0)
                .with(Field::Sma20, 100.0)
                .with(Field::Rsi, 45.0)
                .with_flag(Field::BearishPattern, true),
        ])
    }

    fn bearish_daily() -> BarFrame {
        BarFrame::from_rows(vec![Bar::new()
            .with(Field::Close, 110.0)
            .with(Field::Sma50, 115.0)
            .with(Field::Volume, 2_000_000.0)
            .with(Field::AvgVol, 1_000_000.0)
            .with_flag(Field::TrendlineBreak, true)])
    }

    fn bearish_h1(macd_cross: bool) -> BarFrame {
        let curr_macd = if macd_cross { -1.0 } else { 1.0 };
        BarFrame::from_rows(vec![
            Bar::new()
                .with(Field::Supertrend, 1.0)
                .with(Field::MacdLine, 1.0)
                .with(Field::MacdSignal, 0.0),
            Bar::new()
                .with(Field::Supertrend, -1.0)
                .with(Field::MacdLine, curr_macd)
                .with(Field::MacdSignal, 0.0),
        ])
    }

    #[test]
    fn test_full_score_with_confirmation() {
        let comp = compute_exit_score(&bearish_h4(), &bearish_daily(), &bearish_h1(true));
        assert_eq!(comp.total, 15);
        assert_eq!(comp.h1_accel_confirmation, 1);
        assert_eq!(comp.total, comp.sum());
    }

    #[test]
    fn test_no_confirmation_without_macd_cross() {
        let comp = compute_exit_score(&bearish_h4(), &bearish_daily(), &bearish_h1(false));
        assert_eq!(comp.h1_accel_confirmation, 0);
        assert_eq!(comp.total, 14);
    }

    #[test]
    fn test_single_1h_row_cannot_confirm() {
        let h1 = BarFrame::from_rows(vec![Bar::new()
            .with(Field::Supertrend, -1.0)
            .with(Field::MacdLine, -1.0)
            .with(Field::MacdSignal, 0.0)]);
        let comp = compute_exit_score(&bearish_h4(), &bearish_daily(), &h1);
        assert_eq!(comp.h1_accel_confirmation, 0);
    }

    #[test]
    fn test_zero_average_volume_never_spikes() {
        let daily = BarFrame::from_rows(vec![Bar::new()
            .with(Field::Volume, 2_000_000.0)
            .with(Field::AvgVol, 0.0)
            .with(Field::Close, 100.0)
            .with(Field::Sma50, 90.0)]);
        let comp = compute_exit_score(&BarFrame::new(), &daily, &BarFrame::new());
        assert_eq!(comp.d1_volume_spike, 0);
    }

    #[test]
    fn test_empty_frames_score_zero() {
        let comp = compute_exit_score(&BarFrame::new(), &BarFrame::new(), &BarFrame::new());
        assert_eq!(comp.total, 0);
        assert_eq!(comp, ExitComponents::default());
    }

    #[test]
    fn test_rsi_must_cross_not_just_sit_below() {
        // Both rows already under 50: no fresh cross
        let h4 = BarFrame::from_rows(vec![
            Bar::new().with(Field::Rsi, 45.0),
            Bar::new().with(Field::Rsi, 40.0),
        ]);
        let comp = compute_exit_score(&h4, &BarFrame::new(), &BarFrame::new());
        assert_eq!(comp.h4_rsi_below_50, 0);
    }

    #[test]
    fn test_supertrend_must_flip_not_just_be_bearish() {
        let h4 = BarFrame::from_rows(vec![
            Bar::new().with(Field::Supertrend, -1.0),
            Bar::new().with(Field::Supertrend, -1.0),
        ]);
        let comp = compute_exit_score(&h4, &BarFrame::new(), &BarFrame::new());
        assert_eq!(comp.h4_supertrend_flip, 0);
    }
}
