use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Price and indicator fields a bar row can carry.
///
/// Serialized as snake_case strings so frames round-trip through JSON
/// snapshot files produced by the indicator pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Close,
    Sma20,
    Sma50,
    Sma200,
    Adx,
    Rsi,
    MacdLine,
    MacdSignal,
    MacdHist,
    Supertrend,
    AvgVol,
    SessionVol,
    Volume,
    ObvSlope,
    BbPos,
    Pullback,
    Extended,
    GapUp,
    BearishPattern,
    TrendlineBreak,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::Close,
        Field::Sma20,
        Field::Sma50,
        Field::Sma200,
        Field::Adx,
        Field::Rsi,
        Field::MacdLine,
        Field::MacdSignal,
        Field::MacdHist,
        Field::Supertrend,
        Field::AvgVol,
        Field::SessionVol,
        Field::Volume,
        Field::ObvSlope,
        Field::BbPos,
        Field::Pullback,
        Field::Extended,
        Field::GapUp,
        Field::BearishPattern,
        Field::TrendlineBreak,
    ];

    /// Column name as it appears in snapshot files.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Close => "close",
            Field::Sma20 => "sma20",
            Field::Sma50 => "sma50",
            Field::Sma200 => "sma200",
            Field::Adx => "adx",
            Field::Rsi => "rsi",
            Field::MacdLine => "macd_line",
            Field::MacdSignal => "macd_signal",
            Field::MacdHist => "macd_hist",
            Field::Supertrend => "supertrend",
            Field::AvgVol => "avg_vol",
            Field::SessionVol => "session_vol",
            Field::Volume => "volume",
            Field::ObvSlope => "obv_slope",
            Field::BbPos => "bb_pos",
            Field::Pullback => "pullback",
            Field::Extended => "extended",
            Field::GapUp => "gap_up",
            Field::BearishPattern => "bearish_pattern",
            Field::TrendlineBreak => "trendline_break",
        }
    }

    /// Look up a field by column name. Unknown columns return None so
    /// providers can skip them instead of failing the whole frame.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Numeric default when the field is absent from a row. SuperTrend
    /// reads as neutral-bullish (+1), everything else as zero.
    pub fn default_num(&self) -> f64 {
        match self {
            Field::Supertrend => 1.0,
            _ => 0.0,
        }
    }
}

/// A single cell value: numeric for prices and indicators, boolean for
/// pattern flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Num(f64),
}

/// One time bar: a mapping from field to value.
///
/// Reads never fail. A missing numeric field yields its typed default
/// and a missing flag yields false, so scorers are total functions over
/// any row, including the all-default row of an empty frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar {
    cells: HashMap<Field, FieldValue>,
}

impl Bar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numeric read with the field's default when absent. Flags stored
    /// under a numeric field read as 0/1.
    pub fn num(&self, field: Field) -> f64 {
        match self.cells.get(&field) {
            Some(FieldValue::Num(v)) => *v,
            Some(FieldValue::Flag(true)) => 1.0,
            Some(FieldValue::Flag(false)) => 0.0,
            None => field.default_num(),
        }
    }

    /// Boolean read: absent is false. Numeric cells follow truthiness so
    /// files that store flags as 0/1 behave the same.
    pub fn flag(&self, field: Field) -> bool {
        match self.cells.get(&field) {
            Some(FieldValue::Flag(b)) => *b,
            Some(FieldValue::Num(v)) => *v != 0.0,
            None => false,
        }
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.cells.insert(field, value);
    }

    /// Builder-style numeric insert, used heavily by tests.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.cells.insert(field, FieldValue::Num(value));
        self
    }

    /// Builder-style flag insert.
    pub fn with_flag(mut self, field: Field, value: bool) -> Self {
        self.cells.insert(field, FieldValue::Flag(value));
        self
    }
}

/// Time-ordered bar rows, oldest first. The last row is the current
/// bar, the second-to-last the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarFrame {
    rows: Vec<Bar>,
}

impl BarFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Bar>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, bar: Bar) {
        self.rows.push(bar);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&Bar> {
        self.rows.get(idx)
    }

    /// The current (last) row. An empty frame reads as a single
    /// all-default row.
    pub fn current(&self) -> Bar {
        self.rows.last().cloned().unwrap_or_default()
    }

    /// The previous (second-to-last) row, falling back to the current
    /// row when the frame has fewer than two rows.
    pub fn previous(&self) -> Bar {
        if self.rows.len() >= 2 {
            self.rows[self.rows.len() - 2].clone()
        } else {
            self.current()
        }
    }

    /// The most recent `n` rows as a new frame.
    pub fn tail(&self, n: usize) -> BarFrame {
        let start = self.rows.len().saturating_sub(n);
        BarFrame {
            rows: self.rows[start..].to_vec(),
        }
    }
}
