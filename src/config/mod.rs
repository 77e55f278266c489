// Runtime configuration module
use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

/// How an upcoming earnings date affects new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarningsPolicy {
    #[default]
    BlockNew,
    Ignore,
}

impl EarningsPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EarningsPolicy::BlockNew => "BLOCK_NEW",
            EarningsPolicy::Ignore => "IGNORE",
        }
    }

    /// Parse a policy name. Unknown names keep the safe default of
    /// blocking new entries.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "BLOCK_NEW" => EarningsPolicy::BlockNew,
            "IGNORE" => EarningsPolicy::Ignore,
            other => {
                warn!("Unknown earnings policy {:?}; using BLOCK_NEW", other);
                EarningsPolicy::BlockNew
            }
        }
    }
}

/// All runtime knobs, loaded from `SWINGBOT_*` environment variables
/// with hard defaults so the binary runs with zero configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub universe_file: String,
    pub data_dir: String,
    pub run_interval_min: i64,
    pub timezone: String,
    pub portfolio_pct: f64,
    pub paper_balance: f64,
    pub entry_threshold: f64,
    pub exit_threshold: i32,
    pub watch_threshold: f64,
    pub regime_vix_tr: f64,
    pub regime_vix_ro: f64,
    pub adx_trend: f64,
    pub sentiment_fg_block: u8,
    pub sentiment_overheat_rsi: f64,
    pub news_sent_pos_bonus: f64,
    pub news_sent_neg_penalty: f64,
    pub earnings_policy: EarningsPolicy,
    pub earnings_block_days: i64,
    pub max_positions: usize,
    pub risk_per_trade: f64,
    pub regime_lookback: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            universe_file: "sp100.csv".to_string(),
            data_dir: "data".to_string(),
            run_interval_min: 60,
            timezone: "America/New_York".to_string(),
            portfolio_pct: 0.1,
            paper_balance: 100_000.0,
            entry_threshold: 70.0,
            exit_threshold: 15,
            watch_threshold: 55.0,
            regime_vix_tr: 22.0,
            regime_vix_ro: 26.0,
            adx_trend: 20.0,
            sentiment_fg_block: 25,
            sentiment_overheat_rsi: 70.0,
            news_sent_pos_bonus: 3.0,
            news_sent_neg_penalty: 5.0,
            earnings_policy: EarningsPolicy::BlockNew,
            earnings_block_days: 3,
            max_positions: 5,
            risk_per_trade: 0.01,
            regime_lookback: 60,
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults
    /// field by field. Unparsable values warn and keep the default.
    pub fn from_env() -> Self {
        let d = Settings::default();
        Self {
            universe_file: env_string("SWINGBOT_UNIVERSE_FILE", &d.universe_file),
            data_dir: env_string("SWINGBOT_DATA_DIR", &d.data_dir),
            run_interval_min: env_parse("SWINGBOT_RUN_INTERVAL_MIN", d.run_interval_min),
            timezone: env_string("SWINGBOT_TIMEZONE", &d.timezone),
            portfolio_pct: env_parse("SWINGBOT_PORTFOLIO_PCT", d.portfolio_pct),
            paper_balance: env_parse("SWINGBOT_PAPER_BALANCE", d.paper_balance),
            entry_threshold: env_parse("SWINGBOT_ENTRY_THRESHOLD", d.entry_threshold),
            exit_threshold: env_parse("SWINGBOT_EXIT_THRESHOLD", d.exit_threshold),
            watch_threshold: env_parse("SWINGBOT_WATCH_THRESHOLD", d.watch_threshold),
            regime_vix_tr: env_parse("SWINGBOT_REGIME_VIX_TR", d.regime_vix_tr),
            regime_vix_ro: env_parse("SWINGBOT_REGIME_VIX_RO", d.regime_vix_ro),
            adx_trend: env_parse("SWINGBOT_ADX_TREND", d.adx_trend),
            sentiment_fg_block: env_parse("SWINGBOT_SENTIMENT_FG_BLOCK", d.sentiment_fg_block),
            sentiment_overheat_rsi: env_parse(
                "SWINGBOT_SENTIMENT_OVERHEAT_RSI",
                d.sentiment_overheat_rsi,
            ),
            news_sent_pos_bonus: env_parse("SWINGBOT_NEWS_POS_BONUS", d.news_sent_pos_bonus),
            news_sent_neg_penalty: env_parse("SWINGBOT_NEWS_NEG_PENALTY", d.news_sent_neg_penalty),
            earnings_policy: match std::env::var("SWINGBOT_EARNINGS_POLICY") {
                Ok(raw) => EarningsPolicy::parse(&raw),
                Err(_) => d.earnings_policy,
            },
            earnings_block_days: env_parse("SWINGBOT_EARNINGS_BLOCK_DAYS", d.earnings_block_days),
            max_positions: env_parse("SWINGBOT_MAX_POSITIONS", d.max_positions),
            risk_per_trade: env_parse("SWINGBOT_RISK_PER_TRADE", d.risk_per_trade),
            regime_lookback: env_parse("SWINGBOT_REGIME_LOOKBACK", d.regime_lookback),
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr + Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Unparsable value {:?} for {}; using {}", raw, name, default);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.entry_threshold, 70.0);
        assert_eq!(s.exit_threshold, 15);
        assert_eq!(s.portfolio_pct, 0.1);
        assert_eq!(s.earnings_policy, EarningsPolicy::BlockNew);
        assert_eq!(s.timezone, "America/New_York");
        assert_eq!(s.max_positions, 5);
    }

    #[test]
    fn test_policy_parse_is_case_insensitive() {
        assert_eq!(EarningsPolicy::parse("ignore"), EarningsPolicy::Ignore);
        assert_eq!(EarningsPolicy::parse("Block_New"), EarningsPolicy::BlockNew);
    }

    #[test]
    fn test_unknown_policy_blocks() {
        assert_eq!(EarningsPolicy::parse("hold"), EarningsPolicy::BlockNew);
    }

    // Each env test touches its own variables so they stay independent
    // under the parallel test runner.

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("SWINGBOT_MAX_POSITIONS", "9");
        std::env::set_var("SWINGBOT_EARNINGS_POLICY", "IGNORE");
        let s = Settings::from_env();
        assert_eq!(s.max_positions, 9);
        assert_eq!(s.earnings_policy, EarningsPolicy::Ignore);
        std::env::remove_var("SWINGBOT_MAX_POSITIONS");
        std::env::remove_var("SWINGBOT_EARNINGS_POLICY");
    }

    #[test]
    fn test_unparsable_env_value_keeps_default() {
        std::env::set_var("SWINGBOT_RUN_INTERVAL_MIN", "soon");
        let s = Settings::from_env();
        assert_eq!(s.run_interval_min, 60);
        std::env::remove_var("SWINGBOT_RUN_INTERVAL_MIN");
    }
}
