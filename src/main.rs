use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use clap::Parser;

use swingbot::bot::TradingBot;
use swingbot::config::Settings;
use swingbot::providers::{
    Broker, EarningsProvider, MarketData, NoEarnings, PaperBroker, SentimentProvider,
    SnapshotMarketData, StaticSentiment,
};
use swingbot::scheduler::CycleScheduler;
use swingbot::universe::load_universe;
use swingbot::Result;

/// Market benchmark used for regime classification.
const REFERENCE_SYMBOL: &str = "SPY";

#[derive(Parser, Debug)]
#[command(name = "swingbot", about = "Rule-based swing trading signal engine")]
struct Cli {
    /// Run one boundary cycle immediately and exit.
    #[arg(long)]
    once: bool,

    /// Universe CSV path, overriding SWINGBOT_UNIVERSE_FILE.
    #[arg(long)]
    universe: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Next local top-of-hour, so wake-ups land on minute zero where the
/// 4H boundaries live.
fn next_hour_mark(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = now.with_timezone(&tz);
    let truncated = local
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(local);
    (truncated + Duration::hours(1)).with_timezone(&Utc)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();
    let cli = Cli::parse();

    tracing::info!("🚀 SwingBot starting");

    let settings = Settings::from_env();
    log_settings(&settings);

    let universe_file = cli
        .universe
        .unwrap_or_else(|| settings.universe_file.clone());
    let symbols = load_universe(&universe_file)?;
    if symbols.is_empty() {
        return Err(format!("No symbols in universe file {}", universe_file).into());
    }
    tracing::info!("✅ Universe loaded: {} symbols", symbols.len());

    let market_data = SnapshotMarketData::new(&settings.data_dir, REFERENCE_SYMBOL);
    let broker = PaperBroker::new(settings.paper_balance);
    let mut bot = TradingBot::new(market_data, broker, StaticSentiment, NoEarnings, &settings);
    let mut scheduler = CycleScheduler::new(&settings.timezone, settings.run_interval_min);

    if cli.once {
        run_boundary_cycle(&mut bot, &symbols);
        tracing::info!("👋 SwingBot stopped (single cycle)");
        return Ok(());
    }

    tracing::info!("Press Ctrl+C to stop...");

    loop {
        let now = Utc::now();
        if scheduler.should_run_primary(now) {
            run_boundary_cycle(&mut bot, &symbols);
        }

        let wake = scheduler
            .next_run(now)
            .min(next_hour_mark(now, scheduler.timezone()));
        let sleep_for = (wake - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(1));

        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("⚠️  Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    tracing::info!("👋 SwingBot stopped");
    Ok(())
}

// ============================================================================
// Initialization Functions
// ============================================================================

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("swingbot=info,swingbot::scoring=debug")
        .init();
}

fn log_settings(settings: &Settings) {
    tracing::info!("\n📊 Configuration:");
    tracing::info!("  Universe file: {}", settings.universe_file);
    tracing::info!("  Data dir: {}", settings.data_dir);
    tracing::info!("  Timezone: {}", settings.timezone);
    tracing::info!("  Run interval: {} min", settings.run_interval_min);
    tracing::info!(
        "  Entry threshold: {:.1} (watch {:.1})",
        settings.entry_threshold,
        settings.watch_threshold
    );
    tracing::info!("  Exit threshold: {}", settings.exit_threshold);
    tracing::info!("  Portfolio fraction: {:.2}", settings.portfolio_pct);
    tracing::info!("  Paper balance: ${:.2}", settings.paper_balance);
    tracing::info!("  Max positions: {}", settings.max_positions);
    tracing::info!(
        "  Earnings policy: {} ({} days)",
        settings.earnings_policy.as_str(),
        settings.earnings_block_days
    );
}

// ============================================================================
// Cycle Functions
// ============================================================================

/// Run one full 4H boundary: refresh the regime once, then evaluate
/// every symbol. A failing symbol is logged and the cycle moves on.
fn run_boundary_cycle<M, B, S, E>(bot: &mut TradingBot<M, B, S, E>, symbols: &[String])
where
    M: MarketData,
    B: Broker,
    S: SentimentProvider,
    E: EarningsProvider,
{
    let regime = bot.refresh_regime();
    tracing::info!(
        "🔄 Boundary cycle: {} symbols under regime {}",
        symbols.len(),
        regime
    );
    for symbol in symbols {
        if let Err(e) = bot.run_cycle(symbol) {
            tracing::error!("  ✗ {} cycle failed: {}", symbol, e);
        }
    }
}
