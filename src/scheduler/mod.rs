// Cycle scheduling module
use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Local wall-clock hours that close a 4H bar.
const PRIMARY_HOURS: [u32; 4] = [10, 14, 18, 22];

/// Decides when the primary 4H logic runs and when the hourly loop
/// should wake next. Each boundary timestamp triggers at most once.
#[derive(Debug, Clone)]
pub struct CycleScheduler {
    tz: Tz,
    run_interval: Duration,
    last_primary: Option<DateTime<Utc>>,
}

impl CycleScheduler {
    /// Build a scheduler for the given IANA timezone name. Unknown
    /// names fall back to UTC with a warning.
    pub fn new(timezone: &str, run_interval_min: i64) -> Self {
        let tz = match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!("Timezone {} not found; falling back to UTC", timezone);
                chrono_tz::UTC
            }
        };
        Self {
            tz,
            run_interval: Duration::minutes(run_interval_min),
            last_primary: None,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// True when `now` lands exactly on a 4H boundary in local time.
    pub fn is_primary_time(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.tz);
        if local.minute() != 0 {
            return false;
        }
        PRIMARY_HOURS.contains(&local.hour())
    }

    /// True when the primary tasks should run at `now`. Repeated and
    /// out-of-order calls for an already-consumed boundary return
    /// false.
    pub fn should_run_primary(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_primary_time(now) {
            return false;
        }
        if let Some(last) = self.last_primary {
            if now <= last {
                return false;
            }
        }
        self.last_primary = Some(now);
        debug!("Primary boundary scheduled at {}", now);
        true
    }

    /// Next time the hourly loop should wake up.
    pub fn next_run(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.run_interval
    }
}
