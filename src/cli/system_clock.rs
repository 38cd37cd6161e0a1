use std::env;

use chrono::{DateTime, Utc};
use fintrack_core::time::{Clock, FixedClock};

/// Pins "now" for scripted sessions, e.g. `2024-06-15T12:00:00Z`.
pub const NOW_ENV: &str = "FINTRACK_CLI_NOW";

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The system clock, unless [`NOW_ENV`] holds a valid RFC 3339 timestamp.
pub fn clock_from_env() -> Box<dyn Clock> {
    env::var(NOW_ENV)
        .ok()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
        .map(|fixed| Box::new(FixedClock(fixed.with_timezone(&Utc))) as Box<dyn Clock>)
        .unwrap_or_else(|| Box::new(SystemClock))
}
