//! Rotation schedule: when the timer fires.
//!
//! Two forms are accepted:
//! - an interval: `"90s"`, `"30m"`, `"1h"`, `"1d"` (bare numbers are seconds)
//! - a cron expression in the `cron` crate's 6/7-field syntax,
//!   e.g. `"0 0 * * * *"` for the top of every hour (UTC)

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Schedule parsing failures.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid interval '{0}' (expected e.g. 90s, 30m, 1h, 1d)")]
    InvalidInterval(String),

    #[error("interval must be greater than zero")]
    ZeroInterval,

    #[error("invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },
}

/// When the rotation timer fires.
#[derive(Clone, Debug)]
pub enum RotationSchedule {
    /// Fire every fixed interval, measured from the previous fire.
    Every(Duration),
    /// Fire at each upcoming cron match (UTC).
    Cron(Box<cron::Schedule>),
}

impl RotationSchedule {
    /// Parse an interval or a cron expression.
    pub fn parse(spec: &str) -> Result<Self, ScheduleError> {
        let spec = spec.trim();
        if spec.contains(char::is_whitespace) {
            let schedule = cron::Schedule::from_str(spec).map_err(|e| ScheduleError::InvalidCron {
                expr: spec.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Self::Cron(Box::new(schedule)));
        }
        parse_interval(spec).map(Self::Every)
    }

    /// How long to wait from `now` until the next fire.
    ///
    /// `None` means the schedule never fires again.
    pub fn next_delay_from(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Self::Every(interval) => Some(*interval),
            Self::Cron(schedule) => {
                let next = schedule.after(&now).next()?;
                (next - now).to_std().ok()
            }
        }
    }
}

impl Default for RotationSchedule {
    fn default() -> Self {
        Self::Every(Duration::from_secs(3600)) // 1 hour
    }
}

impl FromStr for RotationSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_interval(spec: &str) -> Result<Duration, ScheduleError> {
    let split = spec
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(spec.len());
    let (digits, unit) = spec.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| ScheduleError::InvalidInterval(spec.to_string()))?;
    let multiplier = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return Err(ScheduleError::InvalidInterval(spec.to_string())),
    };
    if value == 0 {
        return Err(ScheduleError::ZeroInterval);
    }
    let secs = value
        .checked_mul(multiplier)
        .ok_or_else(|| ScheduleError::InvalidInterval(spec.to_string()))?;
    Ok(Duration::from_secs(secs))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
