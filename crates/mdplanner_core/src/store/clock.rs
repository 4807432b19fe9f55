//! Time source for create/update stamps.

use chrono::{SecondsFormat, Utc};

/// Supplies the dates and timestamps written into new records.
pub trait Clock: Send + Sync {
    /// Calendar date, `YYYY-MM-DD`.
    fn today(&self) -> String;
    /// RFC 3339 timestamp.
    fn now(&self) -> String;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: String,
}

impl FixedClock {
    /// `now` must be RFC 3339; its first ten characters are the date.
    pub fn new(now: impl Into<String>) -> Self {
        Self { now: now.into() }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.now.chars().take(10).collect()
    }

    fn now(&self) -> String {
        self.now.clone()
    }
}
