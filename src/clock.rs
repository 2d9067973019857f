//! Time sources for log lines, message ordering and boot timers
//!
//! The orchestrator never reads the system time directly. Interactive use goes
//! through [`SystemClock`]; session scripts and tests drive a [`ManualClock`]
//! so boot delays elapse exactly when asked to.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{DockError, Result};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when advanced
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward. Fails without moving when `by` is negative
    /// or would carry the clock past the last representable instant.
    pub fn advance(&self, by: Duration) -> Result<()> {
        if by < Duration::zero() {
            return Err(DockError::ScriptError(format!(
                "cannot move the clock back by {} ms",
                by.num_milliseconds().unsigned_abs()
            )));
        }
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_add_signed(by).ok_or_else(|| {
            DockError::ScriptError(format!(
                "advancing the clock by {} ms overflows the calendar",
                by.num_milliseconds()
            ))
        })?;
        Ok(())
    }
}

impl Default for ManualClock {
    /// Starts at midnight UTC on 2024-01-01 so log stamps are reproducible
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(start)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Locale-independent stamp used inside session logs: `[HH:MM:SS]`
pub fn log_stamp(at: DateTime<Utc>) -> String {
    format!("[{}]", at.format("%H:%M:%S"))
}
