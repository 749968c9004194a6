//! CPU quota models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Daily CPU allowance and consumption of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CpuUsage {
    /// Seconds of CPU time allowed per day.
    pub daily_cpu_limit_seconds: u64,
    /// Seconds of CPU time used since the last reset.
    pub daily_cpu_total_usage_seconds: f64,
    /// When the daily counter resets, in the server's local time.
    pub next_reset_time: NaiveDateTime,
}

impl CpuUsage {
    /// Seconds left before the limit is reached, never negative.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn remaining_seconds(&self) -> f64 {
        (self.daily_cpu_limit_seconds as f64 - self.daily_cpu_total_usage_seconds).max(0.0)
    }

    /// Returns true once usage has reached the limit.
    #[must_use]
    pub fn is_over_limit(&self) -> bool {
        self.remaining_seconds() <= 0.0
    }
}
