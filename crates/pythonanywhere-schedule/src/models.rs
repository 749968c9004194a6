//! Scheduled task models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a task runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Once a day at `hour:minute`
    Daily,
    /// Every hour at `minute`
    Hourly,
}

impl Interval {
    /// Name used by the API.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Hourly => "hourly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduled task as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Task identifier.
    pub id: u64,
    /// Command line run by the task.
    pub command: String,
    /// Whether the task runs.
    pub enabled: bool,
    /// Run frequency.
    pub interval: Interval,
    /// Hour of day for daily tasks.
    #[serde(default)]
    pub hour: Option<u8>,
    /// Minute past the hour.
    pub minute: u8,
    /// Whether the task may be re-enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_enable: Option<bool>,
    /// Date after which the task stops running.
    #[serde(default)]
    pub expiry: Option<String>,
    /// Link that extends the expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_url: Option<String>,
    /// Log file of the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logfile: Option<String>,
    /// Human-readable schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printable_time: Option<String>,
    /// API URL of the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Request payload for creating a task.
///
/// Field combinations are checked by the API; an hourly task with an hour
/// is rejected there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskParams {
    /// Command line to run.
    pub command: String,
    /// Whether the task runs.
    pub enabled: bool,
    /// Run frequency.
    pub interval: Interval,
    /// Hour of day, daily tasks only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    /// Minute past the hour.
    pub minute: u8,
}

impl TaskParams {
    /// Enabled task running every day at `hour:minute`.
    #[must_use]
    pub fn daily(command: impl Into<String>, hour: u8, minute: u8) -> Self {
        Self {
            command: command.into(),
            enabled: true,
            interval: Interval::Daily,
            hour: Some(hour),
            minute,
        }
    }

    /// Enabled task running every hour at `minute`.
    #[must_use]
    pub fn hourly(command: impl Into<String>, minute: u8) -> Self {
        Self {
            command: command.into(),
            enabled: true,
            interval: Interval::Hourly,
            hour: None,
            minute,
        }
    }

    /// Set whether the task starts enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Request payload for updating a task. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Enabled flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Run frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
    /// Hour of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    /// Minute past the hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u8>,
}
