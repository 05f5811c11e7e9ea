//! License, root credentials, overview metrics and task queues.

use serde::{Deserialize, Serialize};

/// License tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LicenseType {
    /// Free trial.
    #[default]
    Trial,
    /// Paid subscription.
    Subscription,
    /// Perpetual license.
    Perpetual,
}

/// Installed license.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    /// License id.
    pub id: String,
    /// Licensee.
    pub customer_name: Option<String>,
    /// Tier.
    pub license_type: LicenseType,
    /// Creation time (ms since epoch).
    pub created_at: i64,
    /// Expiry time (ms since epoch); `None` never expires.
    pub expires_at: Option<i64>,
    /// Maximum number of accounts; `None` is unlimited.
    pub max_accounts: Option<u32>,
}

impl License {
    /// Whether the license expired before `now_ms`.
    #[must_use]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now_ms)
    }
}

/// Upload a license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRequest {
    /// Signed license text.
    pub license_key: String,
}

/// Set the root password used by the web login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootPasswordRequest {
    /// New password.
    pub password: String,
}

/// Log in with the root password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Root password.
    pub password: String,
}

/// Result of a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token to use as bearer credential.
    pub access_token: String,
}

/// One bucket of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Bucket start (ms since epoch).
    pub timestamp: i64,
    /// Value.
    pub value: u64,
}

/// Server overview used by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Overview {
    /// Server start time (ms since epoch).
    pub start_at: i64,
    /// Server version.
    pub version: String,
    /// Configured accounts.
    pub account_count: u64,
    /// Active event hooks.
    pub hook_count: u64,
    /// Queued outbound email tasks.
    pub pending_email_task_num: u64,
    /// Queued hook tasks.
    pub pending_hook_task_num: u64,
    /// Messages sent successfully.
    pub email_sent_success: u64,
    /// Messages that failed to send.
    pub email_sent_failure: u64,
    /// Hook deliveries that succeeded.
    pub hook_success: u64,
    /// Hook deliveries that failed.
    pub hook_failure: u64,
    /// Sent messages over time.
    pub email_sent_series: Vec<TimeSeriesPoint>,
    /// Hook deliveries over time.
    pub hook_series: Vec<TimeSeriesPoint>,
}

impl Overview {
    /// Percentage of successful sends, or `None` before any send.
    #[must_use]
    pub fn email_success_rate(&self) -> Option<f64> {
        rate(self.email_sent_success, self.email_sent_failure)
    }

    /// Percentage of successful hook deliveries, or `None` before any delivery.
    #[must_use]
    pub fn hook_success_rate(&self) -> Option<f64> {
        rate(self.hook_success, self.hook_failure)
    }
}

#[allow(clippy::cast_precision_loss)]
fn rate(success: u64, failure: u64) -> Option<f64> {
    let total = success + failure;
    (total > 0).then(|| success as f64 * 100.0 / total as f64)
}

/// State of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting to run.
    #[default]
    Scheduled,
    /// Running.
    Running,
    /// Finished successfully.
    Success,
    /// Failed; may be retried by the server.
    Failed,
    /// Removed before running.
    Removed,
    /// Gave up after the last retry.
    Stopped,
}

impl TaskStatus {
    /// Get display name for the status.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Removed => "Removed",
            Self::Stopped => "Stopped",
        }
    }
}

/// A record from the email or hook task queue.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    /// Task id.
    pub id: u64,
    /// Account the task belongs to.
    pub account_id: Option<u64>,
    /// Account email, for display.
    pub account_email: Option<String>,
    /// Short description (subject for email tasks, event type for hook tasks).
    pub summary: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Creation time (ms since epoch).
    pub created_at: i64,
    /// Next scheduled run (ms since epoch).
    pub scheduled_at: Option<i64>,
    /// Attempts so far.
    pub retry_count: u32,
    /// Error from the last attempt.
    pub last_error: Option<String>,
}

/// Paging query for task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskListQuery {
    /// 1-based page.
    pub page: u64,
    /// Page size.
    pub page_size: u64,
    /// Newest first.
    pub desc: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_license_expiry() {
        let mut license = License::default();
        assert!(!license.is_expired(1_000));
        license.expires_at = Some(500);
        assert!(license.is_expired(1_000));
        assert!(!license.is_expired(100));
    }

    #[test]
    fn test_success_rate() {
        let overview = Overview {
            email_sent_success: 3,
            email_sent_failure: 1,
            ..Default::default()
        };
        assert_eq!(overview.email_success_rate(), Some(75.0));
        assert_eq!(overview.hook_success_rate(), None);
    }

    #[test]
    fn test_task_record_sparse_json() {
        let task: TaskRecord =
            serde_json::from_str(r#"{"id":9,"status":"Failed","retry_count":2}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.retry_count, 2);
        assert!(task.last_error.is_none());
    }
}
