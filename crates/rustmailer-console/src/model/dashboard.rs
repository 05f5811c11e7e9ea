//! Dashboard state and chart helpers.

use rustmailer_console_api::types::{Overview, TimeSeriesPoint};

/// Server overview as last polled.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Last successful overview.
    pub overview: Option<Overview>,
    /// A poll is in flight.
    pub loading: bool,
    /// Why the last poll failed.
    pub error: Option<String>,
}

impl DashboardState {
    /// Starts a poll unless one is already running.
    ///
    /// Returns `false` when a poll is in flight, so ticks do not pile up
    /// against a slow server.
    pub fn begin_poll(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Stores a poll result. A failure keeps the previous overview.
    pub fn finish_poll(&mut self, result: Result<Overview, String>) {
        self.loading = false;
        match result {
            Ok(overview) => {
                self.overview = Some(overview);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }
}

/// Bar heights for `series`, scaled so the largest value is `max_height`.
///
/// An all-zero series yields zero-height bars.
#[must_use]
pub fn bar_heights(series: &[TimeSeriesPoint], max_height: f32) -> Vec<f32> {
    let peak = series.iter().map(|p| p.value).max().unwrap_or(0);
    if peak == 0 {
        return vec![0.0; series.len()];
    }
    #[allow(clippy::cast_precision_loss)]
    series
        .iter()
        .map(|p| p.value as f32 / peak as f32 * max_height)
        .collect()
}

/// Percentage (0 to 100) with one decimal, or "n/a" when nothing was counted.
#[must_use]
pub fn format_rate(percent: Option<f64>) -> String {
    percent.map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}%"))
}

/// Server uptime as "2d 3h", "5h 12m" or "7m".
#[must_use]
pub fn format_uptime(start_at_ms: i64, now_ms: i64) -> String {
    let minutes = (now_ms - start_at_ms).max(0) / 60_000;
    let (days, hours, mins) = (minutes / 1440, (minutes / 60) % 24, minutes % 60);
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[u64]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint {
                timestamp: i64::try_from(i).unwrap_or_default() * 3_600_000,
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_bar_heights_scale_to_peak() {
        let heights = bar_heights(&series(&[0, 5, 10]), 80.0);
        assert_eq!(heights, vec![0.0, 40.0, 80.0]);
    }

    #[test]
    fn test_bar_heights_flat() {
        assert_eq!(bar_heights(&series(&[0, 0]), 80.0), vec![0.0, 0.0]);
        assert!(bar_heights(&[], 80.0).is_empty());
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(98.76)), "98.8%");
        assert_eq!(format_rate(None), "n/a");
    }

    #[test]
    fn test_format_uptime() {
        let minute = 60_000;
        assert_eq!(format_uptime(0, 7 * minute), "7m");
        assert_eq!(format_uptime(0, 312 * minute), "5h 12m");
        assert_eq!(format_uptime(0, (2 * 1440 + 190) * minute), "2d 3h");
        assert_eq!(format_uptime(10, 0), "0m");
    }

    #[test]
    fn test_failed_poll_keeps_overview() {
        let mut state = DashboardState::default();
        assert!(state.begin_poll());
        assert!(!state.begin_poll());
        state.finish_poll(Ok(Overview::default()));
        assert!(state.begin_poll());
        state.finish_poll(Err("connection refused".into()));
        assert!(state.overview.is_some());
        assert_eq!(state.error.as_deref(), Some("connection refused"));
    }
}
