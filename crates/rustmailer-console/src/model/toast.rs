//! Transient notifications.

use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(6);

/// Toasts shown at once; older ones are dropped first.
const MAX_TOASTS: usize = 4;

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier used to dismiss it.
    pub id: u64,
    /// Text shown.
    pub text: String,
    /// Failure rather than confirmation.
    pub is_error: bool,
    /// When it appeared.
    pub shown_at: Instant,
}

/// Notification queue, newest last.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    /// Shows a confirmation.
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text.into(), false, Instant::now());
    }

    /// Shows a failure.
    pub fn error(&mut self, text: impl Into<String>) {
        self.push(text.into(), true, Instant::now());
    }

    fn push(&mut self, text: String, is_error: bool, now: Instant) {
        // A poll against a stopped server repeats the same failure.
        if let Some(last) = self.items.last_mut()
            && last.text == text
            && last.is_error == is_error
        {
            last.shown_at = now;
            return;
        }
        self.items.push(Toast {
            id: self.next_id,
            text,
            is_error,
            shown_at: now,
        });
        self.next_id += 1;
        if self.items.len() > MAX_TOASTS {
            self.items.remove(0);
        }
    }

    /// Closes a toast.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    /// Drops toasts older than [`TOAST_LIFETIME`] at `now`.
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_LIFETIME);
    }

    /// Toasts on screen, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    /// Whether nothing is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut toasts = Toasts::default();
        toasts.info("Saved");
        toasts.error("Failed");
        let ids: Vec<u64> = toasts.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1]);

        toasts.dismiss(0);
        assert_eq!(toasts.iter().count(), 1);
        assert!(toasts.iter().all(|t| t.is_error));
    }

    #[test]
    fn test_repeated_message_is_merged() {
        let mut toasts = Toasts::default();
        toasts.error("Connection refused");
        toasts.error("Connection refused");
        assert_eq!(toasts.iter().count(), 1);
        toasts.info("Connection refused");
        assert_eq!(toasts.iter().count(), 2);
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let mut toasts = Toasts::default();
        for i in 0..6 {
            toasts.info(format!("toast {i}"));
        }
        let texts: Vec<&str> = toasts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["toast 2", "toast 3", "toast 4", "toast 5"]);
    }

    #[test]
    fn test_expire() {
        let mut toasts = Toasts::default();
        let start = Instant::now();
        toasts.push("old".into(), false, start);
        toasts.push("new".into(), false, start + Duration::from_secs(5));

        toasts.expire(start + Duration::from_secs(7));
        let texts: Vec<&str> = toasts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["new"]);

        toasts.expire(start + Duration::from_secs(20));
        assert!(toasts.is_empty());
    }
}
