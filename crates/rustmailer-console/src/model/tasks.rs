//! Task queue page state.

use rustmailer_console_api::types::{DataPage, TaskListQuery, TaskRecord};

use crate::message::TaskQueue;

/// One page of a task queue, newest first.
#[derive(Debug)]
pub struct TasksState {
    /// Queue shown.
    pub queue: TaskQueue,
    /// 1-based page number.
    pub page: u64,
    /// Tasks per page.
    pub page_size: u64,
    /// Last page received for `queue` and `page`.
    pub data: Option<DataPage<TaskRecord>>,
    /// A request is in flight.
    pub loading: bool,
    /// Why the last request failed.
    pub error: Option<String>,
}

impl TasksState {
    /// First page of the email queue.
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            queue: TaskQueue::Email,
            page: 1,
            page_size: page_size.max(1),
            data: None,
            loading: false,
            error: None,
        }
    }

    /// Query for the current page.
    #[must_use]
    pub const fn query(&self) -> TaskListQuery {
        TaskListQuery {
            page: self.page,
            page_size: self.page_size,
            desc: true,
        }
    }

    /// Switches queue and goes back to the first page.
    pub fn select_queue(&mut self, queue: TaskQueue) {
        if self.queue != queue {
            self.queue = queue;
            self.page = 1;
            self.data = None;
            self.error = None;
        }
    }

    /// Total number of pages, at least 1.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.data.as_ref().map_or(1, |d| {
            d.total_pages
                .unwrap_or_else(|| d.total_items.div_ceil(self.page_size))
                .max(1)
        })
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page < self.page_count()
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous_page() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Stores a response unless the user has since moved to another queue or
    /// page. Returns whether it was kept.
    pub fn accept(&mut self, queue: TaskQueue, page: u64, result: Result<DataPage<TaskRecord>, String>) -> bool {
        if queue != self.queue || page != self.page {
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total_items: u64) -> DataPage<TaskRecord> {
        DataPage {
            current_page: None,
            page_size: None,
            total_items,
            items: Vec::new(),
            total_pages: None,
            next_page_token: None,
        }
    }

    #[test]
    fn test_paging_bounds() {
        let mut state = TasksState::new(10);
        assert!(!state.has_next_page());
        assert!(state.accept(TaskQueue::Email, 1, Ok(page_of(25))));
        assert_eq!(state.page_count(), 3);

        assert!(state.next_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.query().page, 3);
        assert!(state.previous_page());
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut state = TasksState::new(10);
        state.loading = true;
        state.select_queue(TaskQueue::Hook);
        assert!(!state.accept(TaskQueue::Email, 1, Ok(page_of(99))));
        assert!(state.data.is_none());
        assert!(state.accept(TaskQueue::Hook, 1, Err("timeout".into())));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_queue_switch_resets_page() {
        let mut state = TasksState::new(10);
        state.accept(TaskQueue::Email, 1, Ok(page_of(40)));
        state.next_page();
        state.select_queue(TaskQueue::Hook);
        assert_eq!(state.page, 1);
        assert!(state.data.is_none());
    }
}
