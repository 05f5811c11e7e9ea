//! Forward-only cursor pagination over envelope lists and searches.
//!
//! The server hands out an opaque `next_page_token` with every page. The pager
//! remembers the token for each page index it has seen, so the user can move
//! forward one page at a time. Going back is served from the pages already
//! loaded. Changing the account, mailbox, remote flag or filter starts over.
//!
//! Every request carries a [`Ticket`]. Only the most recent ticket is accepted
//! by [`Pager::complete`] and [`Pager::fail`], so a late response for a
//! previous mailbox cannot overwrite the current one.

use std::collections::HashMap;

use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{
    DataPage, EmailEnvelope, ListMessagesQuery, SearchExpr, SearchRequest,
};
use tracing::{debug, warn};

/// Default number of envelopes per page.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// What is being paged through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey {
    /// Account id.
    pub account_id: u64,
    /// Mailbox name.
    pub mailbox: String,
    /// Query the mail server instead of the server-side cache.
    pub remote: bool,
    /// Search expression; `None` lists the mailbox.
    pub filter: Option<SearchExpr>,
}

impl PageKey {
    /// Key for listing a mailbox.
    #[must_use]
    pub fn mailbox(account_id: u64, mailbox: impl Into<String>) -> Self {
        Self {
            account_id,
            mailbox: mailbox.into(),
            remote: false,
            filter: None,
        }
    }
}

/// Identifies one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    serial: u64,
    page: usize,
}

impl Ticket {
    /// Page index the request is for.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }
}

/// A page fetch to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Ticket to hand back with the result.
    pub ticket: Ticket,
    /// Key at the time of the request.
    pub key: PageKey,
    /// Continuation token (`None` for the first page).
    pub token: Option<String>,
    /// Page size.
    pub page_size: u64,
}

/// Pagination errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PagerError {
    /// No key has been set yet.
    #[error("No mailbox selected")]
    NoKey,
    /// The page cannot be reached because its token is unknown.
    #[error("Page {0} has not been reached yet")]
    NoToken(usize),
}

/// Pagination state for one envelope view.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    key: Option<PageKey>,
    page_size: u64,
    index: usize,
    tokens: HashMap<usize, String>,
    pages: HashMap<usize, Vec<T>>,
    total_items: u64,
    pending: Option<Ticket>,
    next_serial: u64,
    error: Option<String>,
}

impl<T> Default for Pager<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T> Pager<T> {
    /// Creates an empty pager.
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            key: None,
            page_size: page_size.max(1),
            index: 0,
            tokens: HashMap::new(),
            pages: HashMap::new(),
            total_items: 0,
            pending: None,
            next_serial: 0,
            error: None,
        }
    }

    /// Current key.
    #[must_use]
    pub const fn key(&self) -> Option<&PageKey> {
        self.key.as_ref()
    }

    /// Sets the key. A different key resets tokens, cached pages, the error
    /// and the page index, and abandons any pending request.
    ///
    /// Returns whether the key changed.
    pub fn set_key(&mut self, key: PageKey) -> bool {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        debug!("Pager key changed to {}/{}", key.account_id, key.mailbox);
        self.key = Some(key);
        self.reset();
        true
    }

    /// Changes the page size and starts over.
    pub fn set_page_size(&mut self, page_size: u64) {
        let page_size = page_size.max(1);
        if page_size != self.page_size {
            self.page_size = page_size;
            self.reset();
        }
    }

    /// Drops everything loaded so far.
    pub fn reset(&mut self) {
        self.index = 0;
        self.tokens.clear();
        self.pages.clear();
        self.total_items = 0;
        self.pending = None;
        self.error = None;
    }

    /// Moves to `page`.
    ///
    /// Page 0 always goes to the server; its response replaces the token map and
    /// the cached pages, so the current page stays visible while it loads. A
    /// later page that was loaded before is served from memory (`Ok(None)`);
    /// otherwise its token must be known.
    ///
    /// # Errors
    ///
    /// Returns [`PagerError::NoKey`] before a key is set, and
    /// [`PagerError::NoToken`] when `page` has not been reached yet.
    pub fn request(&mut self, page: usize) -> Result<Option<PageRequest>, PagerError> {
        let key = self.key.clone().ok_or(PagerError::NoKey)?;

        if page == 0 {
            return Ok(Some(self.issue(key, 0, None)));
        }

        if self.pages.contains_key(&page) {
            self.index = page;
            self.pending = None;
            return Ok(None);
        }

        let token = self.tokens.get(&page).cloned().ok_or(PagerError::NoToken(page))?;
        Ok(Some(self.issue(key, page, Some(token))))
    }

    /// Re-fetches the current page from the server.
    ///
    /// # Errors
    ///
    /// Same as [`Pager::request`].
    pub fn refresh(&mut self) -> Result<PageRequest, PagerError> {
        let key = self.key.clone().ok_or(PagerError::NoKey)?;
        if self.index == 0 {
            return Ok(self.issue(key, 0, None));
        }
        let token = self
            .tokens
            .get(&self.index)
            .cloned()
            .ok_or(PagerError::NoToken(self.index))?;
        Ok(self.issue(key, self.index, Some(token)))
    }

    /// Moves one page forward.
    ///
    /// # Errors
    ///
    /// Same as [`Pager::request`].
    pub fn next_page(&mut self) -> Result<Option<PageRequest>, PagerError> {
        self.request(self.index + 1)
    }

    /// Moves one page back, from memory when possible.
    ///
    /// # Errors
    ///
    /// Same as [`Pager::request`].
    pub fn previous_page(&mut self) -> Result<Option<PageRequest>, PagerError> {
        if self.index == 0 {
            return Ok(None);
        }
        let target = self.index - 1;
        if self.pages.contains_key(&target) {
            self.index = target;
            self.pending = None;
            return Ok(None);
        }
        self.request(target)
    }

    fn issue(&mut self, key: PageKey, page: usize, token: Option<String>) -> PageRequest {
        let ticket = Ticket {
            serial: self.next_serial,
            page,
        };
        self.next_serial += 1;
        self.pending = Some(ticket);
        PageRequest {
            ticket,
            key,
            token,
            page_size: self.page_size,
        }
    }

    /// Stores a page result. Returns `false` when the ticket is stale.
    ///
    /// A first page starts the chain over. A page without a continuation
    /// token ends it, dropping any later pages loaded before.
    pub fn complete(&mut self, ticket: Ticket, page: DataPage<T>) -> bool {
        if self.pending != Some(ticket) {
            debug!("Dropping stale page {}", ticket.page);
            return false;
        }
        self.pending = None;
        self.error = None;
        self.index = ticket.page;
        self.total_items = page.total_items;

        if ticket.page == 0 {
            self.tokens.clear();
            self.pages.clear();
        }
        match page.next_page_token {
            Some(token) => {
                self.tokens.insert(ticket.page + 1, token);
            }
            None => {
                self.tokens.retain(|&n, _| n <= ticket.page);
                self.pages.retain(|&n, _| n <= ticket.page);
            }
        }
        self.pages.insert(ticket.page, page.items);
        true
    }

    /// Records a failed fetch. Loaded pages are kept. Returns `false` when the
    /// ticket is stale.
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        let message = message.into();
        warn!("Page {} failed: {message}", ticket.page);
        self.pending = None;
        self.error = Some(message);
        true
    }

    /// Items on the current page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.pages
            .get(&self.index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable items on the current page.
    pub fn items_mut(&mut self) -> Option<&mut Vec<T>> {
        self.pages.get_mut(&self.index)
    }

    /// Zero-based index of the current page.
    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.index
    }

    /// Page size.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Total number of items reported by the last response.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Token stored for `page`, if any.
    #[must_use]
    pub fn token_for(&self, page: usize) -> Option<&str> {
        self.tokens.get(&page).map(String::as_str)
    }

    /// Whether the next page can be requested.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.tokens.contains_key(&(self.index + 1))
    }

    /// Whether there is a page before the current one.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.index > 0
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Error from the last failed fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Runs a page request against the server: a search when the key carries a
/// filter, a plain listing otherwise.
///
/// # Errors
///
/// Returns the API error unchanged.
pub async fn fetch_envelopes(
    client: &ApiClient,
    request: &PageRequest,
) -> rustmailer_console_api::Result<DataPage<EmailEnvelope>> {
    let key = &request.key;
    match &key.filter {
        Some(search) => {
            client
                .search_messages(
                    key.account_id,
                    &SearchRequest {
                        search: search.clone(),
                        mailbox: Some(key.mailbox.clone()),
                        next_page_token: request.token.clone(),
                        page_size: request.page_size,
                        desc: true,
                    },
                )
                .await
        }
        None => {
            client
                .list_messages(
                    key.account_id,
                    &ListMessagesQuery {
                        mailbox: key.mailbox.clone(),
                        next_page_token: request.token.clone(),
                        page_size: request.page_size,
                        remote: key.remote,
                        desc: true,
                    },
                )
                .await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(items: &[u32], token: Option<&str>) -> DataPage<u32> {
        DataPage::new(items.to_vec(), token.map(ToString::to_string))
    }

    fn pager() -> Pager<u32> {
        let mut pager = Pager::new(2);
        pager.set_key(PageKey::mailbox(1, "INBOX"));
        pager
    }

    #[test]
    fn test_first_page_needs_no_token() {
        let mut pager = pager();
        let request = pager.request(0).unwrap().unwrap();
        assert_eq!(request.token, None);
        assert_eq!(request.page_size, 2);
        assert!(pager.is_loading());
    }

    #[test]
    fn test_next_page_uses_stored_token() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        assert!(pager.complete(first.ticket, page(&[1, 2], Some("T1"))));
        assert!(pager.has_next_page());
        assert!(!pager.has_previous_page());

        let second = pager.next_page().unwrap().unwrap();
        assert_eq!(second.token.as_deref(), Some("T1"));
        assert!(pager.complete(second.ticket, page(&[3], None)));
        assert_eq!(pager.page_index(), 1);
        assert_eq!(pager.items(), &[3]);
        assert!(!pager.has_next_page());
        assert!(pager.has_previous_page());
    }

    #[test]
    fn test_page_zero_replaces_tokens() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));
        let second = pager.next_page().unwrap().unwrap();
        pager.complete(second.ticket, page(&[3, 4], Some("T2")));
        assert_eq!(pager.token_for(2), Some("T2"));

        let again = pager.request(0).unwrap().unwrap();
        assert_eq!(pager.token_for(1), Some("T1"));
        assert!(pager.complete(again.ticket, page(&[5, 6], Some("N1"))));
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.items(), &[5, 6]);
        assert_eq!(pager.token_for(1), Some("N1"));
        assert_eq!(pager.token_for(2), None);
        assert_eq!(pager.next_page().unwrap().unwrap().token.as_deref(), Some("N1"));
    }

    #[test]
    fn test_failed_refresh_keeps_first_page() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));

        let again = pager.refresh().unwrap();
        assert_eq!(pager.items(), &[1, 2]);
        assert!(pager.fail(again.ticket, "boom"));
        assert_eq!(pager.items(), &[1, 2]);
        assert_eq!(pager.token_for(1), Some("T1"));
        assert!(pager.has_next_page());
        assert_eq!(pager.error(), Some("boom"));
    }

    #[test]
    fn test_end_of_chain_drops_later_pages() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));
        let second = pager.next_page().unwrap().unwrap();
        pager.complete(second.ticket, page(&[3, 4], Some("T2")));
        let third = pager.next_page().unwrap().unwrap();
        pager.complete(third.ticket, page(&[5], None));

        pager.previous_page().unwrap();
        let again = pager.refresh().unwrap();
        assert!(pager.complete(again.ticket, page(&[3, 4], None)));
        assert!(!pager.has_next_page());
        assert_eq!(pager.token_for(2), None);
        assert_eq!(pager.next_page(), Err(PagerError::NoToken(2)));
        assert_eq!(pager.items(), &[3, 4]);
    }

    #[test]
    fn test_unreached_page_is_rejected() {
        let mut pager = pager();
        assert_eq!(pager.request(3), Err(PagerError::NoToken(3)));
        assert_eq!(Pager::<u32>::new(10).request(0), Err(PagerError::NoKey));
    }

    #[test]
    fn test_previous_page_served_from_memory() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));
        let second = pager.next_page().unwrap().unwrap();
        pager.complete(second.ticket, page(&[3, 4], Some("T2")));

        assert_eq!(pager.previous_page().unwrap(), None);
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.items(), &[1, 2]);

        // Forward again without a request.
        assert_eq!(pager.next_page().unwrap(), None);
        assert_eq!(pager.items(), &[3, 4]);
        assert_eq!(pager.token_for(2), Some("T2"));
    }

    #[test]
    fn test_key_change_resets_state() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));
        let second = pager.next_page().unwrap().unwrap();
        pager.complete(second.ticket, page(&[3], Some("T2")));

        assert!(pager.set_key(PageKey::mailbox(1, "Archive")));
        assert_eq!(pager.page_index(), 0);
        assert!(pager.items().is_empty());
        assert_eq!(pager.token_for(1), None);
        assert!(!pager.set_key(PageKey::mailbox(1, "Archive")));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut pager = pager();
        let old = pager.request(0).unwrap().unwrap();
        pager.set_key(PageKey {
            remote: true,
            ..PageKey::mailbox(1, "INBOX")
        });
        let fresh = pager.request(0).unwrap().unwrap();

        assert!(!pager.complete(old.ticket, page(&[9], Some("OLD"))));
        assert!(pager.items().is_empty());
        assert!(pager.complete(fresh.ticket, page(&[1], None)));
        assert_eq!(pager.items(), &[1]);
    }

    #[test]
    fn test_failure_keeps_loaded_data() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));

        let second = pager.next_page().unwrap().unwrap();
        assert!(pager.fail(second.ticket, "timeout"));
        assert_eq!(pager.error(), Some("timeout"));
        assert!(!pager.is_loading());
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.items(), &[1, 2]);
        assert!(pager.has_next_page());
    }

    #[test]
    fn test_refresh_reuses_current_token() {
        let mut pager = pager();
        let first = pager.request(0).unwrap().unwrap();
        pager.complete(first.ticket, page(&[1, 2], Some("T1")));
        let second = pager.next_page().unwrap().unwrap();
        pager.complete(second.ticket, page(&[3], None));

        let again = pager.refresh().unwrap();
        assert_eq!(again.ticket.page(), 1);
        assert_eq!(again.token.as_deref(), Some("T1"));
    }
}
