//! Mailbox browser state: tree, envelope pages, selection and dialogs.

use std::collections::BTreeSet;

use rustmailer_console_api::types::{EmailEnvelope, MailboxData, MessageContent, SearchExpr};
use rustmailer_console_core::dialog::MessageDialog;
use rustmailer_console_core::filter::{Comparison, FilterField};
use rustmailer_console_core::{
    DialogState, FilterCondition, FilterForm, PageKey, Pager, TreeDataItem,
    build_tree_with_badges,
};

/// Message shown in the reading pane.
#[derive(Debug, Clone)]
pub struct OpenMessage {
    /// UID in the selected mailbox.
    pub uid: u32,
    /// Body, once fetched.
    pub content: Option<MessageContent>,
    /// Why the body could not be fetched.
    pub error: Option<String>,
}

/// Text for the reading pane: the plain part, or the HTML part converted to
/// Markdown-style text.
#[must_use]
pub fn readable_body(content: &MessageContent) -> Option<String> {
    if let Some(plain) = content.plain.as_deref()
        && !plain.trim().is_empty()
    {
        return Some(plain.to_string());
    }
    let html = content.html.as_deref()?;
    match htmd::convert(html) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("HTML conversion failed: {e}");
            Some(html.to_string())
        }
    }
}

/// A tree node in display order.
#[derive(Debug, Clone, Copy)]
pub struct VisibleNode<'a> {
    /// The node.
    pub item: &'a TreeDataItem,
    /// Nesting level, 0 for roots.
    pub depth: usize,
    /// Whether its children are shown.
    pub expanded: bool,
}

/// State of the mailbox browser.
#[derive(Debug)]
pub struct MailboxesState {
    /// Account being browsed.
    pub account_id: Option<u64>,
    /// Mailboxes of that account.
    pub mailboxes: Vec<MailboxData>,
    /// Tree built from `mailboxes`.
    pub tree: Vec<TreeDataItem>,
    /// Ids of collapsed tree nodes.
    pub collapsed: BTreeSet<String>,
    /// A mailbox list request is in flight.
    pub loading_mailboxes: bool,
    /// Selected mailbox name.
    pub selected: Option<String>,
    /// Read from the mail provider instead of the server cache.
    pub remote: bool,
    /// Envelope pages for the selected mailbox.
    pub pager: Pager<EmailEnvelope>,
    /// UIDs checked on the current page.
    pub checked: BTreeSet<u32>,
    /// Message in the reading pane.
    pub open: Option<OpenMessage>,
    /// Move, delete or filter dialog.
    pub dialog: DialogState<MessageDialog, ()>,
    /// Filter being edited.
    pub filter: FilterForm,
    /// Filter in effect.
    pub applied_filter: Option<SearchExpr>,
    /// Why the filter could not be applied.
    pub filter_error: Option<String>,
    /// Destination typed in the move dialog.
    pub move_target: String,
    /// A move, flag or delete is in flight.
    pub busy: bool,
}

impl MailboxesState {
    /// Empty browser with `page_size` envelopes per page.
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            account_id: None,
            mailboxes: Vec::new(),
            tree: Vec::new(),
            collapsed: BTreeSet::new(),
            loading_mailboxes: false,
            selected: None,
            remote: false,
            pager: Pager::new(page_size),
            checked: BTreeSet::new(),
            open: None,
            dialog: DialogState::new(),
            filter: FilterForm::default(),
            applied_filter: None,
            filter_error: None,
            move_target: String::new(),
            busy: false,
        }
    }

    /// Switches to `account_id`, forgetting everything about the previous one.
    ///
    /// Returns `false` when it is already selected.
    pub fn select_account(&mut self, account_id: u64) -> bool {
        if self.account_id == Some(account_id) {
            return false;
        }
        self.account_id = Some(account_id);
        self.mailboxes.clear();
        self.tree.clear();
        self.collapsed.clear();
        self.selected = None;
        self.applied_filter = None;
        self.filter = FilterForm::default();
        self.pager.reset();
        self.clear_selection();
        true
    }

    /// Replaces the mailbox list and rebuilds the tree, badged with unread counts.
    ///
    /// A selected mailbox that no longer exists is deselected.
    pub fn set_mailboxes(&mut self, mailboxes: Vec<MailboxData>) {
        self.tree = build_tree_with_badges(&mailboxes, |m| {
            m.unseen.filter(|n| *n > 0).map(|n| n.to_string())
        });
        if let Some(selected) = &self.selected
            && !mailboxes.iter().any(|m| &m.name == selected)
        {
            self.selected = None;
        }
        self.mailboxes = mailboxes;
        self.loading_mailboxes = false;
    }

    /// Mailbox to open when none is selected: INBOX if present, else the first
    /// selectable one.
    #[must_use]
    pub fn default_mailbox(&self) -> Option<&str> {
        self.mailboxes
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case("INBOX"))
            .or_else(|| self.mailboxes.iter().find(|m| m.is_selectable()))
            .map(|m| m.name.as_str())
    }

    /// Tree nodes in display order, skipping children of collapsed nodes.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        let mut out = Vec::new();
        for root in &self.tree {
            self.push_visible(root, 0, &mut out);
        }
        out
    }

    fn push_visible<'a>(&self, item: &'a TreeDataItem, depth: usize, out: &mut Vec<VisibleNode<'a>>) {
        let expanded = !item.is_leaf() && !self.collapsed.contains(&item.id);
        out.push(VisibleNode {
            item,
            depth,
            expanded,
        });
        if expanded {
            for child in item.children.iter().flatten() {
                self.push_visible(child, depth + 1, out);
            }
        }
    }

    /// Collapses an expanded node or expands a collapsed one.
    pub fn toggle_node(&mut self, id: &str) {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
    }

    /// Pager key for the current account, mailbox, remote flag and filter.
    #[must_use]
    pub fn page_key(&self) -> Option<PageKey> {
        let account_id = self.account_id?;
        let mailbox = self.selected.clone()?;
        Some(PageKey {
            account_id,
            mailbox,
            remote: self.remote,
            filter: self.applied_filter.clone(),
        })
    }

    /// Unchecks everything and closes the reading pane.
    pub fn clear_selection(&mut self) {
        self.checked.clear();
        self.open = None;
    }

    /// Checks every envelope on the page, or unchecks all when all are checked.
    pub fn toggle_all_checked(&mut self) {
        let uids: BTreeSet<u32> = self.pager.items().iter().map(|e| e.uid).collect();
        if !uids.is_empty() && uids.is_subset(&self.checked) {
            self.checked.clear();
        } else {
            self.checked = uids;
        }
    }

    /// UIDs an action applies to: the checked envelopes, or the open one.
    #[must_use]
    pub fn target_uids(&self) -> Vec<u32> {
        if self.checked.is_empty() {
            self.open.iter().map(|m| m.uid).collect()
        } else {
            self.checked.iter().copied().collect()
        }
    }

    /// Envelope shown in the reading pane.
    #[must_use]
    pub fn open_envelope(&self) -> Option<&EmailEnvelope> {
        let uid = self.open.as_ref()?.uid;
        self.pager.items().iter().find(|e| e.uid == uid)
    }

    /// Opens the filter dialog with at least one condition row.
    pub fn open_filter(&mut self) {
        if self.filter.conditions.is_empty() {
            self.add_condition();
        }
        self.filter_error = None;
        self.dialog.open(MessageDialog::Filter);
    }

    /// Appends an empty condition.
    pub fn add_condition(&mut self) {
        self.filter
            .conditions
            .push(FilterCondition::new(FilterField::Subject, Comparison::Is, ""));
    }

    /// Builds the edited filter and puts it in effect.
    ///
    /// # Errors
    ///
    /// Returns the reason when the form does not describe a filter.
    pub fn apply_filter(&mut self) -> Result<(), String> {
        match self.filter.build() {
            Ok(expr) => {
                self.applied_filter = Some(expr);
                self.filter_error = None;
                self.dialog.close();
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.filter_error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Removes the filter.
    pub fn clear_filter(&mut self) {
        self.filter = FilterForm::default();
        self.applied_filter = None;
        self.filter_error = None;
        self.dialog.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rustmailer_console_api::types::DataPage;

    fn mailbox(id: u64, name: &str, unseen: Option<u32>) -> MailboxData {
        let mut m = MailboxData::new(id, name, Some("/"));
        m.unseen = unseen;
        m
    }

    fn envelope(uid: u32) -> EmailEnvelope {
        EmailEnvelope {
            uid,
            mailbox_name: "INBOX".into(),
            ..EmailEnvelope::default()
        }
    }

    fn loaded_state() -> MailboxesState {
        let mut state = MailboxesState::new(20);
        state.select_account(1);
        state.set_mailboxes(vec![
            mailbox(1, "INBOX", Some(3)),
            mailbox(2, "Work", None),
            mailbox(3, "Work/Reports", Some(0)),
            mailbox(4, "Work/Clients", None),
        ]);
        state
    }

    #[test]
    fn test_badges_show_unread_only() {
        let state = loaded_state();
        let nodes = state.visible_nodes();
        let inbox = nodes.iter().find(|n| n.item.name == "INBOX").unwrap();
        assert_eq!(inbox.item.badge.as_deref(), Some("3"));
        let reports = nodes.iter().find(|n| n.item.name == "Reports").unwrap();
        assert_eq!(reports.item.badge, None);
    }

    #[test]
    fn test_collapse_hides_children() {
        let mut state = loaded_state();
        let names: Vec<&str> = state.visible_nodes().iter().map(|n| n.item.name.as_str()).collect();
        assert_eq!(names, ["INBOX", "Work", "Clients", "Reports"]);
        let depth: Vec<usize> = state.visible_nodes().iter().map(|n| n.depth).collect();
        assert_eq!(depth, [0, 0, 1, 1]);

        state.toggle_node("Work");
        let names: Vec<&str> = state.visible_nodes().iter().map(|n| n.item.name.as_str()).collect();
        assert_eq!(names, ["INBOX", "Work"]);
        assert!(!state.visible_nodes()[1].expanded);

        state.toggle_node("Work");
        assert_eq!(state.visible_nodes().len(), 4);
    }

    #[test]
    fn test_default_mailbox_prefers_inbox() {
        let state = loaded_state();
        assert_eq!(state.default_mailbox(), Some("INBOX"));
    }

    #[test]
    fn test_vanished_mailbox_is_deselected() {
        let mut state = loaded_state();
        state.selected = Some("Work/Reports".into());
        state.set_mailboxes(vec![mailbox(1, "INBOX", None)]);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_page_key_tracks_filter_and_remote() {
        let mut state = loaded_state();
        assert!(state.page_key().is_none());
        state.selected = Some("INBOX".into());
        state.remote = true;

        let key = state.page_key().unwrap();
        assert!(key.remote && key.filter.is_none());

        state.open_filter();
        state.filter.conditions[0].value = "invoice".into();
        state.apply_filter().unwrap();
        assert!(state.page_key().unwrap().filter.is_some());
        assert!(state.dialog.current().is_none());

        state.clear_filter();
        assert!(state.page_key().unwrap().filter.is_none());
    }

    #[test]
    fn test_invalid_filter_keeps_dialog_open() {
        let mut state = loaded_state();
        state.open_filter();
        assert!(state.apply_filter().is_err());
        assert!(state.filter_error.is_some());
        assert!(state.dialog.is_open(MessageDialog::Filter));
    }

    #[test]
    fn test_target_uids() {
        let mut state = loaded_state();
        state.selected = Some("INBOX".into());
        state.pager.set_key(state.page_key().unwrap());
        let request = state.pager.request(0).unwrap().unwrap();
        state.pager.complete(
            request.ticket,
            DataPage::new(vec![envelope(10), envelope(11)], None),
        );

        assert!(state.target_uids().is_empty());
        state.open = Some(OpenMessage {
            uid: 11,
            content: None,
            error: None,
        });
        assert_eq!(state.target_uids(), [11]);
        assert_eq!(state.open_envelope().map(|e| e.uid), Some(11));

        state.toggle_all_checked();
        assert_eq!(state.target_uids(), [10, 11]);
        state.toggle_all_checked();
        assert!(state.checked.is_empty());
    }

    #[test]
    fn test_readable_body_prefers_plain() {
        let content = MessageContent {
            plain: Some("plain text".into()),
            html: Some("<p>html</p>".into()),
            truncated: false,
        };
        assert_eq!(readable_body(&content).as_deref(), Some("plain text"));

        let content = MessageContent {
            plain: Some("  ".into()),
            html: Some("<p>Hello <b>there</b></p>".into()),
            truncated: false,
        };
        let text = readable_body(&content).unwrap();
        assert!(text.contains("Hello") && !text.contains("<p>"));

        assert_eq!(readable_body(&MessageContent::default()), None);
    }

    #[test]
    fn test_switching_account_resets() {
        let mut state = loaded_state();
        state.selected = Some("INBOX".into());
        state.checked.insert(4);
        assert!(!state.select_account(1));
        assert!(state.select_account(2));
        assert!(state.tree.is_empty());
        assert!(state.selected.is_none());
        assert!(state.checked.is_empty());
    }
}
