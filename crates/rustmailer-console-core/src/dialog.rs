//! Dialog state for the admin pages.
//!
//! Each page owns one [`DialogState`] parameterized by a small `Copy` enum of
//! dialog kinds and the row type the dialog acts on. At most one dialog is
//! open per page.

/// Which dialog (if any) is open and the row it was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState<K, R> {
    open: Option<K>,
    row: Option<R>,
}

impl<K, R> Default for DialogState<K, R> {
    fn default() -> Self {
        Self {
            open: None,
            row: None,
        }
    }
}

impl<K: Copy + PartialEq, R> DialogState<K, R> {
    /// Creates a closed dialog state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `kind` with no row (e.g. an "add" dialog).
    pub fn open(&mut self, kind: K) {
        self.open = Some(kind);
        self.row = None;
    }

    /// Opens `kind` for `row` (e.g. "edit" or "delete").
    pub fn open_with(&mut self, kind: K, row: R) {
        self.open = Some(kind);
        self.row = Some(row);
    }

    /// Closes whatever is open and forgets the row.
    pub fn close(&mut self) {
        self.open = None;
        self.row = None;
    }

    /// Whether `kind` is the open dialog.
    #[must_use]
    pub fn is_open(&self, kind: K) -> bool {
        self.open == Some(kind)
    }

    /// The open dialog kind.
    #[must_use]
    pub const fn current(&self) -> Option<K> {
        self.open
    }

    /// The row the open dialog acts on.
    #[must_use]
    pub const fn current_row(&self) -> Option<&R> {
        self.row.as_ref()
    }

    /// Mutable access to the row, for dialogs that edit it in place.
    pub fn current_row_mut(&mut self) -> Option<&mut R> {
        self.row.as_mut()
    }
}

/// Account page dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountDialog {
    /// Create an account.
    Add,
    /// Edit an account.
    Edit,
    /// Confirm deletion.
    Delete,
    /// Live sync state.
    RunningState,
    /// OAuth2 authorization link.
    Authorize,
}

/// Event hook page dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookDialog {
    /// Create a hook.
    Add,
    /// Edit a hook.
    Edit,
    /// Confirm deletion.
    Delete,
    /// Try the VRL script against a sample event.
    VrlTest,
}

/// Template page dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateDialog {
    /// Create a template.
    Add,
    /// Edit a template.
    Edit,
    /// Confirm deletion.
    Delete,
    /// Send a rendered test message.
    SendTest,
}

/// MTA page dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MtaDialog {
    /// Create an MTA.
    Add,
    /// Edit an MTA.
    Edit,
    /// Confirm deletion.
    Delete,
    /// Send a test message.
    SendTest,
}

/// Proxy page dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyDialog {
    /// Create a proxy.
    Add,
    /// Edit a proxy.
    Edit,
    /// Confirm deletion.
    Delete,
}

/// OAuth2 configuration page dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuth2Dialog {
    /// Create a configuration.
    Add,
    /// Edit a configuration.
    Edit,
    /// Confirm deletion.
    Delete,
}

/// Mailbox browser dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageDialog {
    /// Pick a target mailbox for the selection.
    Move,
    /// Confirm deletion of the selection.
    Delete,
    /// Edit the filter.
    Filter,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut state: DialogState<ProxyDialog, u64> = DialogState::new();
        assert_eq!(state.current(), None);

        state.open(ProxyDialog::Add);
        assert!(state.is_open(ProxyDialog::Add));
        assert!(!state.is_open(ProxyDialog::Edit));
        assert!(state.current_row().is_none());

        state.open_with(ProxyDialog::Delete, 7);
        assert!(state.is_open(ProxyDialog::Delete));
        assert_eq!(state.current_row(), Some(&7));

        state.close();
        assert_eq!(state.current(), None);
        assert!(state.current_row().is_none());
    }

    #[test]
    fn test_open_without_row_forgets_previous_row() {
        let mut state: DialogState<HookDialog, String> = DialogState::new();
        state.open_with(HookDialog::Edit, "hook".into());
        state.open(HookDialog::Add);
        assert!(state.current_row().is_none());
    }

    #[test]
    fn test_row_edit_in_place() {
        let mut state: DialogState<TemplateDialog, String> = DialogState::new();
        state.open_with(TemplateDialog::SendTest, "a".into());
        state.current_row_mut().unwrap().push('b');
        assert_eq!(state.current_row().map(String::as_str), Some("ab"));
    }
}
