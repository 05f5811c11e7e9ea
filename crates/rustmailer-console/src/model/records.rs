//! State shared by the record pages: a list, one form and one dialog.

use rustmailer_console_core::DialogState;
use rustmailer_console_core::forms::{ValidationError, error_for};

/// List of `T` records edited through a form `F`, with dialogs of kind `K`.
#[derive(Debug)]
pub struct RecordPage<T, F, K> {
    /// Records as last fetched.
    pub items: Vec<T>,
    /// A list request is in flight.
    pub loading: bool,
    /// Why the last list request failed.
    pub load_error: Option<String>,
    /// Add/edit form.
    pub form: F,
    /// Problems found by the last validation.
    pub errors: Vec<ValidationError>,
    /// Open dialog and the record it acts on.
    pub dialog: DialogState<K, T>,
    /// A create, update or delete is in flight.
    pub saving: bool,
}

impl<T, F: Default, K> Default for RecordPage<T, F, K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            load_error: None,
            form: F::default(),
            errors: Vec::new(),
            dialog: DialogState::default(),
            saving: false,
        }
    }
}

impl<T: Clone, F: Default, K: Copy + PartialEq> RecordPage<T, F, K> {
    /// Marks a list request as started.
    pub fn start_loading(&mut self) {
        self.loading = true;
        self.load_error = None;
    }

    /// Stores a fetched list.
    pub fn loaded(&mut self, items: Vec<T>) {
        self.loading = false;
        self.items = items;
    }

    /// Records a failed list request; the previous list stays visible.
    pub fn load_failed(&mut self, message: String) {
        self.loading = false;
        self.load_error = Some(message);
    }

    /// Record with `id`.
    pub fn find(&self, id: u64, id_of: impl Fn(&T) -> u64) -> Option<&T> {
        self.items.iter().find(|item| id_of(item) == id)
    }

    /// Opens `kind` with an empty form.
    pub fn open_blank(&mut self, kind: K) {
        self.form = F::default();
        self.errors.clear();
        self.saving = false;
        self.dialog.open(kind);
    }

    /// Opens `kind` for `row` with `form` filled from it.
    pub fn open_for(&mut self, kind: K, row: T, form: F) {
        self.form = form;
        self.errors.clear();
        self.saving = false;
        self.dialog.open_with(kind, row);
    }

    /// Closes the dialog and clears validation errors.
    pub fn close(&mut self) {
        self.dialog.close();
        self.errors.clear();
        self.saving = false;
    }

    /// First validation message for `field`.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        error_for(&self.errors, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustmailer_console_core::dialog::ProxyDialog;
    use rustmailer_console_core::forms::ProxyForm;

    type Page = RecordPage<(u64, &'static str), ProxyForm, ProxyDialog>;

    #[test]
    fn test_open_blank_resets_form() {
        let mut page = Page::default();
        page.form.url = "socks5://old:1080".into();
        page.errors.push(ValidationError::InvalidProxyUrl);

        page.open_blank(ProxyDialog::Add);
        assert_eq!(page.form, ProxyForm::default());
        assert!(page.errors.is_empty());
        assert!(page.dialog.is_open(ProxyDialog::Add));
        assert!(page.dialog.current_row().is_none());
    }

    #[test]
    fn test_open_for_keeps_row() {
        let mut page = Page::default();
        page.loaded(vec![(1, "a"), (2, "b")]);
        let row = *page.find(2, |r| r.0).unwrap_or(&(0, ""));
        page.open_for(ProxyDialog::Delete, row, ProxyForm::default());

        assert_eq!(page.dialog.current_row(), Some(&(2, "b")));
        page.close();
        assert_eq!(page.dialog.current(), None);
    }

    #[test]
    fn test_load_failure_keeps_items() {
        let mut page = Page::default();
        page.loaded(vec![(1, "a")]);
        page.start_loading();
        page.load_failed("timeout".into());

        assert!(!page.loading);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.load_error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_field_error() {
        let mut page = Page::default();
        page.errors = vec![ValidationError::InvalidProxyUrl];
        assert!(page.field_error("url").is_some());
        assert!(page.field_error("description").is_none());
    }
}
