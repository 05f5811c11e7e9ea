//! Compose form state.

use iced::widget::text_editor;
use rustmailer_console_core::Draft;

use crate::message::Page;

/// Message being written.
pub struct ComposeState {
    /// Draft fields other than the body.
    pub draft: Option<Draft>,
    /// Body editor.
    pub body: text_editor::Content,
    /// Attachment path as typed.
    pub attach_path: String,
    /// Submission in flight.
    pub sending: bool,
    /// Validation or send failure.
    pub error: Option<String>,
    /// Page to return to when done.
    pub return_to: Page,
}

impl Default for ComposeState {
    fn default() -> Self {
        Self {
            draft: None,
            body: text_editor::Content::new(),
            attach_path: String::new(),
            sending: false,
            error: None,
            return_to: Page::Mailboxes,
        }
    }
}

impl ComposeState {
    /// Starts editing `draft`, coming from `return_to`.
    pub fn start(&mut self, draft: Draft, return_to: Page) {
        self.body = text_editor::Content::with_text(&draft.body);
        self.draft = Some(draft);
        self.attach_path.clear();
        self.sending = false;
        self.error = None;
        self.return_to = return_to;
    }

    /// Draft with the editor body copied in.
    #[must_use]
    pub fn current_draft(&self) -> Option<Draft> {
        let mut draft = self.draft.clone()?;
        draft.body = self.body.text();
        Some(draft)
    }

    /// Replaces the body with a locally saved one.
    pub fn restore_body(&mut self, body: &str) {
        self.body = text_editor::Content::with_text(body);
    }

    /// Forgets the draft.
    pub fn finish(&mut self) {
        self.draft = None;
        self.body = text_editor::Content::new();
        self.attach_path.clear();
        self.sending = false;
        self.error = None;
    }
}
