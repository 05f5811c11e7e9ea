//! Compose form: editing, local draft autosave, attachments and sending.

use std::path::Path;

use iced::Task;
use rustmailer_console_core::Draft;
use rustmailer_console_core::compose::load_attachment;
use tracing::{info, warn};

use crate::RustMailerConsole;
use crate::message::{ComposeMessage, Message, Page};

impl RustMailerConsole {
    pub(crate) fn handle_compose(&mut self, msg: ComposeMessage) -> Task<Message> {
        match msg {
            ComposeMessage::New => {
                let account_id = self
                    .mailboxes
                    .account_id
                    .or_else(|| self.accounts.records.items.first().map(|a| a.id));
                let Some(account_id) = account_id else {
                    self.toasts.error("Add an account before writing a message");
                    return Task::none();
                };
                let return_to = if self.page == Page::Compose {
                    self.compose.return_to
                } else {
                    self.page
                };
                return self.start_compose(Draft::new(account_id), return_to);
            }
            ComposeMessage::ToChanged(to) => self.edit_draft(|draft| draft.to = to),
            ComposeMessage::CcChanged(cc) => self.edit_draft(|draft| draft.cc = cc),
            ComposeMessage::BccChanged(bcc) => self.edit_draft(|draft| draft.bcc = bcc),
            ComposeMessage::SubjectChanged(subject) => {
                self.edit_draft(|draft| draft.subject = subject);
            }
            ComposeMessage::BodyAction(action) => {
                let is_edit = action.is_edit();
                self.compose.body.perform(action);
                if is_edit {
                    return self.autosave_body();
                }
            }
            ComposeMessage::DraftRestored(key, body) => {
                let current = self.compose.draft.as_ref().map(Draft::storage_key);
                if let Some(body) = body.filter(|b| !b.trim().is_empty())
                    && current.as_deref() == Some(key.as_str())
                {
                    self.compose.restore_body(&body);
                    self.toasts.info("Restored an unsent draft");
                }
            }
            ComposeMessage::AttachPathChanged(path) => self.compose.attach_path = path,
            ComposeMessage::Attach => {
                let path = self.compose.attach_path.trim().to_string();
                if path.is_empty() || self.compose.draft.is_none() {
                    return Task::none();
                }
                return Task::perform(
                    async move {
                        load_attachment(Path::new(&path))
                            .await
                            .map_err(|e| e.to_string())
                    },
                    |result| Message::Compose(ComposeMessage::AttachmentLoaded(result)),
                );
            }
            ComposeMessage::AttachmentLoaded(result) => match result {
                Ok(attachment) => {
                    if let Some(draft) = &mut self.compose.draft {
                        draft.attachments.push(attachment);
                        self.compose.attach_path.clear();
                        self.compose.error = None;
                    }
                }
                Err(e) => self.compose.error = Some(format!("Cannot attach file: {e}")),
            },
            ComposeMessage::RemoveAttachment(index) => {
                self.edit_draft(|draft| draft.remove_attachment(index));
            }
            ComposeMessage::Send => return self.send_draft(),
            ComposeMessage::Sent(outcome) => {
                self.compose.sending = false;
                match outcome {
                    Ok(()) => {
                        info!("Message submitted");
                        self.toasts.info("Message queued for delivery");
                        let forget = self.forget_stored_draft();
                        let return_to = self.compose.return_to;
                        self.compose.finish();
                        return Task::batch([forget, self.enter_page(return_to)]);
                    }
                    Err(failure) if failure.unauthorized => {
                        return self.report("Send failed", &failure);
                    }
                    Err(failure) => self.compose.error = Some(failure.message),
                }
            }
            ComposeMessage::Cancel => {
                let return_to = self.compose.return_to;
                self.compose.finish();
                return self.enter_page(return_to);
            }
        }
        Task::none()
    }

    /// Opens compose with `draft`, then looks for a saved body under its key.
    pub(crate) fn start_compose(&mut self, draft: Draft, return_to: Page) -> Task<Message> {
        let key = draft.storage_key();
        self.compose.start(draft, return_to);
        self.page = Page::Compose;

        let Some(store) = self.store.clone() else {
            return Task::none();
        };
        Task::perform(
            async move {
                let body = store.get(&key).await.unwrap_or_else(|e| {
                    warn!("Failed to read saved draft: {e}");
                    None
                });
                (key, body)
            },
            |(key, body)| Message::Compose(ComposeMessage::DraftRestored(key, body)),
        )
    }

    fn edit_draft(&mut self, edit: impl FnOnce(&mut Draft)) {
        if let Some(draft) = &mut self.compose.draft {
            edit(draft);
        }
    }

    fn autosave_body(&self) -> Task<Message> {
        let (Some(store), Some(draft)) = (self.store.clone(), self.compose.draft.as_ref()) else {
            return Task::none();
        };
        let key = draft.storage_key();
        let body = self.compose.body.text();
        Task::perform(
            async move { store.save_draft(&key, &body).await.map_err(|e| e.to_string()) },
            Message::Persisted,
        )
    }

    fn forget_stored_draft(&self) -> Task<Message> {
        let (Some(store), Some(draft)) = (self.store.clone(), self.compose.draft.as_ref()) else {
            return Task::none();
        };
        let key = draft.storage_key();
        Task::perform(
            async move {
                store
                    .delete(&key)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            },
            Message::Persisted,
        )
    }

    fn send_draft(&mut self) -> Task<Message> {
        if self.compose.sending {
            return Task::none();
        }
        let Some(draft) = self.compose.current_draft() else {
            return Task::none();
        };
        let outgoing = match draft.validate() {
            Ok(outgoing) => outgoing,
            Err(e) => {
                self.compose.error = Some(e.to_string());
                return Task::none();
            }
        };
        self.compose.sending = true;
        self.compose.error = None;
        let account_id = draft.account_id;
        self.call(
            move |client| async move { outgoing.submit(&client, account_id).await },
            |outcome| Message::Compose(ComposeMessage::Sent(outcome)),
        )
    }
}
