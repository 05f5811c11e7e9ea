//! Mailbox browser: tree, envelope paging, message actions and filters.

use iced::Task;
use rustmailer_console_api::types::{
    EnvelopeFlag, FlagAction, FlagMessageRequest, MailboxTransferRequest, MessageDeleteRequest,
};
use rustmailer_console_core::dialog::MessageDialog;
use rustmailer_console_core::filter::FilterOperator;
use rustmailer_console_core::{ComposeMode, Draft, PageRequest, PagerError, fetch_envelopes};
use tracing::{debug, warn};

use crate::RustMailerConsole;
use crate::message::{FilterMessage, FlagChange, MailboxMessage, Message, Outcome, Page};
use crate::model::{OpenMessage, readable_body};

impl FlagChange {
    /// Flags added and removed by this change.
    fn action(self) -> FlagAction {
        let (add, remove) = match self {
            Self::MarkSeen => (Some(EnvelopeFlag::Seen), None),
            Self::MarkUnseen => (None, Some(EnvelopeFlag::Seen)),
            Self::Flag => (Some(EnvelopeFlag::Flagged), None),
            Self::Unflag => (None, Some(EnvelopeFlag::Flagged)),
        };
        FlagAction {
            add: add.map(|flag| vec![flag]),
            remove: remove.map(|flag| vec![flag]),
        }
    }
}

impl RustMailerConsole {
    #[allow(clippy::too_many_lines)]
    pub(crate) fn handle_mailboxes(&mut self, msg: MailboxMessage) -> Task<Message> {
        match msg {
            MailboxMessage::AccountSelected(account_id) => {
                if !self.mailboxes.select_account(account_id) {
                    return Task::none();
                }
                Task::batch([
                    self.load_mailboxes(account_id),
                    self.load_collapsed(account_id),
                ])
            }
            MailboxMessage::MailboxesLoaded(account_id, outcome) => {
                if self.mailboxes.account_id != Some(account_id) {
                    return Task::none();
                }
                match outcome {
                    Ok(mailboxes) => {
                        self.mailboxes.set_mailboxes(mailboxes);
                        if self.mailboxes.selected.is_none()
                            && let Some(default) = self.mailboxes.default_mailbox()
                        {
                            let default = default.to_string();
                            return self.handle_mailboxes(MailboxMessage::MailboxSelected(default));
                        }
                        Task::none()
                    }
                    Err(failure) => {
                        self.mailboxes.loading_mailboxes = false;
                        self.report("Loading mailboxes failed", &failure)
                    }
                }
            }
            MailboxMessage::CollapsedLoaded(account_id, result) => {
                if self.mailboxes.account_id == Some(account_id) {
                    match result {
                        Ok(collapsed) => self.mailboxes.collapsed = collapsed,
                        Err(e) => warn!("Failed to read tree state: {e}"),
                    }
                }
                Task::none()
            }
            MailboxMessage::ToggleNode(id) => {
                self.mailboxes.toggle_node(&id);
                self.save_collapsed()
            }
            MailboxMessage::MailboxSelected(name) => {
                self.mailboxes.selected = Some(name);
                self.mailboxes.clear_selection();
                self.reload_envelopes()
            }
            MailboxMessage::RemoteToggled(remote) => {
                self.mailboxes.remote = remote;
                self.mailboxes.clear_selection();
                let mailboxes = self
                    .mailboxes
                    .account_id
                    .map_or_else(Task::none, |id| self.load_mailboxes(id));
                Task::batch([mailboxes, self.reload_envelopes()])
            }
            MailboxMessage::Refresh => {
                let mailboxes = self
                    .mailboxes
                    .account_id
                    .map_or_else(Task::none, |id| self.load_mailboxes(id));
                let page = match self.mailboxes.pager.refresh() {
                    Ok(request) => self.fetch_page(request),
                    Err(e) => {
                        debug!("Nothing to refresh: {e}");
                        Task::none()
                    }
                };
                Task::batch([mailboxes, page])
            }
            MailboxMessage::PageLoaded(ticket, outcome) => {
                match outcome {
                    Ok(page) => {
                        if !self.mailboxes.pager.complete(ticket, page) {
                            debug!("Dropped stale envelope page");
                        }
                    }
                    Err(failure) => {
                        if self.mailboxes.pager.fail(ticket, failure.message.clone()) {
                            return self.report("Loading messages failed", &failure);
                        }
                    }
                }
                Task::none()
            }
            MailboxMessage::NextPage => {
                let result = self.mailboxes.pager.next_page();
                self.turn_page(result)
            }
            MailboxMessage::PreviousPage => {
                let result = self.mailboxes.pager.previous_page();
                self.turn_page(result)
            }
            MailboxMessage::ToggleChecked(uid) => {
                if !self.mailboxes.checked.remove(&uid) {
                    self.mailboxes.checked.insert(uid);
                }
                Task::none()
            }
            MailboxMessage::ToggleAllChecked => {
                self.mailboxes.toggle_all_checked();
                Task::none()
            }
            MailboxMessage::Open(uid) => self.open_message(uid),
            MailboxMessage::ContentLoaded(uid, outcome) => {
                let Some(open) = self.mailboxes.open.as_mut().filter(|m| m.uid == uid) else {
                    return Task::none();
                };
                match outcome {
                    Ok(content) => open.content = Some(content),
                    Err(failure) if failure.unauthorized => {
                        return self.report("Loading message failed", &failure);
                    }
                    Err(failure) => open.error = Some(failure.message),
                }
                Task::none()
            }
            MailboxMessage::CloseMessage => {
                self.mailboxes.open = None;
                Task::none()
            }
            MailboxMessage::Flag(change) => self.flag_messages(change),
            MailboxMessage::Flagged(outcome) => self.after_message_action("Flag change", true, outcome),
            MailboxMessage::OpenMove => {
                if !self.mailboxes.target_uids().is_empty() {
                    self.mailboxes.move_target.clear();
                    self.mailboxes.dialog.open(MessageDialog::Move);
                }
                Task::none()
            }
            MailboxMessage::MoveTargetChanged(target) => {
                self.mailboxes.move_target = target;
                Task::none()
            }
            MailboxMessage::ConfirmMove => self.move_messages(),
            MailboxMessage::Moved(outcome) => self.after_message_action("Move", false, outcome),
            MailboxMessage::OpenDelete => {
                if !self.mailboxes.target_uids().is_empty() {
                    self.mailboxes.dialog.open(MessageDialog::Delete);
                }
                Task::none()
            }
            MailboxMessage::ConfirmDelete => self.delete_messages(),
            MailboxMessage::Deleted(outcome) => self.after_message_action("Delete", false, outcome),
            MailboxMessage::Filter(msg) => self.handle_filter(msg),
            MailboxMessage::CloseDialog => {
                self.mailboxes.dialog.close();
                Task::none()
            }
            MailboxMessage::Respond(mode) => self.respond(mode),
        }
    }

    fn load_mailboxes(&mut self, account_id: u64) -> Task<Message> {
        self.mailboxes.loading_mailboxes = true;
        let remote = self.mailboxes.remote;
        self.call(
            move |client| async move { client.list_mailboxes(account_id, remote).await },
            move |outcome| Message::Mailboxes(MailboxMessage::MailboxesLoaded(account_id, outcome)),
        )
    }

    fn load_collapsed(&self, account_id: u64) -> Task<Message> {
        let Some(store) = self.store.clone() else {
            return Task::none();
        };
        Task::perform(
            async move {
                store
                    .collapsed_nodes(account_id)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::Mailboxes(MailboxMessage::CollapsedLoaded(account_id, result)),
        )
    }

    fn save_collapsed(&self) -> Task<Message> {
        let (Some(store), Some(account_id)) = (self.store.clone(), self.mailboxes.account_id)
        else {
            return Task::none();
        };
        let collapsed = self.mailboxes.collapsed.clone();
        Task::perform(
            async move {
                store
                    .set_collapsed_nodes(account_id, &collapsed)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::Persisted,
        )
    }

    /// Starts over at the first page of the current mailbox, filter and source.
    fn reload_envelopes(&mut self) -> Task<Message> {
        let Some(key) = self.mailboxes.page_key() else {
            return Task::none();
        };
        self.mailboxes.pager.set_key(key);
        match self.mailboxes.pager.request(0) {
            Ok(Some(request)) => self.fetch_page(request),
            Ok(None) => Task::none(),
            Err(e) => {
                warn!("Cannot load first page: {e}");
                Task::none()
            }
        }
    }

    fn turn_page(&mut self, result: Result<Option<PageRequest>, PagerError>) -> Task<Message> {
        match result {
            Ok(Some(request)) => {
                self.mailboxes.clear_selection();
                self.fetch_page(request)
            }
            Ok(None) => {
                self.mailboxes.clear_selection();
                Task::none()
            }
            Err(e) => {
                debug!("Page change ignored: {e}");
                Task::none()
            }
        }
    }

    fn fetch_page(&self, request: PageRequest) -> Task<Message> {
        let ticket = request.ticket;
        self.call(
            move |client| async move { fetch_envelopes(&client, &request).await },
            move |outcome| Message::Mailboxes(MailboxMessage::PageLoaded(ticket, outcome)),
        )
    }

    fn open_message(&mut self, uid: u32) -> Task<Message> {
        let (Some(account_id), Some(mailbox)) =
            (self.mailboxes.account_id, self.mailboxes.selected.clone())
        else {
            return Task::none();
        };
        self.mailboxes.open = Some(OpenMessage {
            uid,
            content: None,
            error: None,
        });
        self.call(
            move |client| async move { client.message_content(account_id, &mailbox, uid).await },
            move |outcome| Message::Mailboxes(MailboxMessage::ContentLoaded(uid, outcome)),
        )
    }

    /// Account and mailbox of the selection plus the UIDs it targets.
    fn selection(&self) -> Option<(u64, String, Vec<u32>)> {
        let uids = self.mailboxes.target_uids();
        if uids.is_empty() || self.mailboxes.busy {
            return None;
        }
        Some((
            self.mailboxes.account_id?,
            self.mailboxes.selected.clone()?,
            uids,
        ))
    }

    fn flag_messages(&mut self, change: FlagChange) -> Task<Message> {
        let Some((account_id, mailbox, uids)) = self.selection() else {
            return Task::none();
        };
        self.mailboxes.busy = true;
        let request = FlagMessageRequest {
            uids,
            mailbox,
            action: change.action(),
        };
        self.call(
            move |client| async move { client.flag_messages(account_id, &request).await },
            |outcome| Message::Mailboxes(MailboxMessage::Flagged(outcome)),
        )
    }

    fn move_messages(&mut self) -> Task<Message> {
        let target = self.mailboxes.move_target.trim().to_string();
        let Some((account_id, current_mailbox, uids)) = self.selection() else {
            return Task::none();
        };
        if target.is_empty() || target == current_mailbox {
            self.toasts.error("Pick a different mailbox to move to");
            return Task::none();
        }
        self.mailboxes.busy = true;
        let request = MailboxTransferRequest {
            uids,
            current_mailbox,
            target_mailbox: target,
        };
        self.call(
            move |client| async move { client.move_messages(account_id, &request).await },
            |outcome| Message::Mailboxes(MailboxMessage::Moved(outcome)),
        )
    }

    fn delete_messages(&mut self) -> Task<Message> {
        let Some((account_id, mailbox, uids)) = self.selection() else {
            return Task::none();
        };
        self.mailboxes.busy = true;
        let request = MessageDeleteRequest { uids, mailbox };
        self.call(
            move |client| async move { client.delete_messages(account_id, &request).await },
            |outcome| Message::Mailboxes(MailboxMessage::Deleted(outcome)),
        )
    }

    /// Closes the dialog and reloads the page after a flag, move or delete.
    fn after_message_action(
        &mut self,
        what: &str,
        keep_selection: bool,
        outcome: Outcome<()>,
    ) -> Task<Message> {
        self.mailboxes.busy = false;
        match outcome {
            Ok(()) => {
                self.mailboxes.dialog.close();
                if !keep_selection {
                    self.mailboxes.clear_selection();
                }
                self.handle_mailboxes(MailboxMessage::Refresh)
            }
            Err(failure) => self.report(&format!("{what} failed"), &failure),
        }
    }

    fn handle_filter(&mut self, msg: FilterMessage) -> Task<Message> {
        let filter = &mut self.mailboxes.filter;
        match msg {
            FilterMessage::Open => self.mailboxes.open_filter(),
            FilterMessage::OperatorSelected(operator) => filter.operator = Some(operator),
            FilterMessage::AddCondition => {
                self.mailboxes.add_condition();
                let filter = &mut self.mailboxes.filter;
                if filter.conditions.len() > 1 && filter.operator.is_none() {
                    filter.operator = Some(FilterOperator::And);
                }
            }
            FilterMessage::RemoveCondition(index) => {
                if index < filter.conditions.len() {
                    filter.conditions.remove(index);
                }
                if filter.conditions.len() <= 1 {
                    filter.operator = None;
                }
            }
            FilterMessage::FieldSelected(index, field) => {
                if let Some(condition) = filter.conditions.get_mut(index) {
                    condition.field = field;
                }
            }
            FilterMessage::ComparisonSelected(index, comparison) => {
                if let Some(condition) = filter.conditions.get_mut(index) {
                    condition.comparison = comparison;
                }
            }
            FilterMessage::ValueChanged(index, value) => {
                if let Some(condition) = filter.conditions.get_mut(index) {
                    condition.value = value;
                }
            }
            FilterMessage::Apply => {
                if self.mailboxes.apply_filter().is_ok() {
                    self.mailboxes.clear_selection();
                    return self.reload_envelopes();
                }
            }
            FilterMessage::Clear => {
                self.mailboxes.clear_filter();
                self.mailboxes.clear_selection();
                return self.reload_envelopes();
            }
        }
        Task::none()
    }

    /// Starts a reply, reply-all or forward of the open message.
    fn respond(&mut self, mode: ComposeMode) -> Task<Message> {
        let Some(envelope) = self.mailboxes.open_envelope().cloned() else {
            return Task::none();
        };
        let body = self
            .mailboxes
            .open
            .as_ref()
            .and_then(|open| open.content.as_ref())
            .and_then(readable_body);
        let own_address = self
            .accounts
            .records
            .find(envelope.account_id, |a| a.id)
            .map(|a| a.email.clone())
            .unwrap_or_default();
        let draft = match mode {
            ComposeMode::Forward => Draft::forward(envelope.account_id, &envelope, body.as_deref()),
            ComposeMode::Reply | ComposeMode::ReplyAll => Draft::reply(
                envelope.account_id,
                &envelope,
                body.as_deref(),
                &own_address,
                mode == ComposeMode::ReplyAll,
            ),
            ComposeMode::New => Draft::new(envelope.account_id),
        };
        self.start_compose(draft, Page::Mailboxes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rustmailer_console_core::PageKey;

    use super::*;
    use crate::message::ApiFailure;

    fn failure(unauthorized: bool) -> ApiFailure {
        ApiFailure {
            message: "server returned 503".to_string(),
            unauthorized,
        }
    }

    #[test]
    fn test_flag_change_actions() {
        assert_eq!(
            FlagChange::MarkSeen.action(),
            FlagAction {
                add: Some(vec![EnvelopeFlag::Seen]),
                remove: None,
            }
        );
        assert_eq!(
            FlagChange::Unflag.action(),
            FlagAction {
                add: None,
                remove: Some(vec![EnvelopeFlag::Flagged]),
            }
        );
    }

    #[test]
    fn test_failed_page_shows_toast() {
        let mut app = RustMailerConsole::default();
        app.mailboxes.pager.set_key(PageKey::mailbox(1, "INBOX"));
        let request = app.mailboxes.pager.request(0).unwrap().unwrap();

        let _ = app.handle_mailboxes(MailboxMessage::PageLoaded(request.ticket, Err(failure(false))));

        assert_eq!(app.mailboxes.pager.error(), Some("server returned 503"));
        assert!(
            app.toasts
                .iter()
                .any(|t| t.is_error && t.text.contains("Loading messages failed"))
        );
    }

    #[test]
    fn test_stale_page_failure_is_silent() {
        let mut app = RustMailerConsole::default();
        app.mailboxes.pager.set_key(PageKey::mailbox(1, "INBOX"));
        let old = app.mailboxes.pager.request(0).unwrap().unwrap();
        app.mailboxes.pager.request(0).unwrap().unwrap();

        let _ = app.handle_mailboxes(MailboxMessage::PageLoaded(old.ticket, Err(failure(false))));

        assert!(app.toasts.is_empty());
        assert_eq!(app.mailboxes.pager.error(), None);
    }
}
