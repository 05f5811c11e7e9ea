//! Accounts page: onboarding form, running state and OAuth2 authorization.

use iced::Task;
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{AccountEntity, AuthorizeUrlRequest};
use rustmailer_console_core::dialog::AccountDialog;
use rustmailer_console_core::forms::{
    AccountForm, MailerForm, ServerAuthForm, ServerForm, ValidatedAccount, ValidationResult,
};
use tracing::{info, warn};

use super::records::Record;
use crate::RustMailerConsole;
use crate::message::{
    AccountAction, MailboxMessage, Message, Page, RecordMessage, ServerField, ServerSide,
};
use crate::model::RecordPage;

impl Record for AccountEntity {
    type Form = AccountForm;
    type Request = ValidatedAccount;
    type Dialog = AccountDialog;
    type Action = AccountAction;

    const NOUN: &'static str = "account";
    const PLURAL: &'static str = "accounts";
    const ADD: AccountDialog = AccountDialog::Add;
    const EDIT: AccountDialog = AccountDialog::Edit;
    const DELETE: AccountDialog = AccountDialog::Delete;

    fn id(&self) -> u64 {
        self.id
    }

    fn to_form(&self) -> AccountForm {
        AccountForm::from_entity(self)
    }

    fn validate(form: &AccountForm) -> ValidationResult<ValidatedAccount> {
        form.validate()
    }

    async fn list(client: ApiClient) -> rustmailer_console_api::Result<Vec<Self>> {
        client.list_accounts().await
    }

    async fn save(
        client: ApiClient,
        id: Option<u64>,
        request: ValidatedAccount,
    ) -> rustmailer_console_api::Result<u64> {
        match id {
            Some(id) => client
                .update_account(id, &request.update_request())
                .await
                .map(|()| id),
            None => client
                .create_account(&request.request)
                .await
                .map(|account| account.id),
        }
    }

    async fn delete(client: ApiClient, id: u64) -> rustmailer_console_api::Result<()> {
        client.delete_account(id).await
    }

    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, AccountForm, AccountDialog> {
        &mut app.accounts.records
    }

    fn wrap(msg: RecordMessage<Self, AccountAction>) -> Message {
        Message::Accounts(msg)
    }

    fn handle_action(app: &mut RustMailerConsole, action: AccountAction) -> Task<Message> {
        app.handle_account_action(action)
    }

    fn after_loaded(app: &mut RustMailerConsole) -> Task<Message> {
        let first = app.accounts.records.items.first().map(|a| a.id);
        match (app.page, app.mailboxes.account_id, first) {
            (Page::Mailboxes, None, Some(id)) => {
                app.handle_mailboxes(MailboxMessage::AccountSelected(id))
            }
            _ => Task::none(),
        }
    }

    fn on_validated(app: &mut RustMailerConsole, id: Option<u64>, request: &ValidatedAccount) {
        app.accounts.pending_authorize = if id.is_none() {
            request.oauth2_name.clone()
        } else {
            None
        };
    }

    fn after_saved(app: &mut RustMailerConsole, id: u64, created: bool) -> Task<Message> {
        match app.accounts.pending_authorize.take() {
            Some(oauth2_name) if created => {
                info!("Authorizing new account {id} with {oauth2_name}");
                app.request_authorize_url(id, oauth2_name)
            }
            _ => Task::none(),
        }
    }
}

/// Server section of the form for `side`, when the mailer has one.
fn server_mut(form: &mut AccountForm, side: ServerSide) -> Option<&mut ServerForm> {
    match (&mut form.mailer, side) {
        (MailerForm::ImapSmtp { imap, .. }, ServerSide::Imap) => Some(imap),
        (MailerForm::ImapSmtp { smtp, .. }, ServerSide::Smtp) => Some(smtp),
        (MailerForm::GmailApi { .. }, _) => None,
    }
}

impl RustMailerConsole {
    fn handle_account_action(&mut self, action: AccountAction) -> Task<Message> {
        let form = &mut self.accounts.records.form;
        match action {
            AccountAction::EmailChanged(email) => {
                form.email = email;
                if !form.is_edit() {
                    form.apply_provider_defaults();
                }
            }
            AccountAction::NameChanged(name) => form.name = name,
            AccountAction::MailerTypeSelected(mailer_type) => form.set_mailer_type(mailer_type),
            AccountAction::ServerText(side, field, value) => {
                if let Some(server) = server_mut(form, side) {
                    match field {
                        ServerField::Host => server.host = value,
                        ServerField::Port => server.port = value,
                        ServerField::Password => {
                            if let ServerAuthForm::Password(password) = &mut server.auth {
                                *password = value;
                            }
                        }
                    }
                }
            }
            AccountAction::ServerEncryption(side, encryption) => {
                if let Some(server) = server_mut(form, side) {
                    server.encryption = encryption;
                }
            }
            AccountAction::ServerAuth(side, auth_type) => {
                if let Some(server) = server_mut(form, side) {
                    server.auth.set_auth_type(auth_type);
                }
            }
            AccountAction::ProxySelected(proxy) => match &mut form.mailer {
                MailerForm::ImapSmtp { imap, smtp } => {
                    imap.use_proxy = proxy;
                    smtp.use_proxy = proxy;
                }
                MailerForm::GmailApi { use_proxy } => *use_proxy = proxy,
            },
            AccountAction::OAuth2Selected(name) => {
                if self.accounts.records.dialog.is_open(AccountDialog::Authorize) {
                    self.accounts.authorize_with = name;
                } else {
                    form.oauth2_name = name;
                }
            }
            AccountAction::EnabledToggled(enabled) => form.enabled = enabled,
            AccountAction::MinimalSyncToggled(minimal) => form.minimal_sync = minimal,
            AccountAction::SyncIntervalChanged(minutes) => form.sync_interval_min = minutes,
            AccountAction::OpenRunningState(id) => {
                if let Some(account) = self.accounts.records.find(id, |a| a.id).cloned() {
                    self.accounts.open_running_state(account);
                    return self.poll_running_state();
                }
            }
            AccountAction::PollRunningState => return self.poll_running_state(),
            AccountAction::RunningStateLoaded(outcome) => {
                if !self.accounts.polls_running_state() {
                    return Task::none();
                }
                match outcome {
                    Ok(state) => {
                        self.accounts.running_state = Some(state);
                        self.accounts.running_error = None;
                    }
                    Err(failure) if failure.unauthorized => {
                        return self.report("Running state", &failure);
                    }
                    Err(failure) => self.accounts.running_error = Some(failure.message),
                }
            }
            AccountAction::OpenAuthorize(id) => {
                if let Some(account) = self.accounts.records.find(id, |a| a.id).cloned() {
                    let preselect = match self.oauth2.items.as_slice() {
                        [only] => Some(only.description.clone()),
                        _ => None,
                    };
                    self.accounts.open_authorize(account, preselect);
                }
            }
            AccountAction::Authorize => {
                let Some(id) = self.accounts.dialog_account_id() else {
                    return Task::none();
                };
                let name = self.accounts.authorize_with.trim().to_string();
                if name.is_empty() {
                    self.toasts.error("Choose an OAuth2 configuration");
                    return Task::none();
                }
                return self.request_authorize_url(id, name);
            }
            AccountAction::AuthorizeUrl(outcome) => {
                self.accounts.authorizing = false;
                match outcome {
                    Ok(url) => {
                        if self.accounts.records.dialog.is_open(AccountDialog::Authorize) {
                            self.accounts.authorize_url = Some(url);
                        } else {
                            self.open_in_browser(&url);
                        }
                    }
                    Err(failure) => return self.report("Authorization link", &failure),
                }
            }
            AccountAction::OpenAuthorizeUrl => {
                if let Some(url) = self.accounts.authorize_url.clone() {
                    self.open_in_browser(&url);
                }
            }
            AccountAction::Browse(id) => {
                let select = self.handle_mailboxes(MailboxMessage::AccountSelected(id));
                return Task::batch([select, self.enter_page(Page::Mailboxes)]);
            }
        }
        Task::none()
    }

    fn poll_running_state(&mut self) -> Task<Message> {
        let Some(id) = self.accounts.dialog_account_id() else {
            return Task::none();
        };
        if !self.accounts.polls_running_state() {
            return Task::none();
        }
        self.call(
            move |client| async move { client.account_running_state(id).await },
            |outcome| Message::Accounts(RecordMessage::Action(AccountAction::RunningStateLoaded(outcome))),
        )
    }

    fn request_authorize_url(&mut self, account_id: u64, oauth2_name: String) -> Task<Message> {
        self.accounts.authorizing = true;
        let request = AuthorizeUrlRequest {
            account_id,
            oauth2_name,
        };
        self.call(
            move |client| async move { client.oauth2_authorize_url(&request).await },
            |outcome| Message::Accounts(RecordMessage::Action(AccountAction::AuthorizeUrl(outcome))),
        )
    }

    fn open_in_browser(&mut self, url: &str) {
        match opener::open_browser(url) {
            Ok(()) => self.toasts.info("Authorization page opened in the browser"),
            Err(e) => {
                warn!("Failed to open browser: {e}");
                self.toasts.error(format!("Could not open the browser: {e}"));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_lookup() {
        let mut form = AccountForm::new();
        server_mut(&mut form, ServerSide::Smtp).unwrap().host = "smtp.example.com".into();
        let MailerForm::ImapSmtp { smtp, imap } = &form.mailer else {
            panic!("expected IMAP/SMTP form");
        };
        assert_eq!(smtp.host, "smtp.example.com");
        assert!(imap.host.is_empty());

        form.set_mailer_type(rustmailer_console_api::types::MailerType::GmailApi);
        assert!(server_mut(&mut form, ServerSide::Imap).is_none());
    }
}
