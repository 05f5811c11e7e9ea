//! Shared list/add/edit/delete handling for the record pages.

use std::future::Future;

use iced::Task;
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{OAuth2Entity, OAuth2Request, Proxy, ProxyRequest};
use rustmailer_console_core::dialog::{OAuth2Dialog, ProxyDialog};
use rustmailer_console_core::forms::{OAuth2Form, ProxyForm, ValidationResult};
use tracing::debug;

use crate::RustMailerConsole;
use crate::message::{Message, OAuth2Action, OAuth2Field, ProxyAction, RecordMessage};
use crate::model::RecordPage;

/// A server-side record managed through a list page with add, edit and
/// delete dialogs.
pub(crate) trait Record: Clone + std::fmt::Debug + Send + Sized + 'static {
    /// Raw form state.
    type Form: Default;
    /// Validated request submitted on save.
    type Request: Send + 'static;
    /// Dialog kinds of the page.
    type Dialog: Copy + PartialEq;
    /// Page-specific actions.
    type Action;

    /// Singular name used in notifications.
    const NOUN: &'static str;
    /// Plural name used in notifications.
    const PLURAL: &'static str;
    /// Add dialog.
    const ADD: Self::Dialog;
    /// Edit dialog.
    const EDIT: Self::Dialog;
    /// Delete confirmation.
    const DELETE: Self::Dialog;

    /// Server id.
    fn id(&self) -> u64;

    /// Edit form prefilled from the record.
    fn to_form(&self) -> Self::Form;

    /// Validates a form into a request.
    ///
    /// # Errors
    ///
    /// Returns the field errors to show inline.
    fn validate(form: &Self::Form) -> ValidationResult<Self::Request>;

    /// Fetches every record.
    fn list(client: ApiClient)
    -> impl Future<Output = rustmailer_console_api::Result<Vec<Self>>> + Send + 'static;

    /// Creates (`id` is `None`) or updates a record, resolving to its id.
    fn save(
        client: ApiClient,
        id: Option<u64>,
        request: Self::Request,
    ) -> impl Future<Output = rustmailer_console_api::Result<u64>> + Send + 'static;

    /// Deletes a record.
    fn delete(
        client: ApiClient,
        id: u64,
    ) -> impl Future<Output = rustmailer_console_api::Result<()>> + Send + 'static;

    /// The page state holding these records.
    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, Self::Form, Self::Dialog>;

    /// Wraps a page message.
    fn wrap(msg: RecordMessage<Self, Self::Action>) -> Message;

    /// Handles a page-specific action.
    fn handle_action(app: &mut RustMailerConsole, action: Self::Action) -> Task<Message>;

    /// Follow-up once the list was replaced.
    fn after_loaded(_app: &mut RustMailerConsole) -> Task<Message> {
        Task::none()
    }

    /// Called after the add or edit dialog opened.
    fn after_open(_app: &mut RustMailerConsole) {}

    /// Called before the form is validated.
    fn before_save(_app: &mut RustMailerConsole) {}

    /// Called with a request about to be submitted.
    fn on_validated(_app: &mut RustMailerConsole, _id: Option<u64>, _request: &Self::Request) {}

    /// Follow-up once a save succeeded.
    fn after_saved(_app: &mut RustMailerConsole, _id: u64, _created: bool) -> Task<Message> {
        Task::none()
    }
}

impl RustMailerConsole {
    /// Handles the messages shared by every record page.
    pub(crate) fn handle_records<T: Record>(
        &mut self,
        msg: RecordMessage<T, T::Action>,
    ) -> Task<Message> {
        match msg {
            RecordMessage::Refresh => self.load_records::<T>(),
            RecordMessage::Loaded(Ok(items)) => {
                debug!("Loaded {} {}", items.len(), T::PLURAL);
                T::page(self).loaded(items);
                T::after_loaded(self)
            }
            RecordMessage::Loaded(Err(failure)) => {
                T::page(self).load_failed(failure.message.clone());
                self.report(&format!("Loading {} failed", T::PLURAL), &failure)
            }
            RecordMessage::OpenAdd => {
                T::page(self).open_blank(T::ADD);
                T::after_open(self);
                Task::none()
            }
            RecordMessage::OpenEdit(id) => {
                let page = T::page(self);
                if let Some(row) = page.find(id, T::id).cloned() {
                    let form = row.to_form();
                    page.open_for(T::EDIT, row, form);
                    T::after_open(self);
                }
                Task::none()
            }
            RecordMessage::OpenDelete(id) => {
                let page = T::page(self);
                if let Some(row) = page.find(id, T::id).cloned() {
                    page.open_for(T::DELETE, row, T::Form::default());
                }
                Task::none()
            }
            RecordMessage::CloseDialog => {
                T::page(self).close();
                Task::none()
            }
            RecordMessage::Save => self.save_record::<T>(),
            RecordMessage::Saved(outcome) => {
                let page = T::page(self);
                page.saving = false;
                match outcome {
                    Ok(id) => {
                        let created = page.dialog.is_open(T::ADD);
                        page.close();
                        self.toasts.info(format!("{} saved", capitalize(T::NOUN)));
                        Task::batch([self.load_records::<T>(), T::after_saved(self, id, created)])
                    }
                    Err(failure) => self.report(&format!("Saving {} failed", T::NOUN), &failure),
                }
            }
            RecordMessage::ConfirmDelete => {
                let page = T::page(self);
                let Some(id) = page.dialog.current_row().map(T::id) else {
                    return Task::none();
                };
                page.saving = true;
                self.call(
                    move |client| T::delete(client, id),
                    |outcome| T::wrap(RecordMessage::Deleted(outcome)),
                )
            }
            RecordMessage::Deleted(outcome) => {
                let page = T::page(self);
                page.saving = false;
                match outcome {
                    Ok(()) => {
                        page.close();
                        self.toasts.info(format!("{} deleted", capitalize(T::NOUN)));
                        self.load_records::<T>()
                    }
                    Err(failure) => {
                        self.report(&format!("Deleting {} failed", T::NOUN), &failure)
                    }
                }
            }
            RecordMessage::Action(action) => T::handle_action(self, action),
        }
    }

    fn save_record<T: Record>(&mut self) -> Task<Message> {
        if T::page(self).saving {
            return Task::none();
        }
        T::before_save(self);
        let page = T::page(self);
        let id = page
            .dialog
            .is_open(T::EDIT)
            .then(|| page.dialog.current_row().map(T::id))
            .flatten();
        let request = match T::validate(&page.form) {
            Ok(request) => request,
            Err(errors) => {
                page.errors = errors;
                return Task::none();
            }
        };
        page.errors.clear();
        page.saving = true;
        T::on_validated(self, id, &request);
        self.call(
            move |client| T::save(client, id, request),
            |outcome| T::wrap(RecordMessage::Saved(outcome)),
        )
    }

    /// Starts reloading the list of `T`.
    pub(crate) fn load_records<T: Record>(&mut self) -> Task<Message> {
        T::page(self).start_loading();
        self.call(T::list, |outcome| T::wrap(RecordMessage::Loaded(outcome)))
    }
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl Record for Proxy {
    type Form = ProxyForm;
    type Request = ProxyRequest;
    type Dialog = ProxyDialog;
    type Action = ProxyAction;

    const NOUN: &'static str = "proxy";
    const PLURAL: &'static str = "proxies";
    const ADD: ProxyDialog = ProxyDialog::Add;
    const EDIT: ProxyDialog = ProxyDialog::Edit;
    const DELETE: ProxyDialog = ProxyDialog::Delete;

    fn id(&self) -> u64 {
        self.id
    }

    fn to_form(&self) -> ProxyForm {
        ProxyForm::from_proxy(self)
    }

    fn validate(form: &ProxyForm) -> ValidationResult<ProxyRequest> {
        form.validate()
    }

    async fn list(client: ApiClient) -> rustmailer_console_api::Result<Vec<Self>> {
        client.list_proxies().await
    }

    async fn save(
        client: ApiClient,
        id: Option<u64>,
        request: ProxyRequest,
    ) -> rustmailer_console_api::Result<u64> {
        match id {
            Some(id) => client.update_proxy(id, &request).await.map(|()| id),
            None => client.create_proxy(&request).await.map(|proxy| proxy.id),
        }
    }

    async fn delete(client: ApiClient, id: u64) -> rustmailer_console_api::Result<()> {
        client.delete_proxy(id).await
    }

    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, ProxyForm, ProxyDialog> {
        &mut app.proxies
    }

    fn wrap(msg: RecordMessage<Self, ProxyAction>) -> Message {
        Message::Proxies(msg)
    }

    fn handle_action(app: &mut RustMailerConsole, action: ProxyAction) -> Task<Message> {
        match action {
            ProxyAction::UrlChanged(url) => app.proxies.form.url = url,
        }
        Task::none()
    }
}

impl Record for OAuth2Entity {
    type Form = OAuth2Form;
    type Request = OAuth2Request;
    type Dialog = OAuth2Dialog;
    type Action = OAuth2Action;

    const NOUN: &'static str = "OAuth2 configuration";
    const PLURAL: &'static str = "OAuth2 configurations";
    const ADD: OAuth2Dialog = OAuth2Dialog::Add;
    const EDIT: OAuth2Dialog = OAuth2Dialog::Edit;
    const DELETE: OAuth2Dialog = OAuth2Dialog::Delete;

    fn id(&self) -> u64 {
        self.id
    }

    fn to_form(&self) -> OAuth2Form {
        OAuth2Form::from_entity(self)
    }

    fn validate(form: &OAuth2Form) -> ValidationResult<OAuth2Request> {
        form.validate()
    }

    async fn list(client: ApiClient) -> rustmailer_console_api::Result<Vec<Self>> {
        client.list_oauth2().await
    }

    async fn save(
        client: ApiClient,
        id: Option<u64>,
        request: OAuth2Request,
    ) -> rustmailer_console_api::Result<u64> {
        match id {
            Some(id) => client.update_oauth2(id, &request).await.map(|()| id),
            None => client.create_oauth2(&request).await.map(|entity| entity.id),
        }
    }

    async fn delete(client: ApiClient, id: u64) -> rustmailer_console_api::Result<()> {
        client.delete_oauth2(id).await
    }

    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, OAuth2Form, OAuth2Dialog> {
        &mut app.oauth2
    }

    fn wrap(msg: RecordMessage<Self, OAuth2Action>) -> Message {
        Message::OAuth2(msg)
    }

    fn handle_action(app: &mut RustMailerConsole, action: OAuth2Action) -> Task<Message> {
        let form = &mut app.oauth2.form;
        match action {
            OAuth2Action::FieldChanged(field, value) => {
                let target = match field {
                    OAuth2Field::Description => &mut form.description,
                    OAuth2Field::ClientId => &mut form.client_id,
                    OAuth2Field::ClientSecret => &mut form.client_secret,
                    OAuth2Field::AuthUrl => &mut form.auth_url,
                    OAuth2Field::TokenUrl => &mut form.token_url,
                    OAuth2Field::RedirectUri => &mut form.redirect_uri,
                    OAuth2Field::Scopes => &mut form.scopes,
                    OAuth2Field::ExtraParams => &mut form.extra_params,
                };
                *target = value;
            }
            OAuth2Action::EnabledToggled(enabled) => form.enabled = enabled,
            OAuth2Action::ProxySelected(proxy) => form.use_proxy = proxy,
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("proxy"), "Proxy");
        assert_eq!(capitalize("OAuth2 configuration"), "OAuth2 configuration");
        assert_eq!(capitalize(""), "");
    }
}
