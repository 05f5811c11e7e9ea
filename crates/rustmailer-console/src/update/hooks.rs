//! Event hooks page, including the VRL script test.

use iced::Task;
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{EventHook, EventHookRequest, VrlScriptTestRequest};
use rustmailer_console_core::dialog::HookDialog;
use rustmailer_console_core::forms::{HookChannelForm, HookForm, NatsAuthForm, ValidationResult};

use super::records::Record;
use crate::RustMailerConsole;
use crate::message::{HookAction, Message, RecordMessage};
use crate::model::{RecordPage, parse_sample_event};

impl Record for EventHook {
    type Form = HookForm;
    type Request = EventHookRequest;
    type Dialog = HookDialog;
    type Action = HookAction;

    const NOUN: &'static str = "hook";
    const PLURAL: &'static str = "hooks";
    const ADD: HookDialog = HookDialog::Add;
    const EDIT: HookDialog = HookDialog::Edit;
    const DELETE: HookDialog = HookDialog::Delete;

    fn id(&self) -> u64 {
        self.id
    }

    fn to_form(&self) -> HookForm {
        HookForm::from_hook(self)
    }

    fn validate(form: &HookForm) -> ValidationResult<EventHookRequest> {
        form.validate()
    }

    async fn list(client: ApiClient) -> rustmailer_console_api::Result<Vec<Self>> {
        client.list_hooks().await
    }

    async fn save(
        client: ApiClient,
        id: Option<u64>,
        request: EventHookRequest,
    ) -> rustmailer_console_api::Result<u64> {
        match id {
            Some(id) => client.update_hook(id, &request).await.map(|()| id),
            None => client.create_hook(&request).await.map(|hook| hook.id),
        }
    }

    async fn delete(client: ApiClient, id: u64) -> rustmailer_console_api::Result<()> {
        client.delete_hook(id).await
    }

    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, HookForm, HookDialog> {
        &mut app.hooks.records
    }

    fn wrap(msg: RecordMessage<Self, HookAction>) -> Message {
        Message::Hooks(msg)
    }

    fn handle_action(app: &mut RustMailerConsole, action: HookAction) -> Task<Message> {
        app.handle_hook_action(action)
    }

    fn after_open(app: &mut RustMailerConsole) {
        app.hooks.sync_editor();
        app.hooks.vrl_result = None;
        app.hooks.vrl_error = None;
        app.hooks.return_to = None;
    }

    fn before_save(app: &mut RustMailerConsole) {
        app.hooks.sync_form();
    }
}

impl RustMailerConsole {
    #[allow(clippy::too_many_lines)]
    fn handle_hook_action(&mut self, action: HookAction) -> Task<Message> {
        let form = &mut self.hooks.records.form;
        match action {
            HookAction::AccountSelected(account_id) => form.account_id = account_id,
            HookAction::DescriptionChanged(description) => form.description = description,
            HookAction::EnabledToggled(enabled) => form.enabled = enabled,
            HookAction::HookTypeSelected(hook_type) => {
                self.hooks.sync_form();
                self.hooks.records.form.set_hook_type(hook_type);
                self.hooks.sync_editor();
            }
            HookAction::TargetUrlChanged(value) => {
                if let HookChannelForm::Http { target_url, .. } = &mut form.channel {
                    *target_url = value;
                }
            }
            HookAction::MethodSelected(value) => {
                if let HookChannelForm::Http { method, .. } = &mut form.channel {
                    *method = value;
                }
            }
            HookAction::HeadersAction(action) => self.hooks.headers.perform(action),
            HookAction::NatsHostChanged(value) => {
                if let HookChannelForm::Nats { host, .. } = &mut form.channel {
                    *host = value;
                }
            }
            HookAction::NatsPortChanged(value) => {
                if let HookChannelForm::Nats { port, .. } = &mut form.channel {
                    *port = value;
                }
            }
            HookAction::NatsAuthSelected(auth_type) => {
                if let HookChannelForm::Nats { auth, .. } = &mut form.channel {
                    auth.set_auth_type(auth_type);
                }
            }
            HookAction::NatsTokenChanged(value) => {
                if let HookChannelForm::Nats {
                    auth: NatsAuthForm::Token(token),
                    ..
                } = &mut form.channel
                {
                    *token = value;
                }
            }
            HookAction::NatsUsernameChanged(value) => {
                if let HookChannelForm::Nats {
                    auth: NatsAuthForm::Password { username, .. },
                    ..
                } = &mut form.channel
                {
                    *username = value;
                }
            }
            HookAction::NatsPasswordChanged(value) => {
                if let HookChannelForm::Nats {
                    auth: NatsAuthForm::Password { password, .. },
                    ..
                } = &mut form.channel
                {
                    *password = value;
                }
            }
            HookAction::StreamChanged(value) => {
                if let HookChannelForm::Nats { stream_name, .. } = &mut form.channel {
                    *stream_name = value;
                }
            }
            HookAction::NamespaceChanged(value) => {
                if let HookChannelForm::Nats { namespace, .. } = &mut form.channel {
                    *namespace = value;
                }
            }
            HookAction::EventToggled(event) => form.toggle_event(event),
            HookAction::ScriptAction(action) => {
                self.hooks.script.perform(action);
                self.hooks.sync_form();
            }
            HookAction::OpenVrlTest => self.open_vrl_test(),
            HookAction::SampleEventAction(action) => self.hooks.sample_event.perform(action),
            HookAction::RunVrlTest => return self.run_vrl_test(),
            HookAction::VrlResolved(outcome) => {
                self.hooks.vrl_running = false;
                match outcome {
                    Ok(result) => {
                        self.hooks.vrl_error = None;
                        self.hooks.vrl_result = Some(result);
                    }
                    Err(failure) if failure.unauthorized => {
                        return self.report("VRL test", &failure);
                    }
                    Err(failure) => self.hooks.vrl_error = Some(failure.message),
                }
            }
            HookAction::CloseVrlTest => self.close_vrl_test(),
        }
        Task::none()
    }

    /// Switches to the VRL test, remembering the dialog (and row) to return to.
    fn open_vrl_test(&mut self) {
        self.hooks.sync_form();
        let dialog = &mut self.hooks.records.dialog;
        self.hooks.return_to = dialog.current();
        match dialog.current_row().cloned() {
            Some(row) => dialog.open_with(HookDialog::VrlTest, row),
            None => dialog.open(HookDialog::VrlTest),
        }
        self.hooks.vrl_result = None;
        self.hooks.vrl_error = None;
    }

    fn close_vrl_test(&mut self) {
        let dialog = &mut self.hooks.records.dialog;
        match (self.hooks.return_to.take(), dialog.current_row().cloned()) {
            (Some(kind), Some(row)) => dialog.open_with(kind, row),
            (Some(kind), None) => dialog.open(kind),
            (None, _) => dialog.close(),
        }
    }

    fn run_vrl_test(&mut self) -> Task<Message> {
        if self.hooks.vrl_running {
            return Task::none();
        }
        self.hooks.sync_form();
        let program = self.hooks.records.form.vrl_script.clone();
        if program.trim().is_empty() {
            self.hooks.vrl_error = Some("Write a VRL script first".to_string());
            return Task::none();
        }
        let event = match parse_sample_event(&self.hooks.sample_event.text()) {
            Ok(event) => event,
            Err(e) => {
                self.hooks.vrl_error = Some(e);
                return Task::none();
            }
        };
        self.hooks.vrl_running = true;
        self.hooks.vrl_error = None;
        let request = VrlScriptTestRequest { program, event };
        self.call(
            move |client| async move { client.resolve_vrl_script(&request).await },
            |outcome| Message::Hooks(RecordMessage::Action(HookAction::VrlResolved(outcome))),
        )
    }
}
