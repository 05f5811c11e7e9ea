//! MTA page, including the test send.

use iced::Task;
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{Mta, MtaRequest};
use rustmailer_console_core::dialog::MtaDialog;
use rustmailer_console_core::forms::{MtaForm, ValidationResult};

use super::records::Record;
use crate::RustMailerConsole;
use crate::message::{Message, MtaAction, RecordMessage};
use crate::model::{MtaTestForm, RecordPage};

impl Record for Mta {
    type Form = MtaForm;
    type Request = MtaRequest;
    type Dialog = MtaDialog;
    type Action = MtaAction;

    const NOUN: &'static str = "MTA";
    const PLURAL: &'static str = "MTAs";
    const ADD: MtaDialog = MtaDialog::Add;
    const EDIT: MtaDialog = MtaDialog::Edit;
    const DELETE: MtaDialog = MtaDialog::Delete;

    fn id(&self) -> u64 {
        self.id
    }

    fn to_form(&self) -> MtaForm {
        MtaForm::from_mta(self)
    }

    fn validate(form: &MtaForm) -> ValidationResult<MtaRequest> {
        form.validate()
    }

    async fn list(client: ApiClient) -> rustmailer_console_api::Result<Vec<Self>> {
        client.list_mtas().await
    }

    async fn save(
        client: ApiClient,
        id: Option<u64>,
        request: MtaRequest,
    ) -> rustmailer_console_api::Result<u64> {
        match id {
            Some(id) => client.update_mta(id, &request).await.map(|()| id),
            None => client.create_mta(&request).await.map(|mta| mta.id),
        }
    }

    async fn delete(client: ApiClient, id: u64) -> rustmailer_console_api::Result<()> {
        client.delete_mta(id).await
    }

    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, MtaForm, MtaDialog> {
        &mut app.mtas.records
    }

    fn wrap(msg: RecordMessage<Self, MtaAction>) -> Message {
        Message::Mtas(msg)
    }

    fn handle_action(app: &mut RustMailerConsole, action: MtaAction) -> Task<Message> {
        let form = &mut app.mtas.records.form;
        match action {
            MtaAction::DescriptionChanged(description) => form.description = description,
            MtaAction::HostChanged(host) => form.host = host,
            MtaAction::PortChanged(port) => form.port = port,
            MtaAction::EncryptionSelected(encryption) => form.encryption = encryption,
            MtaAction::UsernameChanged(username) => form.username = username,
            MtaAction::PasswordChanged(password) => form.password = password,
            MtaAction::DsnToggled(dsn) => form.dsn_capable = dsn,
            MtaAction::ProxySelected(proxy) => form.use_proxy = proxy,
            MtaAction::OpenSendTest(id) => {
                if let Some(mta) = app.mtas.records.find(id, |m| m.id).cloned() {
                    app.mtas.test = MtaTestForm {
                        from: mta.credentials.username.clone(),
                        subject: "RustMailer test message".to_string(),
                        ..MtaTestForm::default()
                    };
                    app.mtas.test_error = None;
                    app.mtas
                        .records
                        .open_for(MtaDialog::SendTest, mta, MtaForm::default());
                }
            }
            MtaAction::TestFieldChanged(field, value) => app.mtas.test.set(field, value),
            MtaAction::SendTest => return app.send_mta_test(),
            MtaAction::TestSent(outcome) => {
                app.mtas.records.saving = false;
                match outcome {
                    Ok(()) => {
                        app.mtas.records.close();
                        app.toasts.info("Test message sent");
                    }
                    Err(failure) => return app.report("Test send failed", &failure),
                }
            }
        }
        Task::none()
    }
}

impl RustMailerConsole {
    fn send_mta_test(&mut self) -> Task<Message> {
        if self.mtas.records.saving {
            return Task::none();
        }
        let Some(mta_id) = self.mtas.records.dialog.current_row().map(|m| m.id) else {
            return Task::none();
        };
        let request = match self.mtas.test.request() {
            Ok(request) => request,
            Err(e) => {
                self.mtas.test_error = Some(e);
                return Task::none();
            }
        };
        self.mtas.test_error = None;
        self.mtas.records.saving = true;
        self.call(
            move |client| async move { client.send_test_mta(mta_id, &request).await },
            |outcome| Message::Mtas(RecordMessage::Action(MtaAction::TestSent(outcome))),
        )
    }
}
