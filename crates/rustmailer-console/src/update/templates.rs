//! Email templates page, including the test send.

use iced::Task;
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{EmailTemplate, EmailTemplateRequest};
use rustmailer_console_core::dialog::TemplateDialog;
use rustmailer_console_core::forms::{TemplateForm, ValidationResult};

use super::records::Record;
use crate::RustMailerConsole;
use crate::message::{Message, RecordMessage, TemplateAction};
use crate::model::RecordPage;

impl Record for EmailTemplate {
    type Form = TemplateForm;
    type Request = EmailTemplateRequest;
    type Dialog = TemplateDialog;
    type Action = TemplateAction;

    const NOUN: &'static str = "template";
    const PLURAL: &'static str = "templates";
    const ADD: TemplateDialog = TemplateDialog::Add;
    const EDIT: TemplateDialog = TemplateDialog::Edit;
    const DELETE: TemplateDialog = TemplateDialog::Delete;

    fn id(&self) -> u64 {
        self.id
    }

    fn to_form(&self) -> TemplateForm {
        TemplateForm::from_template(self)
    }

    fn validate(form: &TemplateForm) -> ValidationResult<EmailTemplateRequest> {
        form.validate()
    }

    async fn list(client: ApiClient) -> rustmailer_console_api::Result<Vec<Self>> {
        client.list_templates().await
    }

    async fn save(
        client: ApiClient,
        id: Option<u64>,
        request: EmailTemplateRequest,
    ) -> rustmailer_console_api::Result<u64> {
        match id {
            Some(id) => client.update_template(id, &request).await.map(|()| id),
            None => client
                .create_template(&request)
                .await
                .map(|template| template.id),
        }
    }

    async fn delete(client: ApiClient, id: u64) -> rustmailer_console_api::Result<()> {
        client.delete_template(id).await
    }

    fn page(app: &mut RustMailerConsole) -> &mut RecordPage<Self, TemplateForm, TemplateDialog> {
        &mut app.templates.records
    }

    fn wrap(msg: RecordMessage<Self, TemplateAction>) -> Message {
        Message::Templates(msg)
    }

    fn handle_action(app: &mut RustMailerConsole, action: TemplateAction) -> Task<Message> {
        app.handle_template_action(action)
    }

    fn after_open(app: &mut RustMailerConsole) {
        app.templates.sync_editors();
    }

    fn before_save(app: &mut RustMailerConsole) {
        app.templates.sync_form();
    }
}

impl RustMailerConsole {
    fn handle_template_action(&mut self, action: TemplateAction) -> Task<Message> {
        let form = &mut self.templates.records.form;
        match action {
            TemplateAction::AccountSelected(account_id) => form.account_id = account_id,
            TemplateAction::DescriptionChanged(description) => form.description = description,
            TemplateAction::SubjectChanged(subject) => form.subject = subject,
            TemplateAction::PreviewChanged(preview) => form.preview = preview,
            TemplateAction::TextAction(action) => self.templates.text.perform(action),
            TemplateAction::HtmlAction(action) => self.templates.html.perform(action),
            TemplateAction::OpenSendTest(id) => {
                if let Some(template) = self.templates.records.find(id, |t| t.id).cloned() {
                    self.templates.reset_test(template.account_id);
                    self.templates
                        .records
                        .open_for(TemplateDialog::SendTest, template, TemplateForm::default());
                }
            }
            TemplateAction::TestAccountSelected(account_id) => {
                self.templates.test_account = Some(account_id);
            }
            TemplateAction::TestRecipientChanged(recipient) => {
                self.templates.test_recipient = recipient;
            }
            TemplateAction::TestParamsAction(action) => self.templates.test_params.perform(action),
            TemplateAction::SendTest => return self.send_template_test(),
            TemplateAction::TestSent(outcome) => {
                self.templates.records.saving = false;
                match outcome {
                    Ok(()) => {
                        self.templates.records.close();
                        self.toasts.info("Test email queued");
                    }
                    Err(failure) => return self.report("Test send failed", &failure),
                }
            }
        }
        Task::none()
    }

    fn send_template_test(&mut self) -> Task<Message> {
        let state = &mut self.templates;
        if state.records.saving {
            return Task::none();
        }
        let Some(template_id) = state.records.dialog.current_row().map(|t| t.id) else {
            return Task::none();
        };
        let Some(account_id) = state.test_account else {
            self.toasts.error("Choose the account to send from");
            return Task::none();
        };
        let request = match TemplateForm::send_test_request(
            account_id,
            &state.test_recipient,
            &state.test_params.text(),
        ) {
            Ok(request) => request,
            Err(errors) => {
                state.test_errors = errors;
                return Task::none();
            }
        };
        state.test_errors.clear();
        state.records.saving = true;
        self.call(
            move |client| async move { client.send_test_template(template_id, &request).await },
            |outcome| Message::Templates(RecordMessage::Action(TemplateAction::TestSent(outcome))),
        )
    }
}
