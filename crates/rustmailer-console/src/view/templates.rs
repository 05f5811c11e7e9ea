//! Email templates page, with the test-send dialog.

use iced::widget::{Column, button, column, container, pick_list, row, scrollable, text, text_editor};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{AccountEntity, EmailTemplate};
use rustmailer_console_core::dialog::TemplateDialog;

use super::common::{
    Choice, account_choices, action_button, cell, confirm_delete, danger_action, dialog,
    empty_state, error_banner, field, form_dialog, format_time, input, page_header,
    primary_button, secondary_button, selected, table_header, with_dialog,
};
use crate::message::{Message, RecordMessage, TemplateAction};
use crate::model::TemplatesState;
use crate::style::{palette, row_button_style};

fn act(action: TemplateAction) -> Message {
    Message::Templates(RecordMessage::Action(action))
}

fn record(msg: RecordMessage<EmailTemplate, TemplateAction>) -> Message {
    Message::Templates(msg)
}

fn template_name(template: &EmailTemplate) -> String {
    template
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| template.subject.clone())
}

/// Renders the templates page and its open dialog.
pub fn view_templates<'a>(
    state: &'a TemplatesState,
    accounts: &'a [AccountEntity],
) -> Element<'a, Message> {
    let records = &state.records;
    let header = page_header(
        "Templates",
        [
            action_button("Refresh", Some(record(RecordMessage::Refresh))),
            primary_button("Add template", record(RecordMessage::OpenAdd), false),
        ],
    );

    let mut content = column![header].spacing(16);
    if let Some(error) = error_banner(records.load_error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[
        ("Description", 3),
        ("Subject", 4),
        ("Account", 3),
        ("Updated", 2),
        ("", 3),
    ]));

    if records.items.is_empty() {
        content = content.push(empty_state(if records.loading {
            "Loading templates..."
        } else {
            "No templates yet"
        }));
    } else {
        let rows = records.items.iter().map(view_row);
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let dialog = records.dialog.current().map(|kind| match kind {
        TemplateDialog::Add | TemplateDialog::Edit => view_form(state, accounts),
        TemplateDialog::Delete => confirm_delete(
            "template",
            records
                .dialog
                .current_row()
                .map_or_else(String::new, template_name),
            records.saving,
            record(RecordMessage::ConfirmDelete),
            record(RecordMessage::CloseDialog),
        ),
        TemplateDialog::SendTest => view_send_test(state, accounts),
    });

    with_dialog(content.into(), dialog)
}

fn view_row(template: &EmailTemplate) -> Element<'_, Message> {
    let account = template.account_email.clone().unwrap_or_else(|| {
        template
            .account_id
            .map_or_else(|| "Shared".to_string(), |id| format!("account #{id}"))
    });

    button(
        row![
            cell(template_name(template), 3),
            cell(template.subject.as_str(), 4),
            cell(account, 3),
            cell(format_time(template.updated_at), 2),
            container(
                row![
                    action_button(
                        "Test",
                        Some(act(TemplateAction::OpenSendTest(template.id)))
                    ),
                    action_button("Edit", Some(record(RecordMessage::OpenEdit(template.id)))),
                    danger_action("Delete", record(RecordMessage::OpenDelete(template.id))),
                ]
                .spacing(6),
            )
            .width(Length::FillPortion(3)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(row_button_style)
    .into()
}

fn view_form<'a>(state: &'a TemplatesState, accounts: &'a [AccountEntity]) -> Element<'a, Message> {
    let p = palette::current();
    let records = &state.records;
    let form = &records.form;

    let owners = account_choices(accounts, Some("Shared by all accounts"));
    let owner = selected(&owners, &form.account_id);

    let mut body = column![
        field(
            "Description",
            input("Welcome email", &form.description, |v| {
                act(TemplateAction::DescriptionChanged(v))
            }),
            records.field_error("description"),
        ),
        field(
            "Account",
            pick_list(owners, owner, |c: Choice<Option<u64>>| {
                act(TemplateAction::AccountSelected(c.value))
            })
            .padding(10)
            .width(Length::Fill),
            None,
        ),
        field(
            "Subject",
            input("Hello {{name}}", &form.subject, |v| {
                act(TemplateAction::SubjectChanged(v))
            }),
            records.field_error("subject"),
        ),
        field(
            "Preview text",
            input("Shown next to the subject in most inboxes", &form.preview, |v| {
                act(TemplateAction::PreviewChanged(v))
            }),
            None,
        ),
        field(
            "Plain-text body",
            text_editor(&state.text)
                .placeholder("Hi {{name}},")
                .on_action(|action| act(TemplateAction::TextAction(action)))
                .padding(10)
                .height(Length::Fixed(140.0)),
            None,
        ),
        field(
            "HTML body",
            text_editor(&state.html)
                .placeholder("<p>Hi {{name}},</p>")
                .on_action(|action| act(TemplateAction::HtmlAction(action)))
                .padding(10)
                .height(Length::Fixed(180.0)),
            None,
        ),
        text("Handlebars placeholders such as {{name}} are filled from the send parameters.")
            .size(12)
            .color(p.text_muted),
    ]
    .spacing(12);
    if let Some(error) = records.field_error("body") {
        body = body.push(text(error).size(12).color(p.danger));
    }

    let title = if form.template_id.is_some() {
        "Edit template"
    } else {
        "Add template"
    };
    form_dialog(
        title,
        body,
        records.saving,
        record(RecordMessage::Save),
        record(RecordMessage::CloseDialog),
    )
}

fn view_send_test<'a>(
    state: &'a TemplatesState,
    accounts: &'a [AccountEntity],
) -> Element<'a, Message> {
    let p = palette::current();
    let records = &state.records;
    let name = records
        .dialog
        .current_row()
        .map_or_else(String::new, template_name);

    let senders: Vec<Choice<u64>> = accounts
        .iter()
        .map(|a| Choice::new(a.id, a.label()))
        .collect();
    let sender = state
        .test_account
        .and_then(|id| selected(&senders, &id));

    let body = column![
        text(format!("Send \"{name}\" to a test recipient."))
            .size(13)
            .color(p.text_secondary),
        field(
            "Send from",
            pick_list(senders, sender, |c: Choice<u64>| {
                act(TemplateAction::TestAccountSelected(c.value))
            })
            .placeholder("Choose an account")
            .padding(10)
            .width(Length::Fill),
            None,
        ),
        field(
            "Recipient",
            input("ops@example.com", &state.test_recipient, |v| {
                act(TemplateAction::TestRecipientChanged(v))
            }),
            state.test_error("email"),
        ),
        field(
            "Parameters (JSON object)",
            text_editor(&state.test_params)
                .placeholder("{\"name\": \"Ada\"}")
                .on_action(|action| act(TemplateAction::TestParamsAction(action)))
                .padding(10)
                .height(Length::Fixed(120.0)),
            state.test_error("params"),
        ),
    ]
    .spacing(12);

    dialog(
        "Send test",
        body,
        [
            secondary_button("Cancel", record(RecordMessage::CloseDialog)),
            primary_button(
                if records.saving { "Sending..." } else { "Send" },
                act(TemplateAction::SendTest),
                records.saving,
            ),
        ],
        560.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_name_falls_back_to_subject() {
        let mut template = EmailTemplate {
            subject: "Hello {{name}}".into(),
            ..EmailTemplate::default()
        };
        assert_eq!(template_name(&template), "Hello {{name}}");

        template.description = Some("Welcome".into());
        assert_eq!(template_name(&template), "Welcome");
    }
}
