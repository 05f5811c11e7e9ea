//! MTA (outbound SMTP relay) page.

use iced::widget::{Column, button, column, container, pick_list, row, scrollable, text};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{Encryption, Mta, Proxy};
use rustmailer_console_core::dialog::MtaDialog;

use super::common::{
    Choice, action_button, badge, banner, cell, confirm_delete, danger_action, dialog,
    empty_state, error_banner, field, form_dialog, format_optional_time, input, page_header,
    primary_button, proxy_choices, secondary_button, secret_input, selected, switch,
    table_header, with_dialog,
};
use crate::message::{Message, MtaAction, MtaTestField, RecordMessage};
use crate::model::MtasState;
use crate::style::{palette, row_button_style};

fn act(action: MtaAction) -> Message {
    Message::Mtas(RecordMessage::Action(action))
}

fn record(msg: RecordMessage<Mta, MtaAction>) -> Message {
    Message::Mtas(msg)
}

fn mta_name(mta: &Mta) -> String {
    mta.description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("{}:{}", mta.server.host, mta.server.port))
}

/// Renders the MTA page and its open dialog.
pub fn view_mtas<'a>(state: &'a MtasState, proxies: &'a [Proxy]) -> Element<'a, Message> {
    let records = &state.records;
    let header = page_header(
        "MTAs",
        [
            action_button("Refresh", Some(record(RecordMessage::Refresh))),
            primary_button("Add MTA", record(RecordMessage::OpenAdd), false),
        ],
    );

    let mut content = column![header].spacing(16);
    if let Some(error) = error_banner(records.load_error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[
        ("Description", 3),
        ("Server", 4),
        ("Username", 3),
        ("Last used", 2),
        ("", 3),
    ]));

    if records.items.is_empty() {
        content = content.push(empty_state(if records.loading {
            "Loading MTAs..."
        } else {
            "No MTAs yet"
        }));
    } else {
        let rows = records.items.iter().map(view_row);
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let dialog = records.dialog.current().map(|kind| match kind {
        MtaDialog::Add | MtaDialog::Edit => view_form(state, proxies),
        MtaDialog::Delete => confirm_delete(
            "MTA",
            records.dialog.current_row().map_or_else(String::new, mta_name),
            records.saving,
            record(RecordMessage::ConfirmDelete),
            record(RecordMessage::CloseDialog),
        ),
        MtaDialog::SendTest => view_send_test(state),
    });

    with_dialog(content.into(), dialog)
}

fn view_row(mta: &Mta) -> Element<'_, Message> {
    let p = palette::current();
    let mut server = row![cell(
        format!(
            "{}:{} ({})",
            mta.server.host,
            mta.server.port,
            mta.server.encryption.display_name()
        ),
        4
    )]
    .spacing(6)
    .align_y(Alignment::Center);
    if mta.dsn_capable {
        server = server.push(badge("DSN", p.primary));
    }

    button(
        row![
            cell(mta_name(mta), 3),
            container(server).width(Length::FillPortion(4)),
            cell(mta.credentials.username.as_str(), 3),
            cell(format_optional_time(mta.last_access_at), 2),
            container(
                row![
                    action_button("Test", Some(act(MtaAction::OpenSendTest(mta.id)))),
                    action_button("Edit", Some(record(RecordMessage::OpenEdit(mta.id)))),
                    danger_action("Delete", record(RecordMessage::OpenDelete(mta.id))),
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

fn view_form<'a>(state: &'a MtasState, proxies: &'a [Proxy]) -> Element<'a, Message> {
    let records = &state.records;
    let form = &records.form;

    let encryptions: Vec<Choice<Encryption>> = [Encryption::Ssl, Encryption::StartTls, Encryption::None]
        .into_iter()
        .map(|e| Choice::new(e, e.display_name()))
        .collect();
    let encryption = selected(&encryptions, &form.encryption);
    let proxy_list = proxy_choices(proxies);
    let proxy = selected(&proxy_list, &form.use_proxy);

    let password_hint = if form.is_edit() {
        "Leave blank to keep the current password"
    } else {
        "Password"
    };

    let body = column![
        field(
            "Description",
            input("Optional", &form.description, |v| {
                act(MtaAction::DescriptionChanged(v))
            }),
            None,
        ),
        row![
            container(field(
                "SMTP server",
                input("smtp.relay.example.com", &form.host, |v| {
                    act(MtaAction::HostChanged(v))
                }),
                records.field_error("smtp_host"),
            ))
            .width(Length::FillPortion(3)),
            container(field(
                "Port",
                input("465", &form.port, |v| act(MtaAction::PortChanged(v))),
                records.field_error("smtp_port"),
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
        field(
            "Encryption",
            pick_list(encryptions, encryption, |c: Choice<Encryption>| {
                act(MtaAction::EncryptionSelected(c.value))
            })
            .padding(10)
            .width(Length::Fill),
            None,
        ),
        field(
            "Username",
            input("Username", &form.username, |v| {
                act(MtaAction::UsernameChanged(v))
            }),
            records.field_error("username"),
        ),
        field(
            "Password",
            secret_input(password_hint, &form.password, |v| {
                act(MtaAction::PasswordChanged(v))
            }),
            records.field_error("password"),
        ),
        field(
            "Proxy",
            pick_list(proxy_list, proxy, |c: Choice<Option<u64>>| {
                act(MtaAction::ProxySelected(c.value))
            })
            .padding(10)
            .width(Length::Fill),
            None,
        ),
        switch("Supports delivery status notifications (DSN)", form.dsn_capable, |on| {
            act(MtaAction::DsnToggled(on))
        }),
    ]
    .spacing(12);

    form_dialog(
        if form.is_edit() { "Edit MTA" } else { "Add MTA" },
        body,
        records.saving,
        record(RecordMessage::Save),
        record(RecordMessage::CloseDialog),
    )
}

fn view_send_test(state: &MtasState) -> Element<'_, Message> {
    let p = palette::current();
    let records = &state.records;
    let test = &state.test;
    let name = records.dialog.current_row().map_or_else(String::new, mta_name);

    let mut body = column![
        text(format!("Send a message through {name}."))
            .size(13)
            .color(p.text_secondary),
        row![
            container(field(
                "From",
                input("sender@example.com", &test.from, |v| {
                    act(MtaAction::TestFieldChanged(MtaTestField::From, v))
                }),
                None,
            ))
            .width(Length::FillPortion(1)),
            container(field(
                "To",
                input("ops@example.com", &test.to, |v| {
                    act(MtaAction::TestFieldChanged(MtaTestField::To, v))
                }),
                None,
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
        field(
            "Subject",
            input("Relay check", &test.subject, |v| {
                act(MtaAction::TestFieldChanged(MtaTestField::Subject, v))
            }),
            None,
        ),
        field(
            "Message",
            input("Optional body", &test.message, |v| {
                act(MtaAction::TestFieldChanged(MtaTestField::Message, v))
            }),
            None,
        ),
    ]
    .spacing(12);
    if let Some(error) = state.test_error {
        body = body.push(banner(error, p.danger));
    }

    dialog(
        "Send test",
        body,
        [
            secondary_button("Cancel", record(RecordMessage::CloseDialog)),
            primary_button(
                if records.saving { "Sending..." } else { "Send" },
                act(MtaAction::SendTest),
                records.saving,
            ),
        ],
        560.0,
    )
}
