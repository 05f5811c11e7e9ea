//! Event hooks page, with the VRL script tester.

use iced::widget::{Column, column, container, pick_list, row, scrollable, text, text_editor};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{
    AccountEntity, EventHook, EventType, HookType, HttpMethod, NatsAuthType,
};
use rustmailer_console_core::dialog::HookDialog;
use rustmailer_console_core::forms::{HookChannelForm, NatsAuthForm};

use super::common::{
    Choice, account_choices, action_button, badge, banner, cell, confirm_delete, danger_action,
    dialog, empty_state, error_banner, field, form_dialog, input, page_header, primary_button,
    secondary_button, secret_input, section, selected, switch, table_header, with_dialog,
};
use crate::message::{HookAction, Message, RecordMessage};
use crate::model::HooksState;
use crate::style::{card_style, palette, row_button_style};

fn act(action: HookAction) -> Message {
    Message::Hooks(RecordMessage::Action(action))
}

fn record(msg: RecordMessage<EventHook, HookAction>) -> Message {
    Message::Hooks(msg)
}

/// Renders the hooks page and its open dialog.
pub fn view_hooks<'a>(state: &'a HooksState, accounts: &'a [AccountEntity]) -> Element<'a, Message> {
    let records = &state.records;
    let header = page_header(
        "Event hooks",
        [
            action_button("Refresh", Some(record(RecordMessage::Refresh))),
            primary_button("Add hook", record(RecordMessage::OpenAdd), false),
        ],
    );

    let mut content = column![header].spacing(16);
    if let Some(error) = error_banner(records.load_error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[
        ("Description", 3),
        ("Scope", 3),
        ("Channel", 4),
        ("Status", 2),
        ("Deliveries", 2),
        ("", 3),
    ]));

    if records.items.is_empty() {
        content = content.push(empty_state(if records.loading {
            "Loading hooks..."
        } else {
            "No hooks yet"
        }));
    } else {
        let rows = records.items.iter().map(view_row);
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let dialog = records.dialog.current().map(|kind| match kind {
        HookDialog::Add | HookDialog::Edit => view_form(state, accounts),
        HookDialog::Delete => confirm_delete(
            "hook",
            records
                .dialog
                .current_row()
                .map_or_else(String::new, hook_name),
            records.saving,
            record(RecordMessage::ConfirmDelete),
            record(RecordMessage::CloseDialog),
        ),
        HookDialog::VrlTest => view_vrl_test(state),
    });

    with_dialog(content.into(), dialog)
}

fn hook_name(hook: &EventHook) -> String {
    hook.description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("#{}", hook.id))
}

fn channel_summary(hook: &EventHook) -> String {
    match (hook.hook_type, &hook.http, &hook.nats) {
        (HookType::Http, Some(http), _) => format!("{} {}", http.http_method, http.target_url),
        (HookType::Nats, _, Some(nats)) => {
            format!("nats://{}:{} {}", nats.host, nats.port, nats.stream_name)
        }
        (HookType::Http, ..) => "HTTP".to_string(),
        (HookType::Nats, ..) => "NATS".to_string(),
    }
}

fn view_row(hook: &EventHook) -> Element<'_, Message> {
    let p = palette::current();
    let scope = if hook.global {
        "All accounts".to_string()
    } else {
        hook.email
            .clone()
            .unwrap_or_else(|| format!("account #{}", hook.account_id.unwrap_or_default()))
    };
    let status = if !hook.enabled {
        badge("Disabled", p.text_muted)
    } else if hook.last_error.is_some() {
        badge("Failing", p.danger)
    } else {
        badge("Enabled", p.success)
    };

    iced::widget::button(
        row![
            cell(hook_name(hook), 3),
            cell(scope, 3),
            cell(channel_summary(hook), 4),
            container(status).width(Length::FillPortion(2)),
            cell(
                format!("{} ok / {} failed", hook.success_count, hook.failure_count),
                2,
            ),
            container(
                row![
                    action_button("Edit", Some(record(RecordMessage::OpenEdit(hook.id)))),
                    danger_action("Delete", record(RecordMessage::OpenDelete(hook.id))),
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

#[allow(clippy::too_many_lines)]
fn view_form<'a>(state: &'a HooksState, accounts: &'a [AccountEntity]) -> Element<'a, Message> {
    let p = palette::current();
    let records = &state.records;
    let form = &records.form;

    let scopes = account_choices(accounts, Some("All accounts"));
    let scope = selected(&scopes, &form.account_id);
    let types = vec![
        Choice::new(HookType::Http, "HTTP webhook"),
        Choice::new(HookType::Nats, "NATS"),
    ];
    let hook_type = selected(&types, &form.channel.hook_type());

    let general = column![
        field(
            "Description",
            input("Optional", &form.description, |v| {
                act(HookAction::DescriptionChanged(v))
            }),
            None,
        ),
        row![
            container(field(
                "Account",
                pick_list(scopes, scope, |c: Choice<Option<u64>>| {
                    act(HookAction::AccountSelected(c.value))
                })
                .padding(10)
                .width(Length::Fill),
                None,
            ))
            .width(Length::FillPortion(1)),
            container(field(
                "Channel",
                pick_list(types, hook_type, |c: Choice<HookType>| {
                    act(HookAction::HookTypeSelected(c.value))
                })
                .padding(10)
                .width(Length::Fill),
                None,
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
        switch("Enabled", form.enabled, |on| act(HookAction::EnabledToggled(on))),
    ]
    .spacing(12);

    let events_hint = if form.is_global() {
        "Global hooks may leave this empty to receive every event."
    } else {
        "Select at least one event."
    };
    let mut events = column![text(events_hint).size(12).color(p.text_muted)].spacing(6);
    for pair in EventType::ALL.chunks(2) {
        let mut line = row![].spacing(12);
        for event in pair {
            let event = *event;
            line = line.push(
                container(switch(
                    event_label(event),
                    form.watched_events.contains(&event),
                    move |_| act(HookAction::EventToggled(event)),
                ))
                .width(Length::FillPortion(1)),
            );
        }
        events = events.push(line);
    }
    if let Some(error) = records.field_error("watched_events") {
        events = events.push(text(error).size(12).color(p.danger));
    }

    let script = column![
        text("Optional VRL program that reshapes the event payload before delivery.")
            .size(12)
            .color(p.text_muted),
        text_editor(&state.script)
            .placeholder(". = { \"subject\": .payload.subject }")
            .on_action(|action| act(HookAction::ScriptAction(action)))
            .padding(10)
            .height(Length::Fixed(140.0)),
        row![action_button("Test script", Some(act(HookAction::OpenVrlTest)))],
    ]
    .spacing(8);

    let body = column![
        section("General", general),
        section("Delivery", view_channel(state)),
        section("Events", events),
        section("Payload script", script),
    ]
    .spacing(12);

    form_dialog(
        if form.hook_id.is_some() {
            "Edit hook"
        } else {
            "Add hook"
        },
        body,
        records.saving,
        record(RecordMessage::Save),
        record(RecordMessage::CloseDialog),
    )
}

const fn event_label(event: EventType) -> &'static str {
    match event {
        EventType::EmailAddedToFolder => "New message",
        EventType::EmailFlagsChanged => "Flags changed",
        EventType::EmailSentSuccess => "Sent",
        EventType::EmailSendingError => "Sending failed",
        EventType::UIDValidityChange => "UIDVALIDITY changed",
        EventType::MailboxDeletion => "Mailbox deleted",
        EventType::MailboxCreation => "Mailbox created",
        EventType::AccountFirstSyncCompleted => "First sync completed",
        EventType::EmailBounce => "Bounce",
        EventType::EmailFeedBackReport => "Feedback report",
        EventType::EmailOpened => "Opened",
        EventType::EmailLinkClicked => "Link clicked",
    }
}

fn view_channel(state: &HooksState) -> Element<'_, Message> {
    let records = &state.records;
    match &records.form.channel {
        HookChannelForm::Http {
            target_url, method, ..
        } => column![
            row![
                container(field(
                    "Target URL",
                    input("https://hooks.example.com/mail", target_url, |v| {
                        act(HookAction::TargetUrlChanged(v))
                    }),
                    records.field_error("target_url"),
                ))
                .width(Length::FillPortion(4)),
                container(field(
                    "Method",
                    pick_list(&[HttpMethod::Post, HttpMethod::Put][..], Some(*method), |m| {
                        act(HookAction::MethodSelected(m))
                    })
                    .padding(10)
                    .width(Length::Fill),
                    None,
                ))
                .width(Length::FillPortion(1)),
            ]
            .spacing(12),
            field(
                "Headers (one Name: value per line)",
                text_editor(&state.headers)
                    .placeholder("Authorization: Bearer ...")
                    .on_action(|action| act(HookAction::HeadersAction(action)))
                    .padding(10)
                    .height(Length::Fixed(80.0)),
                records.field_error("headers"),
            ),
        ]
        .spacing(12)
        .into(),
        HookChannelForm::Nats {
            host,
            port,
            auth,
            stream_name,
            namespace,
        } => {
            let auth_types = vec![
                Choice::new(NatsAuthType::None, "None"),
                Choice::new(NatsAuthType::Token, "Token"),
                Choice::new(NatsAuthType::Password, "Username and password"),
            ];
            let current_auth = selected(&auth_types, &auth.auth_type());

            let mut col = column![
                row![
                    container(field(
                        "Host",
                        input("nats.internal", host, |v| act(HookAction::NatsHostChanged(v))),
                        records.field_error("nats_host"),
                    ))
                    .width(Length::FillPortion(3)),
                    container(field(
                        "Port",
                        input("4222", port, |v| act(HookAction::NatsPortChanged(v))),
                        records.field_error("nats_port"),
                    ))
                    .width(Length::FillPortion(1)),
                ]
                .spacing(12),
                row![
                    container(field(
                        "Stream",
                        input("MAIL_EVENTS", stream_name, |v| {
                            act(HookAction::StreamChanged(v))
                        }),
                        records.field_error("stream_name"),
                    ))
                    .width(Length::FillPortion(1)),
                    container(field(
                        "Namespace",
                        input("mail.events", namespace, |v| {
                            act(HookAction::NamespaceChanged(v))
                        }),
                        records.field_error("namespace"),
                    ))
                    .width(Length::FillPortion(1)),
                ]
                .spacing(12),
                field(
                    "Authentication",
                    pick_list(auth_types, current_auth, |c: Choice<NatsAuthType>| {
                        act(HookAction::NatsAuthSelected(c.value))
                    })
                    .padding(10),
                    None,
                ),
            ]
            .spacing(12);

            match auth {
                NatsAuthForm::None => {}
                NatsAuthForm::Token(token) => {
                    col = col.push(field(
                        "Token",
                        secret_input("Token", token, |v| act(HookAction::NatsTokenChanged(v))),
                        records.field_error("token"),
                    ));
                }
                NatsAuthForm::Password { username, password } => {
                    col = col.push(
                        row![
                            container(field(
                                "Username",
                                input("", username, |v| {
                                    act(HookAction::NatsUsernameChanged(v))
                                }),
                                records.field_error("username"),
                            ))
                            .width(Length::FillPortion(1)),
                            container(field(
                                "Password",
                                secret_input("", password, |v| {
                                    act(HookAction::NatsPasswordChanged(v))
                                }),
                                records.field_error("password"),
                            ))
                            .width(Length::FillPortion(1)),
                        ]
                        .spacing(12),
                    );
                }
            }
            col.into()
        }
    }
}

fn view_vrl_test(state: &HooksState) -> Element<'_, Message> {
    let p = palette::current();

    let mut body = column![
        text("Runs the hook's script on the server against the sample event below.")
            .size(12)
            .color(p.text_muted),
        text_editor(&state.sample_event)
            .on_action(|action| act(HookAction::SampleEventAction(action)))
            .padding(10)
            .height(Length::Fixed(200.0)),
    ]
    .spacing(10);

    if let Some(error) = &state.vrl_error {
        body = body.push(banner(error, p.danger));
    }
    if let Some(result) = &state.vrl_result {
        if let Some(error) = &result.error {
            body = body.push(banner(format!("Script error: {error}"), p.danger));
        }
        if let Some(value) = &result.result {
            let pretty =
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            body = body.push(
                container(scrollable(text(pretty).size(12).color(p.text_primary)))
                    .padding(10)
                    .width(Length::Fill)
                    .max_height(220)
                    .style(card_style),
            );
        }
    }

    dialog(
        "Test VRL script",
        body,
        [
            secondary_button("Back", act(HookAction::CloseVrlTest)),
            primary_button(
                if state.vrl_running { "Running..." } else { "Run" },
                act(HookAction::RunVrlTest),
                state.vrl_running,
            ),
        ],
        640.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustmailer_console_api::types::HttpConfig;

    #[test]
    fn test_channel_summary() {
        let hook = EventHook {
            id: 3,
            hook_type: HookType::Http,
            http: Some(HttpConfig {
                target_url: "https://hooks.example.com".into(),
                http_method: HttpMethod::Put,
                custom_headers: std::collections::BTreeMap::new(),
            }),
            ..EventHook::default()
        };
        assert_eq!(channel_summary(&hook), "PUT https://hooks.example.com");
        assert_eq!(hook_name(&hook), "#3");
    }

    #[test]
    fn test_every_event_has_a_label() {
        for event in EventType::ALL {
            assert!(!event_label(event).is_empty());
        }
    }
}
