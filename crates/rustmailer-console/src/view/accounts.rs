//! Accounts page: list, add/edit form, sync state and OAuth2 authorization.

use iced::widget::{Column, column, container, pick_list, row, scrollable, text};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{
    AccountEntity, AccountRunningState, AuthType, Encryption, MailerType, OAuth2Entity, Proxy,
};
use rustmailer_console_core::dialog::AccountDialog;
use rustmailer_console_core::forms::{MailerForm, ServerAuthForm, ServerForm};

use super::common::{
    Choice, action_button, badge, banner, cell, confirm_delete, danger_action, dialog,
    empty_state, error_banner, field, form_dialog, format_optional_time, format_time, input,
    page_header, primary_button, proxy_choices, secondary_button, secret_input, section,
    selected, switch, table_header, with_dialog,
};
use crate::message::{AccountAction, Message, RecordMessage, ServerField, ServerSide};
use crate::model::AccountsState;
use crate::style::{palette, row_button_style};

fn act(action: AccountAction) -> Message {
    Message::Accounts(RecordMessage::Action(action))
}

fn record(msg: RecordMessage<AccountEntity, AccountAction>) -> Message {
    Message::Accounts(msg)
}

/// Renders the accounts page and its open dialog.
pub fn view_accounts<'a>(
    state: &'a AccountsState,
    proxies: &'a [Proxy],
    oauth2: &'a [OAuth2Entity],
) -> Element<'a, Message> {
    let records = &state.records;
    let header = page_header(
        "Accounts",
        [
            action_button("Refresh", Some(record(RecordMessage::Refresh))),
            primary_button("Add account", record(RecordMessage::OpenAdd), false),
        ],
    );

    let mut content = column![header].spacing(16);
    if let Some(error) = error_banner(records.load_error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[
        ("Account", 4),
        ("Type", 2),
        ("Status", 2),
        ("Sync", 2),
        ("Updated", 2),
        ("", 5),
    ]));

    if records.items.is_empty() {
        content = content.push(empty_state(if records.loading {
            "Loading accounts..."
        } else {
            "No accounts yet"
        }));
    } else {
        let rows = records.items.iter().map(view_row);
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let dialog = records.dialog.current().map(|kind| match kind {
        AccountDialog::Add | AccountDialog::Edit => view_form(state, proxies, oauth2),
        AccountDialog::Delete => confirm_delete(
            "account",
            records
                .dialog
                .current_row()
                .map_or_else(String::new, |a| a.email.clone()),
            records.saving,
            record(RecordMessage::ConfirmDelete),
            record(RecordMessage::CloseDialog),
        ),
        AccountDialog::RunningState => view_running_state(state),
        AccountDialog::Authorize => view_authorize(state, oauth2),
    });

    with_dialog(content.into(), dialog)
}

fn uses_oauth2(account: &AccountEntity) -> bool {
    account.mailer_type == MailerType::GmailApi
        || [&account.imap, &account.smtp]
            .into_iter()
            .flatten()
            .any(|server| server.auth.auth_type == AuthType::OAuth2)
}

fn view_row(account: &AccountEntity) -> Element<'_, Message> {
    let p = palette::current();
    let status = if account.enabled {
        badge("Enabled", p.success)
    } else {
        badge("Disabled", p.text_muted)
    };
    let sync = account
        .sync_interval_min
        .map_or_else(|| "default".to_string(), |m| format!("every {m} min"));

    let mut actions = row![
        action_button("Browse", Some(act(AccountAction::Browse(account.id)))),
        action_button("State", Some(act(AccountAction::OpenRunningState(account.id)))),
    ]
    .spacing(6);
    if uses_oauth2(account) {
        actions = actions.push(action_button(
            "Authorize",
            Some(act(AccountAction::OpenAuthorize(account.id))),
        ));
    }
    actions = actions
        .push(action_button("Edit", Some(record(RecordMessage::OpenEdit(account.id)))))
        .push(danger_action("Delete", record(RecordMessage::OpenDelete(account.id))));

    iced::widget::button(
        row![
            cell(account.label(), 4),
            cell(account.mailer_type.display_name(), 2),
            container(status).width(Length::FillPortion(2)),
            cell(sync, 2),
            cell(format_time(account.updated_at), 2),
            container(actions).width(Length::FillPortion(5)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(row_button_style)
    .into()
}

fn encryption_choices() -> Vec<Choice<Encryption>> {
    [Encryption::Ssl, Encryption::StartTls, Encryption::None]
        .into_iter()
        .map(|e| Choice::new(e, e.display_name()))
        .collect()
}

fn auth_choices() -> Vec<Choice<AuthType>> {
    vec![
        Choice::new(AuthType::Password, "Password"),
        Choice::new(AuthType::OAuth2, "OAuth2"),
    ]
}

fn oauth2_choices(oauth2: &[OAuth2Entity]) -> Vec<Choice<String>> {
    oauth2
        .iter()
        .map(|o| Choice::new(o.description.clone(), o.description.clone()))
        .collect()
}

#[allow(clippy::too_many_lines)]
fn view_form<'a>(
    state: &'a AccountsState,
    proxies: &'a [Proxy],
    oauth2: &'a [OAuth2Entity],
) -> Element<'a, Message> {
    let records = &state.records;
    let form = &records.form;
    let editing = form.is_edit();

    let email: Element<'a, Message> = if editing {
        text(&form.email).size(14).into()
    } else {
        input("user@example.com", &form.email, |v| act(AccountAction::EmailChanged(v)))
    };

    let mailer_types = vec![
        Choice::new(MailerType::ImapSmtp, MailerType::ImapSmtp.display_name()),
        Choice::new(MailerType::GmailApi, MailerType::GmailApi.display_name()),
    ];
    let current_type = selected(&mailer_types, &form.mailer.mailer_type());
    let mailer_picker: Element<'a, Message> = if editing {
        text(form.mailer.mailer_type().display_name()).size(14).into()
    } else {
        pick_list(mailer_types, current_type, |c: Choice<MailerType>| {
            act(AccountAction::MailerTypeSelected(c.value))
        })
        .padding(10)
        .into()
    };

    let mut body = column![
        field("Email", email, records.field_error("email")),
        field(
            "Display name",
            input("Optional", &form.name, |v| act(AccountAction::NameChanged(v))),
            None,
        ),
        field("Mailer", mailer_picker, None),
    ]
    .spacing(12);

    let use_proxy = match &form.mailer {
        MailerForm::ImapSmtp { imap, smtp } => {
            body = body
                .push(view_server("Incoming (IMAP)", ServerSide::Imap, imap, state, editing))
                .push(view_server("Outgoing (SMTP)", ServerSide::Smtp, smtp, state, editing));
            imap.use_proxy
        }
        MailerForm::GmailApi { use_proxy } => *use_proxy,
    };

    let proxies = proxy_choices(proxies);
    let current_proxy = selected(&proxies, &use_proxy);
    body = body.push(field(
        "Proxy",
        pick_list(proxies, current_proxy, |c: Choice<Option<u64>>| {
            act(AccountAction::ProxySelected(c.value))
        })
        .padding(10),
        None,
    ));

    if form.uses_oauth2() && !editing {
        let choices = oauth2_choices(oauth2);
        let current = selected(&choices, &form.oauth2_name);
        let picker: Element<'a, Message> = if choices.is_empty() {
            text("Add an OAuth2 configuration first").size(13).into()
        } else {
            pick_list(choices, current, |c: Choice<String>| {
                act(AccountAction::OAuth2Selected(c.value))
            })
            .padding(10)
            .into()
        };
        body = body.push(field(
            "Authorize with",
            picker,
            records.field_error("oauth2"),
        ));
    }

    body = body
        .push(field(
            "Sync interval (minutes)",
            input("Server default", &form.sync_interval_min, |v| {
                act(AccountAction::SyncIntervalChanged(v))
            }),
            records.field_error("sync_interval"),
        ))
        .push(
            row![
                switch("Enabled", form.enabled, |on| act(AccountAction::EnabledToggled(on))),
                switch("Minimal sync", form.minimal_sync, |on| {
                    act(AccountAction::MinimalSyncToggled(on))
                }),
            ]
            .spacing(24),
        );

    form_dialog(
        if editing { "Edit account" } else { "Add account" },
        body,
        records.saving,
        record(RecordMessage::Save),
        record(RecordMessage::CloseDialog),
    )
}

fn view_server<'a>(
    title: &'a str,
    side: ServerSide,
    server: &'a ServerForm,
    state: &'a AccountsState,
    editing: bool,
) -> Element<'a, Message> {
    let records = &state.records;
    let (host_key, port_key, password_key) = match side {
        ServerSide::Imap => ("imap_host", "imap_port", "imap_password"),
        ServerSide::Smtp => ("smtp_host", "smtp_port", "smtp_password"),
    };

    let encryptions = encryption_choices();
    let current_encryption = selected(&encryptions, &server.encryption);
    let auths = auth_choices();
    let current_auth = selected(&auths, &server.auth.auth_type());

    let mut body = column![
        row![
            container(field(
                "Server",
                input("mail.example.com", &server.host, move |v| {
                    act(AccountAction::ServerText(side, ServerField::Host, v))
                }),
                records.field_error(host_key),
            ))
            .width(Length::FillPortion(3)),
            container(field(
                "Port",
                input("993", &server.port, move |v| {
                    act(AccountAction::ServerText(side, ServerField::Port, v))
                }),
                records.field_error(port_key),
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
        row![
            container(field(
                "Security",
                pick_list(encryptions, current_encryption, move |c: Choice<Encryption>| {
                    act(AccountAction::ServerEncryption(side, c.value))
                })
                .padding(10)
                .width(Length::Fill),
                None,
            ))
            .width(Length::FillPortion(1)),
            container(field(
                "Authentication",
                pick_list(auths, current_auth, move |c: Choice<AuthType>| {
                    act(AccountAction::ServerAuth(side, c.value))
                })
                .padding(10)
                .width(Length::Fill),
                None,
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
    ]
    .spacing(12);

    if let ServerAuthForm::Password(password) = &server.auth {
        let placeholder = if editing {
            "Leave blank to keep the current password"
        } else {
            "Password"
        };
        body = body.push(field(
            "Password",
            secret_input(placeholder, password, move |v| {
                act(AccountAction::ServerText(side, ServerField::Password, v))
            }),
            records.field_error(password_key),
        ));
    }

    section(title, body)
}

fn view_running_state(state: &AccountsState) -> Element<'_, Message> {
    let p = palette::current();
    let title = state
        .records
        .dialog
        .current_row()
        .map_or("Sync state", |a| a.email.as_str());

    let body: Element<'_, Message> = match (&state.running_state, &state.running_error) {
        (Some(running), error) => {
            let mut col = column![view_running_details(running)].spacing(12);
            if let Some(error) = error {
                col = col.push(banner(error, p.warning));
            }
            col.into()
        }
        (None, Some(error)) => banner(error, p.danger),
        (None, None) => text("Loading...").size(13).color(p.text_muted).into(),
    };

    dialog(
        title,
        body,
        [secondary_button("Close", record(RecordMessage::CloseDialog))],
        560.0,
    )
}

fn line(label: &'static str, value: String) -> Element<'static, Message> {
    let p = palette::current();
    row![
        text(label).size(13).color(p.text_secondary).width(Length::Fixed(200.0)),
        text(value).size(13).color(p.text_primary),
    ]
    .spacing(8)
    .into()
}

fn view_running_details(running: &AccountRunningState) -> Element<'_, Message> {
    let p = palette::current();
    let progress = match (
        &running.current_syncing_folder,
        running.current_batch_number,
        running.current_total_batches,
    ) {
        (Some(folder), Some(batch), Some(total)) => format!("{folder} (batch {batch} of {total})"),
        (Some(folder), _, _) => folder.clone(),
        _ => "idle".to_string(),
    };

    let mut col = column![
        line(
            "Initial sync",
            if running.is_initial_sync_completed {
                "completed".to_string()
            } else {
                format!("{} folders pending", running.initial_sync_folders.len())
            },
        ),
        line("Current folder", progress),
        line(
            "Last full sync",
            format!(
                "{} to {}",
                format_optional_time(running.last_full_sync_start),
                format_optional_time(running.last_full_sync_end)
            ),
        ),
        line(
            "Last incremental sync",
            format!(
                "{} to {}",
                format_optional_time(running.last_incremental_sync_start),
                format_optional_time(running.last_incremental_sync_end)
            ),
        ),
    ]
    .spacing(6);

    if !running.errors.is_empty() {
        col = col.push(text("Recent errors").size(13).color(p.danger));
        for error in running.errors.iter().rev().take(5) {
            col = col.push(
                text(format!("{}  {}", format_time(error.at), error.error))
                    .size(12)
                    .color(p.text_secondary),
            );
        }
    }
    col.into()
}

fn view_authorize<'a>(state: &'a AccountsState, oauth2: &'a [OAuth2Entity]) -> Element<'a, Message> {
    let p = palette::current();
    let choices = oauth2_choices(oauth2);
    let current = selected(&choices, &state.authorize_with);

    let mut body = column![
        text("The server builds an authorization link; finish sign-in in your browser.")
            .size(13)
            .color(p.text_secondary),
        field(
            "OAuth2 configuration",
            pick_list(choices, current, |c: Choice<String>| {
                act(AccountAction::OAuth2Selected(c.value))
            })
            .padding(10)
            .width(Length::Fill),
            None,
        ),
    ]
    .spacing(12);

    let mut actions = vec![secondary_button("Close", record(RecordMessage::CloseDialog))];
    if let Some(url) = &state.authorize_url {
        body = body.push(
            container(text(url).size(12).color(p.text_primary))
                .padding(8)
                .width(Length::Fill)
                .style(crate::style::card_style),
        );
        actions.push(primary_button(
            "Open in browser",
            act(AccountAction::OpenAuthorizeUrl),
            false,
        ));
    } else {
        actions.push(primary_button(
            if state.authorizing { "Requesting..." } else { "Get link" },
            act(AccountAction::Authorize),
            state.authorizing,
        ));
    }

    dialog("Authorize account", body, actions, 560.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustmailer_console_api::types::{AuthConfig, ServerConfig};

    fn account(mailer_type: MailerType, imap_auth: AuthType) -> AccountEntity {
        AccountEntity {
            id: 1,
            email: "user@example.com".into(),
            name: None,
            mailer_type,
            imap: Some(ServerConfig {
                host: "imap.example.com".into(),
                port: 993,
                encryption: Encryption::Ssl,
                auth: AuthConfig {
                    auth_type: imap_auth,
                    password: None,
                },
                use_proxy: None,
            }),
            smtp: None,
            enabled: true,
            minimal_sync: false,
            sync_interval_min: None,
            capabilities: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_authorize_offered_only_for_oauth2() {
        assert!(!uses_oauth2(&account(MailerType::ImapSmtp, AuthType::Password)));
        assert!(uses_oauth2(&account(MailerType::ImapSmtp, AuthType::OAuth2)));
        assert!(uses_oauth2(&account(MailerType::GmailApi, AuthType::Password)));
    }
}
