//! OAuth2 client configurations page.

use iced::widget::{Column, button, column, container, pick_list, row, scrollable, text};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{OAuth2Entity, Proxy};
use rustmailer_console_core::dialog::OAuth2Dialog;

use super::common::{
    Choice, action_button, badge, cell, confirm_delete, danger_action, empty_state, error_banner,
    field, form_dialog, input, page_header, primary_button, proxy_choices, secret_input,
    selected, switch, table_header, with_dialog,
};
use crate::message::{Message, OAuth2Action, OAuth2Field, RecordMessage};
use crate::model::OAuth2State;
use crate::style::{palette, row_button_style};

fn act(action: OAuth2Action) -> Message {
    Message::OAuth2(RecordMessage::Action(action))
}

fn record(msg: RecordMessage<OAuth2Entity, OAuth2Action>) -> Message {
    Message::OAuth2(msg)
}

fn changed(field: OAuth2Field) -> impl Fn(String) -> Message {
    move |value| act(OAuth2Action::FieldChanged(field, value))
}

/// Renders the OAuth2 configuration list and its open dialog.
pub fn view_oauth2<'a>(state: &'a OAuth2State, proxies: &'a [Proxy]) -> Element<'a, Message> {
    let header = page_header(
        "OAuth2",
        [
            action_button("Refresh", Some(record(RecordMessage::Refresh))),
            primary_button("Add configuration", record(RecordMessage::OpenAdd), false),
        ],
    );

    let mut content = column![header].spacing(16);
    if let Some(error) = error_banner(state.load_error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[
        ("Name", 2),
        ("Client ID", 3),
        ("Scopes", 4),
        ("Status", 1),
        ("", 2),
    ]));

    if state.items.is_empty() {
        content = content.push(empty_state(if state.loading {
            "Loading OAuth2 configurations..."
        } else {
            "No OAuth2 configurations yet"
        }));
    } else {
        let rows = state.items.iter().map(view_row);
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let dialog = state.dialog.current().map(|kind| match kind {
        OAuth2Dialog::Add | OAuth2Dialog::Edit => view_form(state, proxies),
        OAuth2Dialog::Delete => confirm_delete(
            "OAuth2 configuration",
            state
                .dialog
                .current_row()
                .map_or_else(String::new, |e| e.description.clone()),
            state.saving,
            record(RecordMessage::ConfirmDelete),
            record(RecordMessage::CloseDialog),
        ),
    });

    with_dialog(content.into(), dialog)
}

fn view_row(entity: &OAuth2Entity) -> Element<'_, Message> {
    let p = palette::current();
    let status = if entity.enabled {
        badge("Enabled", p.success)
    } else {
        badge("Disabled", p.text_muted)
    };

    button(
        row![
            cell(entity.description.as_str(), 2),
            cell(entity.client_id.as_str(), 3),
            cell(entity.scopes.join(" "), 4),
            container(status).width(Length::FillPortion(1)),
            container(
                row![
                    action_button("Edit", Some(record(RecordMessage::OpenEdit(entity.id)))),
                    danger_action("Delete", record(RecordMessage::OpenDelete(entity.id))),
                ]
                .spacing(6),
            )
            .width(Length::FillPortion(2)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(row_button_style)
    .into()
}

fn view_form<'a>(state: &'a OAuth2State, proxies: &'a [Proxy]) -> Element<'a, Message> {
    let p = palette::current();
    let form = &state.form;
    let proxy_list = proxy_choices(proxies);
    let proxy = selected(&proxy_list, &form.use_proxy);

    let secret_hint = if form.is_edit() {
        "Leave blank to keep the current secret"
    } else {
        "Client secret"
    };

    let body = column![
        field(
            "Name",
            input("google", &form.description, changed(OAuth2Field::Description)),
            state.field_error("description"),
        ),
        row![
            container(field(
                "Client ID",
                input("Client ID", &form.client_id, changed(OAuth2Field::ClientId)),
                state.field_error("client_id"),
            ))
            .width(Length::FillPortion(1)),
            container(field(
                "Client secret",
                secret_input(secret_hint, &form.client_secret, changed(OAuth2Field::ClientSecret)),
                state.field_error("client_secret"),
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
        field(
            "Authorization URL",
            input(
                "https://accounts.google.com/o/oauth2/v2/auth",
                &form.auth_url,
                changed(OAuth2Field::AuthUrl),
            ),
            state.field_error("auth_url"),
        ),
        field(
            "Token URL",
            input(
                "https://oauth2.googleapis.com/token",
                &form.token_url,
                changed(OAuth2Field::TokenUrl),
            ),
            state.field_error("token_url"),
        ),
        field(
            "Redirect URI",
            input(
                "http://localhost:15630/oauth2/callback",
                &form.redirect_uri,
                changed(OAuth2Field::RedirectUri),
            ),
            state.field_error("redirect_uri"),
        ),
        field(
            "Scopes (separated by spaces or commas)",
            input("https://mail.google.com/", &form.scopes, changed(OAuth2Field::Scopes)),
            state.field_error("scopes"),
        ),
        field(
            "Extra parameters",
            input(
                "access_type=offline; prompt=consent",
                &form.extra_params,
                changed(OAuth2Field::ExtraParams),
            ),
            None,
        ),
        text("key=value pairs separated by semicolons, added to the authorization request.")
            .size(12)
            .color(p.text_muted),
        field(
            "Proxy",
            pick_list(proxy_list, proxy, |c: Choice<Option<u64>>| {
                act(OAuth2Action::ProxySelected(c.value))
            })
            .padding(10)
            .width(Length::Fill),
            None,
        ),
        switch("Enabled", form.enabled, |on| act(OAuth2Action::EnabledToggled(on))),
    ]
    .spacing(12);

    form_dialog(
        if form.is_edit() {
            "Edit OAuth2 configuration"
        } else {
            "Add OAuth2 configuration"
        },
        body,
        state.saving,
        record(RecordMessage::Save),
        record(RecordMessage::CloseDialog),
    )
}
