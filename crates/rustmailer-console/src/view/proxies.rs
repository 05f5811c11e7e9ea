//! Outbound proxy page.

use iced::widget::{Column, column, container, row, scrollable};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::Proxy;
use rustmailer_console_core::dialog::ProxyDialog;

use super::common::{
    action_button, cell, confirm_delete, danger_action, empty_state, error_banner, field,
    form_dialog, format_time, input, page_header, primary_button, table_header, with_dialog,
};
use crate::message::{Message, ProxyAction, RecordMessage};
use crate::model::ProxiesState;

fn record(msg: RecordMessage<Proxy, ProxyAction>) -> Message {
    Message::Proxies(msg)
}

/// Renders the proxy list and its open dialog.
pub fn view_proxies(state: &ProxiesState) -> Element<'_, Message> {
    let header = page_header(
        "Proxies",
        [
            action_button("Refresh", Some(record(RecordMessage::Refresh))),
            primary_button("Add proxy", record(RecordMessage::OpenAdd), false),
        ],
    );

    let mut content = column![header].spacing(16);
    if let Some(error) = error_banner(state.load_error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[("URL", 6), ("Updated", 2), ("", 2)]));

    if state.items.is_empty() {
        content = content.push(empty_state(if state.loading {
            "Loading proxies..."
        } else {
            "No proxies yet"
        }));
    } else {
        let rows = state.items.iter().map(|proxy| {
            container(
                row![
                    cell(proxy.url.as_str(), 6),
                    cell(format_time(proxy.updated_at), 2),
                    container(
                        row![
                            action_button("Edit", Some(record(RecordMessage::OpenEdit(proxy.id)))),
                            danger_action("Delete", record(RecordMessage::OpenDelete(proxy.id))),
                        ]
                        .spacing(6),
                    )
                    .width(Length::FillPortion(2)),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
            .padding([8, 12])
            .into()
        });
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let dialog = state.dialog.current().map(|kind| match kind {
        ProxyDialog::Add | ProxyDialog::Edit => form_dialog(
            if state.form.proxy_id.is_some() {
                "Edit proxy"
            } else {
                "Add proxy"
            },
            field(
                "Proxy URL",
                input("socks5://127.0.0.1:1080", &state.form.url, |v| {
                    record(RecordMessage::Action(ProxyAction::UrlChanged(v)))
                }),
                state.field_error("url"),
            ),
            state.saving,
            record(RecordMessage::Save),
            record(RecordMessage::CloseDialog),
        ),
        ProxyDialog::Delete => confirm_delete(
            "proxy",
            state
                .dialog
                .current_row()
                .map_or_else(String::new, |p| p.url.clone()),
            state.saving,
            record(RecordMessage::ConfirmDelete),
            record(RecordMessage::CloseDialog),
        ),
    });

    with_dialog(content.into(), dialog)
}
