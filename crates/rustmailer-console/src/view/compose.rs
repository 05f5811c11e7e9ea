//! Compose view: new messages, replies and forwards.

use iced::widget::{Column, Space, button, column, row, scrollable, text, text_editor, text_input};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::AccountEntity;
use rustmailer_console_core::ComposeMode;

use super::common::{
    BOLD, banner, empty_state, field, format_size, input, page_header, primary_button,
    secondary_button, section,
};
use crate::message::{ComposeMessage, Message};
use crate::model::ComposeState;
use crate::style::{field_input_style, ghost_button_style, palette, secondary_button_style};

fn compose(msg: ComposeMessage) -> Message {
    Message::Compose(msg)
}

const fn title(mode: ComposeMode) -> &'static str {
    match mode {
        ComposeMode::New => "New message",
        ComposeMode::Reply => "Reply",
        ComposeMode::ReplyAll => "Reply all",
        ComposeMode::Forward => "Forward",
    }
}

/// Renders the compose form for the current draft.
#[allow(clippy::too_many_lines)]
pub fn view_compose<'a>(state: &'a ComposeState, accounts: &'a [AccountEntity]) -> Element<'a, Message> {
    let Some(draft) = &state.draft else {
        return empty_state("Nothing to compose");
    };
    let p = palette::current();

    let from = accounts
        .iter()
        .find(|a| a.id == draft.account_id)
        .map_or_else(|| format!("account #{}", draft.account_id), AccountEntity::label);

    let header = page_header(
        title(draft.mode),
        [
            secondary_button("Discard", compose(ComposeMessage::Cancel)),
            primary_button(
                if state.sending { "Sending..." } else { "Send" },
                compose(ComposeMessage::Send),
                state.sending,
            ),
        ],
    );

    let mut fields = column![
        row![
            text("From").size(12).color(p.text_secondary).width(Length::Fixed(60.0)),
            text(from).size(14).font(BOLD).color(p.text_primary),
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(10);

    if matches!(draft.mode, ComposeMode::Reply | ComposeMode::ReplyAll) {
        if let Some(source) = &draft.source {
            fields = fields.push(
                text(format!(
                    "Replying to message {} in {}; the original sender is added by the server.",
                    source.uid, source.mailbox_name
                ))
                .size(12)
                .color(p.text_muted),
            );
        }
    } else {
        fields = fields.push(field(
            "To",
            input("alice@example.com, Bob <bob@example.com>", &draft.to, |v| {
                compose(ComposeMessage::ToChanged(v))
            }),
            None,
        ));
    }

    fields = fields
        .push(
            row![
                field(
                    "Cc",
                    input("", &draft.cc, |v| compose(ComposeMessage::CcChanged(v))),
                    None
                ),
                field(
                    "Bcc",
                    input("", &draft.bcc, |v| compose(ComposeMessage::BccChanged(v))),
                    None
                ),
            ]
            .spacing(12),
        )
        .push(field(
            "Subject",
            input("Subject", &draft.subject, |v| {
                compose(ComposeMessage::SubjectChanged(v))
            }),
            None,
        ));

    let editor = text_editor(&state.body)
        .placeholder("Write your message...")
        .on_action(|action| compose(ComposeMessage::BodyAction(action)))
        .padding(12)
        .height(Length::Fixed(320.0));

    let attachments = draft.attachments.iter().enumerate().map(|(index, attachment)| {
        row![
            text(format!(
                "\u{1F4CE} {} ({}, {})",
                attachment.file_name,
                attachment.mime_type,
                format_size(attachment.size())
            ))
            .size(13)
            .color(p.text_primary),
            Space::new().width(Length::Fill),
            button(text("Remove").size(12))
                .padding([2, 8])
                .style(ghost_button_style)
                .on_press(compose(ComposeMessage::RemoveAttachment(index))),
        ]
        .align_y(Alignment::Center)
        .into()
    });

    let attach_row = row![
        text_input("Path to a file, or drop one onto the window", &state.attach_path)
            .on_input(|v| compose(ComposeMessage::AttachPathChanged(v)))
            .on_submit(compose(ComposeMessage::Attach))
            .padding(10)
            .style(field_input_style),
        button(text("Attach").size(13))
            .padding([8, 14])
            .style(secondary_button_style)
            .on_press(compose(ComposeMessage::Attach)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut content = column![
        header,
        section("Message", fields.push(editor)),
        section(
            "Attachments",
            Column::with_children(attachments).spacing(6).push(attach_row),
        ),
    ]
    .spacing(16);

    if let Some(error) = &state.error {
        content = content.push(banner(error, p.danger));
    }

    scrollable(content).height(Length::Fill).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(title(ComposeMode::New), "New message");
        assert_eq!(title(ComposeMode::ReplyAll), "Reply all");
    }
}
