//! Mailbox browser: account picker, mailbox tree, envelope list and reader.

use iced::widget::{
    Column, Space, button, column, container, pick_list, row, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{AccountEntity, EmailEnvelope};
use rustmailer_console_core::ComposeMode;
use rustmailer_console_core::address::{display_label, format_address_line};
use rustmailer_console_core::dialog::MessageDialog;
use rustmailer_console_core::filter::{Comparison, FilterField, FilterOperator};
use rustmailer_console_core::mailbox_tree::TreeIcon;

use super::common::{
    BOLD, Choice, action_button, badge, banner, dialog, empty_state, error_banner, field,
    format_optional_time, format_size, primary_button, secondary_button, selected, switch,
    with_dialog,
};
use crate::message::{FilterMessage, FlagChange, MailboxMessage, Message};
use crate::model::{MailboxesState, VisibleNode, readable_body};
use crate::style::{
    card_style, danger_button_style, field_input_style, ghost_button_style, palette,
    row_button_selected_style, row_button_style, scrollable_style, sidebar_style,
    tree_button_selected_style, tree_button_style,
};

const TREE_WIDTH: f32 = 240.0;
const INDENT: f32 = 14.0;

fn mailbox(msg: MailboxMessage) -> Message {
    Message::Mailboxes(msg)
}

fn filter(msg: FilterMessage) -> Message {
    Message::Mailboxes(MailboxMessage::Filter(msg))
}

/// Renders the browser for the selected account.
pub fn view_mailboxes<'a>(
    state: &'a MailboxesState,
    accounts: &'a [AccountEntity],
) -> Element<'a, Message> {
    if accounts.is_empty() {
        return empty_state("Add an account to browse its mail");
    }

    let body = row![
        view_tree(state),
        container(view_envelopes(state))
            .width(Length::FillPortion(3))
            .height(Length::Fill),
    ]
    .spacing(16);

    let mut content = column![view_toolbar(state, accounts)].spacing(12);
    if let Some(message) = view_reader(state) {
        content = content.push(
            row![body.width(Length::FillPortion(3)), message]
                .spacing(16)
                .height(Length::Fill),
        );
    } else {
        content = content.push(body.height(Length::Fill));
    }

    let dialog = state.dialog.current().map(|kind| match kind {
        MessageDialog::Move => view_move_dialog(state),
        MessageDialog::Delete => view_delete_dialog(state),
        MessageDialog::Filter => view_filter_dialog(state),
    });
    with_dialog(content.into(), dialog)
}

fn view_toolbar<'a>(state: &'a MailboxesState, accounts: &'a [AccountEntity]) -> Element<'a, Message> {
    let p = palette::current();
    let choices: Vec<Choice<u64>> = accounts
        .iter()
        .map(|a| Choice::new(a.id, a.label()))
        .collect();
    let current = state.account_id.and_then(|id| selected(&choices, &id));

    let mut bar = row![
        pick_list(choices, current, |c: Choice<u64>| {
            mailbox(MailboxMessage::AccountSelected(c.value))
        })
        .placeholder("Choose an account")
        .padding(8)
        .width(Length::Fixed(320.0)),
        switch("Read from server", state.remote, |on| {
            mailbox(MailboxMessage::RemoteToggled(on))
        }),
        Space::new().width(Length::Fill),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    if state.applied_filter.is_some() {
        let conditions = state.filter.conditions.len();
        bar = bar
            .push(
                text(format!("Filtered by {conditions} condition(s)"))
                    .size(12)
                    .color(p.info),
            )
            .push(action_button("Clear filter", Some(filter(FilterMessage::Clear))));
    }
    bar = bar
        .push(action_button("Filter", Some(filter(FilterMessage::Open))))
        .push(action_button("Refresh", Some(mailbox(MailboxMessage::Refresh))));
    bar.into()
}

fn tree_icon(icon: TreeIcon) -> &'static str {
    match icon {
        TreeIcon::Inbox => "\u{1F4E5}",
        TreeIcon::Sent => "\u{1F4E4}",
        TreeIcon::Drafts => "\u{1F4DD}",
        TreeIcon::Trash => "\u{1F5D1}",
        TreeIcon::Junk => "\u{26A0}",
        TreeIcon::Archive => "\u{1F4E6}",
        TreeIcon::All => "\u{1F4DA}",
        TreeIcon::Flagged => "\u{2691}",
        TreeIcon::Folder => "\u{1F4C1}",
    }
}

fn view_tree(state: &MailboxesState) -> Element<'_, Message> {
    let p = palette::current();
    let nodes = state.visible_nodes();

    let list: Element<'_, Message> = if nodes.is_empty() {
        text(if state.loading_mailboxes {
            "Loading mailboxes..."
        } else {
            "No mailboxes"
        })
        .size(13)
        .color(p.text_muted)
        .into()
    } else {
        let rows = nodes
            .into_iter()
            .map(|node| view_tree_node(node, state.selected.as_deref()));
        scrollable(Column::with_children(rows).spacing(2))
            .style(scrollable_style)
            .height(Length::Fill)
            .into()
    };

    container(list)
        .padding(8)
        .width(Length::Fixed(TREE_WIDTH))
        .height(Length::Fill)
        .style(sidebar_style)
        .into()
}

fn view_tree_node<'a>(node: VisibleNode<'a>, selected: Option<&str>) -> Element<'a, Message> {
    let item = node.item;
    #[allow(clippy::cast_precision_loss)]
    let indent = Space::new().width(Length::Fixed(node.depth as f32 * INDENT));

    let toggle: Element<'a, Message> = if item.is_leaf() {
        Space::new().width(Length::Fixed(18.0)).into()
    } else {
        button(text(if node.expanded { "\u{25BE}" } else { "\u{25B8}" }).size(12))
            .padding([0, 4])
            .style(ghost_button_style)
            .on_press(mailbox(MailboxMessage::ToggleNode(item.id.clone())))
            .into()
    };

    let is_selected = item.mailbox_name.is_some() && item.mailbox_name.as_deref() == selected;
    let mut label = row![
        text(tree_icon(item.icon)).size(13),
        text(&item.name).size(13).width(Length::Fill),
    ]
    .spacing(6)
    .align_y(Alignment::Center);
    if let Some(count) = &item.badge {
        label = label.push(badge(count, palette::current().primary));
    }

    let open = item
        .mailbox_name
        .clone()
        .filter(|_| item.is_mailbox())
        .map(|name| mailbox(MailboxMessage::MailboxSelected(name)));

    row![
        indent,
        toggle,
        button(label)
            .padding([4, 8])
            .width(Length::Fill)
            .style(if is_selected {
                tree_button_selected_style
            } else {
                tree_button_style
            })
            .on_press_maybe(open),
    ]
    .align_y(Alignment::Center)
    .into()
}

#[allow(clippy::too_many_lines)]
fn view_envelopes(state: &MailboxesState) -> Element<'_, Message> {
    let p = palette::current();
    let pager = &state.pager;

    let Some(mailbox_name) = state.selected.as_deref() else {
        return empty_state("Choose a mailbox");
    };

    let targets = !state.target_uids().is_empty() && !state.busy;
    let when = |msg: MailboxMessage| targets.then(|| mailbox(msg));
    let all_checked = !pager.items().is_empty()
        && pager.items().iter().all(|e| state.checked.contains(&e.uid));

    let actions = row![
        button(text(if all_checked { "\u{2611}" } else { "\u{2610}" }).size(16))
            .padding([2, 6])
            .style(ghost_button_style)
            .on_press(mailbox(MailboxMessage::ToggleAllChecked)),
        text(mailbox_name).size(16).font(BOLD).color(p.text_primary),
        Space::new().width(Length::Fill),
        action_button("Read", when(MailboxMessage::Flag(FlagChange::MarkSeen))),
        action_button("Unread", when(MailboxMessage::Flag(FlagChange::MarkUnseen))),
        action_button("Flag", when(MailboxMessage::Flag(FlagChange::Flag))),
        action_button("Unflag", when(MailboxMessage::Flag(FlagChange::Unflag))),
        action_button("Move", when(MailboxMessage::OpenMove)),
        button(text("Delete").size(12))
            .padding([4, 10])
            .style(danger_button_style)
            .on_press_maybe(when(MailboxMessage::OpenDelete)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let page_number = pager.page_index() + 1;
    let status = if pager.is_loading() {
        "Loading...".to_string()
    } else if pager.total_items() > 0 {
        format!("Page {page_number} \u{00B7} {} messages", pager.total_items())
    } else {
        format!("Page {page_number}")
    };
    let paging = row![
        text(status).size(12).color(p.text_muted),
        Space::new().width(Length::Fill),
        action_button(
            "\u{2190} Newer",
            pager
                .has_previous_page()
                .then_some(mailbox(MailboxMessage::PreviousPage)),
        ),
        action_button(
            "Older \u{2192}",
            pager
                .has_next_page()
                .then_some(mailbox(MailboxMessage::NextPage)),
        ),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let mut content = column![actions].spacing(8);
    if let Some(error) = error_banner(pager.error()) {
        content = content.push(error);
    }

    let open_uid = state.open.as_ref().map(|m| m.uid);
    let list: Element<'_, Message> = if pager.items().is_empty() {
        empty_state(if pager.is_loading() {
            "Loading messages..."
        } else {
            "No messages"
        })
    } else {
        let rows = pager.items().iter().map(|envelope| {
            view_envelope_row(
                envelope,
                state.checked.contains(&envelope.uid),
                open_uid == Some(envelope.uid),
            )
        });
        scrollable(Column::with_children(rows).spacing(1))
            .style(scrollable_style)
            .height(Length::Fill)
            .into()
    };

    content.push(list).push(paging).height(Length::Fill).into()
}

fn view_envelope_row(envelope: &EmailEnvelope, checked: bool, open: bool) -> Element<'_, Message> {
    let p = palette::current();
    let unread = !envelope.is_seen();

    let from = envelope
        .from
        .as_ref()
        .map_or_else(|| "(unknown sender)".to_string(), display_label);
    let subject = envelope
        .subject
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "(no subject)".to_string());
    let marks = format!(
        "{}{}",
        if envelope.is_flagged() { "\u{2691} " } else { "" },
        if envelope.has_attachments() { "\u{1F4CE}" } else { "" }
    );
    let weight = if unread { BOLD } else { iced::Font::DEFAULT };

    let check = button(text(if checked { "\u{2611}" } else { "\u{2610}" }).size(16))
        .padding([2, 6])
        .style(ghost_button_style)
        .on_press(mailbox(MailboxMessage::ToggleChecked(envelope.uid)));

    let summary = button(
        row![
            text(from)
                .size(13)
                .font(weight)
                .color(p.text_primary)
                .width(Length::FillPortion(3)),
            text(subject)
                .size(13)
                .font(weight)
                .color(p.text_primary)
                .width(Length::FillPortion(6)),
            text(marks).size(12).color(p.warning).width(Length::Fixed(40.0)),
            text(format_optional_time(envelope.date.or(envelope.internal_date)))
                .size(12)
                .color(p.text_secondary)
                .width(Length::FillPortion(2)),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
    )
    .padding([8, 10])
    .width(Length::Fill)
    .style(if open {
        row_button_selected_style
    } else {
        row_button_style
    })
    .on_press(mailbox(MailboxMessage::Open(envelope.uid)));

    row![check, summary].align_y(Alignment::Center).into()
}

fn view_reader(state: &MailboxesState) -> Option<Element<'_, Message>> {
    let open = state.open.as_ref()?;
    let p = palette::current();
    let envelope = state.open_envelope();

    let subject = envelope
        .and_then(|e| e.subject.clone())
        .unwrap_or_else(|| "(no subject)".to_string());

    let mut header = column![
        row![
            text(subject).size(18).font(BOLD).color(p.text_primary).width(Length::Fill),
            button(text("\u{2715}").size(14))
                .padding([2, 8])
                .style(ghost_button_style)
                .on_press(mailbox(MailboxMessage::CloseMessage)),
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(4);

    if let Some(envelope) = envelope {
        let from = envelope
            .from
            .as_ref()
            .map_or_else(String::new, |a| format_address_line(std::slice::from_ref(a)));
        header = header
            .push(text(format!("From: {from}")).size(12).color(p.text_secondary))
            .push(
                text(format!(
                    "To: {}",
                    format_address_line(envelope.to.as_deref().unwrap_or_default())
                ))
                .size(12)
                .color(p.text_secondary),
            );
        if let Some(cc) = envelope.cc.as_deref().filter(|cc| !cc.is_empty()) {
            header = header.push(
                text(format!("Cc: {}", format_address_line(cc)))
                    .size(12)
                    .color(p.text_secondary),
            );
        }
        header = header.push(
            text(format_optional_time(envelope.date.or(envelope.internal_date)))
                .size(12)
                .color(p.text_muted),
        );
        for attachment in envelope.attachments.iter().flatten().filter(|a| !a.inline) {
            header = header.push(
                text(format!(
                    "\u{1F4CE} {} ({})",
                    attachment.filename.as_deref().unwrap_or("attachment"),
                    format_size(attachment.size)
                ))
                .size(12)
                .color(p.text_secondary),
            );
        }
    }

    let respond = row![
        secondary_button("Reply", mailbox(MailboxMessage::Respond(ComposeMode::Reply))),
        secondary_button(
            "Reply all",
            mailbox(MailboxMessage::Respond(ComposeMode::ReplyAll)),
        ),
        secondary_button("Forward", mailbox(MailboxMessage::Respond(ComposeMode::Forward))),
    ]
    .spacing(8);

    let body: Element<'_, Message> = match (&open.content, &open.error) {
        (_, Some(error)) => banner(error, p.danger),
        (Some(content), None) => {
            let mut col = column![
                text(readable_body(content).unwrap_or_default())
                    .size(14)
                    .color(p.text_primary),
            ]
            .spacing(8);
            if content.truncated {
                col = col.push(
                    text("The message was truncated by the server.")
                        .size(12)
                        .color(p.text_muted),
                );
            }
            scrollable(col).style(scrollable_style).height(Length::Fill).into()
        }
        (None, None) => text("Loading message...").size(13).color(p.text_muted).into(),
    };

    Some(
        container(column![header, respond, body].spacing(12))
            .padding(16)
            .width(Length::FillPortion(2))
            .height(Length::Fill)
            .style(card_style)
            .into(),
    )
}

fn view_move_dialog(state: &MailboxesState) -> Element<'_, Message> {
    let names: Vec<Choice<String>> = state
        .mailboxes
        .iter()
        .filter(|m| m.is_selectable() && Some(&m.name) != state.selected.as_ref())
        .map(|m| Choice::new(m.name.clone(), m.name.clone()))
        .collect();
    let current = selected(&names, &state.move_target);
    let count = state.target_uids().len();

    let body = column![
        text(format!("Move {count} message(s) to:")).size(14),
        pick_list(names, current, |c: Choice<String>| {
            mailbox(MailboxMessage::MoveTargetChanged(c.value))
        })
        .placeholder("Choose a mailbox")
        .padding(10)
        .width(Length::Fill),
        text_input("Or type a mailbox name", &state.move_target)
            .on_input(|v| mailbox(MailboxMessage::MoveTargetChanged(v)))
            .padding(10)
            .style(field_input_style),
    ]
    .spacing(12);

    dialog(
        "Move messages",
        body,
        [
            secondary_button("Cancel", mailbox(MailboxMessage::CloseDialog)),
            primary_button("Move", mailbox(MailboxMessage::ConfirmMove), state.busy),
        ],
        440.0,
    )
}

fn view_delete_dialog(state: &MailboxesState) -> Element<'_, Message> {
    let count = state.target_uids().len();
    let delete: Element<'_, Message> = button(text("Delete").size(14))
        .padding([8, 16])
        .style(danger_button_style)
        .on_press_maybe((!state.busy).then_some(mailbox(MailboxMessage::ConfirmDelete)))
        .into();
    dialog(
        "Delete messages",
        text(format!("Delete {count} message(s)? This cannot be undone.")).size(14),
        [
            secondary_button("Cancel", mailbox(MailboxMessage::CloseDialog)),
            delete,
        ],
        440.0,
    )
}

fn view_filter_dialog(state: &MailboxesState) -> Element<'_, Message> {
    let p = palette::current();
    let form = &state.filter;

    let mut body = column![].spacing(10);
    if form.conditions.len() > 1 {
        body = body.push(field(
            "Match",
            pick_list(
                &[FilterOperator::And, FilterOperator::Or][..],
                form.operator,
                |op| filter(FilterMessage::OperatorSelected(op)),
            )
            .padding(8),
            None,
        ));
    }

    for (index, condition) in form.conditions.iter().enumerate() {
        let placeholder = match condition.field {
            FilterField::Flag => "Seen, Flagged, ...",
            FilterField::Since | FilterField::Before => "YYYY-MM-DD",
            _ => "Text",
        };
        body = body.push(
            row![
                pick_list(&FilterField::ALL[..], Some(condition.field), move |f| {
                    filter(FilterMessage::FieldSelected(index, f))
                })
                .padding(8)
                .width(Length::Fixed(110.0)),
                pick_list(
                    &[Comparison::Is, Comparison::IsNot][..],
                    Some(condition.comparison),
                    move |c| filter(FilterMessage::ComparisonSelected(index, c)),
                )
                .padding(8)
                .width(Length::Fixed(100.0)),
                text_input(placeholder, &condition.value)
                    .on_input(move |v| filter(FilterMessage::ValueChanged(index, v)))
                    .padding(8)
                    .style(field_input_style),
                button(text("\u{2715}").size(12))
                    .padding([4, 8])
                    .style(ghost_button_style)
                    .on_press(filter(FilterMessage::RemoveCondition(index))),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    }

    body = body.push(action_button(
        "+ Condition",
        Some(filter(FilterMessage::AddCondition)),
    ));
    if let Some(error) = &state.filter_error {
        body = body.push(text(error).size(12).color(p.danger));
    }

    dialog(
        "Filter messages",
        body,
        [
            secondary_button("Clear", filter(FilterMessage::Clear)),
            secondary_button("Cancel", mailbox(MailboxMessage::CloseDialog)),
            primary_button("Apply", filter(FilterMessage::Apply), false),
        ],
        640.0,
    )
}
