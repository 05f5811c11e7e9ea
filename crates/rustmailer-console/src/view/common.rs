//! Building blocks shared by the page views.

use std::fmt;

use iced::widget::{
    Space, button, column, container, opaque, row, stack, text, text_input, toggler,
};
use iced::{Alignment, Color, Element, Font, Length, font};
use rustmailer_console_api::types::{AccountEntity, Proxy};

use crate::message::Message;
use crate::style::{
    badge_style, banner_style, card_style, danger_button_style, field_input_style,
    modal_backdrop_style, modal_style, palette, primary_button_style, secondary_button_style,
    table_header_style,
};

/// Bold variant of the default font.
pub const BOLD: Font = Font {
    weight: font::Weight::Bold,
    ..Font::DEFAULT
};

/// A pick-list entry: a value with the label shown for it.
#[derive(Debug, Clone)]
pub struct Choice<T> {
    /// Selected value.
    pub value: T,
    /// Text shown in the list.
    pub label: String,
}

impl<T> Choice<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

impl<T: PartialEq> PartialEq for Choice<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Entry of `choices` holding `value`.
pub fn selected<T: PartialEq + Clone>(choices: &[Choice<T>], value: &T) -> Option<Choice<T>> {
    choices.iter().find(|c| &c.value == value).cloned()
}

/// "No proxy" followed by every proxy.
pub fn proxy_choices(proxies: &[Proxy]) -> Vec<Choice<Option<u64>>> {
    std::iter::once(Choice::new(None, "No proxy"))
        .chain(proxies.iter().map(|p| Choice::new(Some(p.id), p.url.clone())))
        .collect()
}

/// Accounts, optionally preceded by a "no account" entry labelled `none`.
pub fn account_choices(accounts: &[AccountEntity], none: Option<&str>) -> Vec<Choice<Option<u64>>> {
    none.map(|label| Choice::new(None, label))
        .into_iter()
        .chain(accounts.iter().map(|a| Choice::new(Some(a.id), a.label())))
        .collect()
}

/// Page title with buttons on the right.
pub fn page_header<'a>(
    title: &'a str,
    actions: impl IntoIterator<Item = Element<'a, Message>>,
) -> Element<'a, Message> {
    let p = palette::current();
    let mut bar = row![
        text(title).size(24).font(BOLD).color(p.text_primary),
        Space::new().width(Length::Fill),
    ]
    .spacing(8)
    .align_y(Alignment::Center);
    for action in actions {
        bar = bar.push(action);
    }
    bar.into()
}

/// Card with a heading.
pub fn section<'a>(title: &'a str, body: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    let p = palette::current();
    container(
        column![
            text(title).size(16).font(BOLD).color(p.text_primary),
            body.into(),
        ]
        .spacing(12),
    )
    .padding(16)
    .width(Length::Fill)
    .style(card_style)
    .into()
}

/// Label above an input, with the validation message below it.
pub fn field<'a>(
    label: &'a str,
    input: impl Into<Element<'a, Message>>,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    let p = palette::current();
    let mut col = column![text(label).size(12).color(p.text_secondary), input.into()].spacing(4);
    if let Some(error) = error {
        col = col.push(text(error).size(12).color(p.danger));
    }
    col.into()
}

/// Single-line input.
pub fn input<'a>(
    placeholder: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    text_input(placeholder, value)
        .on_input(on_input)
        .padding(10)
        .style(field_input_style)
        .into()
}

/// Masked input.
pub fn secret_input<'a>(
    placeholder: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    text_input(placeholder, value)
        .on_input(on_input)
        .secure(true)
        .padding(10)
        .style(field_input_style)
        .into()
}

/// Labelled on/off switch.
pub fn switch<'a>(
    label: &'a str,
    value: bool,
    on_toggle: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message> {
    toggler(value)
        .label(label)
        .on_toggle(on_toggle)
        .text_size(14)
        .width(Length::Shrink)
        .into()
}

/// Full-width colored strip with a message.
pub fn banner<'a>(message: impl text::IntoFragment<'a>, color: Color) -> Element<'a, Message> {
    container(text(message).size(13).color(color))
        .padding([8, 12])
        .width(Length::Fill)
        .style(banner_style(color))
        .into()
}

/// Banner in the danger color, or nothing.
pub fn error_banner(message: Option<&str>) -> Option<Element<'_, Message>> {
    message.map(|m| banner(m, palette::current().danger))
}

/// Small colored pill.
pub fn badge<'a>(label: impl text::IntoFragment<'a>, color: Color) -> Element<'a, Message> {
    container(text(label).size(11).color(palette::current().text_on_primary))
        .padding([2, 8])
        .style(badge_style(color))
        .into()
}

/// Muted placeholder text centered in the available space.
pub fn empty_state(message: &str) -> Element<'_, Message> {
    let p = palette::current();
    container(text(message).size(14).color(p.text_muted))
        .padding(32)
        .center_x(Length::Fill)
        .into()
}

/// Column headings of a table; widths are fill portions.
pub fn table_header<'a>(columns: &[(&'a str, u16)]) -> Element<'a, Message> {
    let p = palette::current();
    let mut bar = row![].spacing(12);
    for (title, portion) in columns {
        bar = bar.push(
            text(*title)
                .size(12)
                .font(BOLD)
                .color(p.text_secondary)
                .width(Length::FillPortion(*portion)),
        );
    }
    container(bar.align_y(Alignment::Center))
        .padding([8, 12])
        .width(Length::Fill)
        .style(table_header_style)
        .into()
}

/// Table cell text.
pub fn cell<'a>(value: impl text::IntoFragment<'a>, portion: u16) -> Element<'a, Message> {
    let p = palette::current();
    text(value)
        .size(13)
        .color(p.text_primary)
        .width(Length::FillPortion(portion))
        .into()
}

/// Small button.
pub fn action_button(label: &str, on_press: Option<Message>) -> Element<'_, Message> {
    button(text(label).size(12))
        .padding([4, 10])
        .style(secondary_button_style)
        .on_press_maybe(on_press)
        .into()
}

/// Small destructive button.
pub fn danger_action(label: &str, on_press: Message) -> Element<'_, Message> {
    button(text(label).size(12))
        .padding([4, 10])
        .style(danger_button_style)
        .on_press(on_press)
        .into()
}

/// Main call to action; disabled while `busy`.
pub fn primary_button(label: &str, on_press: Message, busy: bool) -> Element<'_, Message> {
    button(text(label).size(14))
        .padding([8, 16])
        .style(primary_button_style)
        .on_press_maybe((!busy).then_some(on_press))
        .into()
}

/// Secondary call to action.
pub fn secondary_button(label: &str, on_press: Message) -> Element<'_, Message> {
    button(text(label).size(14))
        .padding([8, 16])
        .style(secondary_button_style)
        .on_press(on_press)
        .into()
}

/// Dialog card: title, body and buttons aligned right.
pub fn dialog<'a>(
    title: &'a str,
    body: impl Into<Element<'a, Message>>,
    actions: impl IntoIterator<Item = Element<'a, Message>>,
    width: f32,
) -> Element<'a, Message> {
    let p = palette::current();
    let mut buttons = row![Space::new().width(Length::Fill)].spacing(8);
    for action in actions {
        buttons = buttons.push(action);
    }
    container(
        column![
            text(title).size(18).font(BOLD).color(p.text_primary),
            body.into(),
            buttons.align_y(Alignment::Center),
        ]
        .spacing(16),
    )
    .padding(24)
    .max_width(width)
    .style(modal_style)
    .into()
}

/// Form dialog with Cancel and a Save button that shows progress.
pub fn form_dialog<'a>(
    title: &'a str,
    body: impl Into<Element<'a, Message>>,
    saving: bool,
    save: Message,
    cancel: Message,
) -> Element<'a, Message> {
    let label = if saving { "Saving..." } else { "Save" };
    dialog(
        title,
        iced::widget::scrollable(body).height(Length::Shrink),
        [
            secondary_button("Cancel", cancel),
            primary_button(label, save, saving),
        ],
        640.0,
    )
}

/// Confirmation for deleting `name`.
pub fn confirm_delete<'a>(
    noun: &'a str,
    name: String,
    saving: bool,
    confirm: Message,
    cancel: Message,
) -> Element<'a, Message> {
    let p = palette::current();
    let body = text(format!("Delete {noun} \"{name}\"? This cannot be undone."))
        .size(14)
        .color(p.text_secondary);
    let delete: Element<'a, Message> = button(text(if saving { "Deleting..." } else { "Delete" }).size(14))
        .padding([8, 16])
        .style(danger_button_style)
        .on_press_maybe((!saving).then_some(confirm))
        .into();
    dialog("Confirm delete", body, [secondary_button("Cancel", cancel), delete], 440.0)
}

/// Draws `dialog` over `base` on a dimmed backdrop.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    dialog: Element<'a, Message>,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            container(dialog)
                .center(Length::Fill)
                .padding(24)
                .style(modal_backdrop_style)
        ),
    ]
    .into()
}

/// `base`, with `dialog` on top when there is one.
pub fn with_dialog<'a>(
    base: Element<'a, Message>,
    dialog: Option<Element<'a, Message>>,
) -> Element<'a, Message> {
    match dialog {
        Some(dialog) => modal(base, dialog),
        None => base,
    }
}

/// Local date and time for a millisecond timestamp.
pub fn format_time(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms).map_or_else(
        || "-".to_string(),
        |at| at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Same as [`format_time`], "-" when absent.
pub fn format_optional_time(ms: Option<i64>) -> String {
    ms.map_or_else(|| "-".to_string(), format_time)
}

/// Byte count as B, KB or MB.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    match bytes {
        0..1024 => format!("{bytes} B"),
        1024..1_048_576 => format!("{:.1} KB", bytes as f64 / 1024.0),
        _ => format!("{:.1} MB", bytes as f64 / 1_048_576.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1_048_576), "3.0 MB");
    }

    #[test]
    fn test_choice_equality_ignores_label() {
        let choices = vec![Choice::new(None, "No proxy"), Choice::new(Some(4), "socks5://h:1")];
        let found = selected(&choices, &Some(4));
        assert_eq!(found.map(|c| c.label), Some("socks5://h:1".to_string()));
        assert!(selected(&choices, &Some(9)).is_none());
    }

    #[test]
    fn test_format_optional_time() {
        assert_eq!(format_optional_time(None), "-");
        assert_ne!(format_optional_time(Some(0)), "-");
    }
}
