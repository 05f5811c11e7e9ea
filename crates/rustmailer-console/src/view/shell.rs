//! Window chrome: header navigation, the boot screen and toasts.

use iced::widget::{Column, Space, button, column, container, row, stack, text};
use iced::{Alignment, Element, Length};

use super::common::BOLD;
use crate::message::{ComposeMessage, Message, Page};
use crate::model::Toasts;
use crate::style::{
    ghost_button_style, header_style, nav_button_selected_style, nav_button_style, page_style,
    palette, primary_button_style, secondary_button_style, toast_style,
};

/// Shown while settings and the stored token are read.
pub fn view_booting<'a>() -> Element<'a, Message> {
    let p = palette::current();
    container(
        column![
            text("RustMailer Console").size(28).font(BOLD).color(p.primary),
            text("Connecting...").size(14).color(p.text_secondary),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .center(Length::Fill)
    .style(page_style)
    .into()
}

/// Header with navigation above the page body.
pub fn view_shell<'a>(
    current: Page,
    server_url: &'a str,
    body: Element<'a, Message>,
) -> Element<'a, Message> {
    column![
        view_header(current, server_url),
        container(body)
            .padding(24)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(page_style),
    ]
    .into()
}

fn view_header(current: Page, server_url: &str) -> Element<'_, Message> {
    let p = palette::current();

    let title = text("RustMailer").size(20).font(BOLD).color(p.primary);

    let mut nav = row![].spacing(4).align_y(Alignment::Center);
    for page in Page::NAVIGATION {
        let selected = page == current || (page == Page::Mailboxes && current == Page::Compose);
        nav = nav.push(
            button(text(page.title()).size(13))
                .padding([6, 10])
                .style(if selected {
                    nav_button_selected_style
                } else {
                    nav_button_style
                })
                .on_press(Message::NavigateTo(page)),
        );
    }

    let compose_btn = button(text("Compose").size(13))
        .padding([6, 14])
        .style(primary_button_style)
        .on_press(Message::Compose(ComposeMessage::New));

    let logout_btn = button(text("Sign out").size(13))
        .padding([6, 12])
        .style(secondary_button_style)
        .on_press(Message::Logout);

    container(
        row![
            title,
            Space::new().width(16),
            nav,
            Space::new().width(Length::Fill),
            text(server_url).size(12).color(p.text_muted),
            compose_btn,
            logout_btn,
        ]
        .spacing(10)
        .align_y(Alignment::Center),
    )
    .padding([10, 16])
    .width(Length::Fill)
    .style(header_style)
    .into()
}

/// Stacks the notifications over `content`, newest at the bottom.
pub fn with_toasts<'a>(content: Element<'a, Message>, toasts: &'a Toasts) -> Element<'a, Message> {
    if toasts.is_empty() {
        return content;
    }

    let p = palette::current();
    let items = toasts.iter().map(|toast| {
        let color = if toast.is_error { p.danger } else { p.success };
        container(
            row![
                text(&toast.text).size(13).color(color).width(Length::Fill),
                button(text("\u{2715}").size(12))
                    .padding([2, 6])
                    .style(ghost_button_style)
                    .on_press(Message::DismissToast(toast.id)),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        )
        .padding([10, 14])
        .width(Length::Fixed(360.0))
        .style(toast_style(toast.is_error))
        .into()
    });

    let column = Column::with_children(items).spacing(8);
    stack![
        content,
        container(column)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_right(Length::Fill)
            .align_bottom(Length::Fill),
    ]
    .into()
}
