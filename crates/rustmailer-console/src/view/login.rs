//! Sign-in screen.

use iced::widget::{Space, button, column, container, row, text, text_input};
use iced::{Element, Length};

use super::common::{BOLD, banner, switch};
use crate::message::{LoginMessage, Message};
use crate::model::LoginState;
use crate::style::{card_style, field_input_style, page_style, palette, primary_button_style};

/// Renders the sign-in card for `server_url`.
pub fn view_login<'a>(state: &'a LoginState, server_url: &'a str) -> Element<'a, Message> {
    let p = palette::current();

    let (label, placeholder, value) = if state.use_token {
        ("Access token", "Paste an access token", state.token.as_str())
    } else {
        ("Root password", "Password", state.password.as_str())
    };

    let secret = text_input(placeholder, value)
        .on_input(move |value| {
            Message::Login(if state.use_token {
                LoginMessage::TokenChanged(value)
            } else {
                LoginMessage::PasswordChanged(value)
            })
        })
        .on_submit(Message::Login(LoginMessage::Submit))
        .secure(true)
        .padding(10)
        .style(field_input_style);

    let submit = button(
        container(text(if state.submitting { "Signing in..." } else { "Sign in" }).size(14))
            .center_x(Length::Fill),
    )
    .padding([10, 16])
    .width(Length::Fill)
    .style(primary_button_style)
    .on_press_maybe((!state.submitting).then_some(Message::Login(LoginMessage::Submit)));

    let mut content = column![
        text("RustMailer Console").size(26).font(BOLD).color(p.primary),
        text(server_url).size(13).color(p.text_muted),
        Space::new().height(8),
        switch("Sign in with an access token", state.use_token, |on| {
            Message::Login(LoginMessage::UseToken(on))
        }),
        column![text(label).size(12).color(p.text_secondary), secret].spacing(4),
    ]
    .spacing(12);

    if let Some(error) = &state.error {
        content = content.push(banner(error, p.danger));
    }
    content = content.push(row![submit]);

    container(
        container(content)
            .padding(32)
            .max_width(420)
            .style(card_style),
    )
    .center(Length::Fill)
    .style(page_style)
    .into()
}
