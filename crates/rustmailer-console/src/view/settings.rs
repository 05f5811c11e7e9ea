//! Settings page: license, root credentials and console preferences.

use iced::widget::{column, container, row, text, text_input};
use iced::{Alignment, Element, Length};
use rustmailer_console_api::types::{License, LicenseType};
use rustmailer_console_core::{ConsoleConfig, Theme};

use super::common::{
    BOLD, badge, banner, danger_action, error_banner, field, format_time,
    input, page_header, primary_button, secondary_button, secret_input, section, switch,
};
use crate::message::{Message, SettingsMessage};
use crate::model::SettingsState;
use crate::style::{field_input_style, palette};

fn settings(msg: SettingsMessage) -> Message {
    Message::Settings(msg)
}

const fn license_type_name(kind: LicenseType) -> &'static str {
    match kind {
        LicenseType::Trial => "Trial",
        LicenseType::Subscription => "Subscription",
        LicenseType::Perpetual => "Perpetual",
    }
}

/// Renders the settings page.
pub fn view_settings<'a>(state: &'a SettingsState, config: &'a ConsoleConfig) -> Element<'a, Message> {
    let content = column![
        page_header("Settings", []),
        view_license(state),
        view_root_token(state),
        view_root_password(state),
        view_console(state, config),
    ]
    .spacing(16);

    iced::widget::scrollable(content).height(Length::Fill).into()
}

fn line<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    let p = palette::current();
    row![
        text(label).size(13).color(p.text_secondary).width(Length::Fixed(140.0)),
        text(value).size(13).color(p.text_primary),
    ]
    .align_y(Alignment::Center)
    .into()
}

fn view_license(state: &SettingsState) -> Element<'_, Message> {
    let p = palette::current();
    let mut body = column![].spacing(8);

    match &state.license {
        Some(license) => body = body.push(view_license_details(license)),
        None => {
            body = body.push(text("No license information").size(13).color(p.text_muted));
        }
    }
    if let Some(error) = error_banner(state.license_error.as_deref()) {
        body = body.push(error);
    }

    body = body.push(
        row![
            container(input("Paste a license key", &state.license_key, |v| {
                settings(SettingsMessage::LicenseKeyChanged(v))
            }))
            .width(Length::Fill),
            primary_button("Apply", settings(SettingsMessage::ApplyLicense), state.busy),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    );

    section("License", body)
}

fn view_license_details(license: &License) -> Element<'_, Message> {
    let p = palette::current();
    let now = chrono::Utc::now().timestamp_millis();
    let status = if license.is_expired(now) {
        badge("Expired", p.danger)
    } else {
        badge("Active", p.success)
    };

    column![
        row![
            text(license_type_name(license.license_type)).size(15).font(BOLD).color(p.text_primary),
            status,
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        line("License ID", license.id.clone()),
        line(
            "Customer",
            license.customer_name.clone().unwrap_or_else(|| "-".to_string()),
        ),
        line("Issued", format_time(license.created_at)),
        line(
            "Expires",
            license
                .expires_at
                .map_or_else(|| "Never".to_string(), format_time),
        ),
        line(
            "Accounts",
            license
                .max_accounts
                .map_or_else(|| "Unlimited".to_string(), |n| n.to_string()),
        ),
    ]
    .spacing(6)
    .into()
}

fn view_root_token(state: &SettingsState) -> Element<'_, Message> {
    let p = palette::current();
    let mut body = column![
        text("Resetting the root token signs out every client that uses the current one.")
            .size(13)
            .color(p.text_secondary),
    ]
    .spacing(10);

    if state.confirm_reset {
        body = body.push(
            row![
                text("Reset the root token now?").size(13).color(p.warning),
                secondary_button("Cancel", settings(SettingsMessage::CancelTokenReset)),
                danger_action("Reset", settings(SettingsMessage::ConfirmTokenReset)),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    } else {
        body = body.push(row![danger_action(
            "Reset root token",
            settings(SettingsMessage::RequestTokenReset),
        )]);
    }

    if let Some(token) = &state.new_root_token {
        body = body
            .push(
                text("New root token. It is shown only once:")
                    .size(12)
                    .color(p.text_secondary),
            )
            .push(text_input("", token).padding(10).style(field_input_style));
    }

    section("Root token", body)
}

fn view_root_password(state: &SettingsState) -> Element<'_, Message> {
    let p = palette::current();
    let mut body = column![
        row![
            container(field(
                "New password",
                secret_input("At least 8 characters", &state.password, |v| {
                    settings(SettingsMessage::PasswordChanged(v))
                }),
                None,
            ))
            .width(Length::FillPortion(1)),
            container(field(
                "Confirm",
                secret_input("Repeat the password", &state.password_confirm, |v| {
                    settings(SettingsMessage::PasswordConfirmChanged(v))
                }),
                None,
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
    ]
    .spacing(10);

    if let Some(error) = state.password_error {
        body = body.push(banner(error, p.danger));
    }
    body = body.push(row![primary_button(
        "Change password",
        settings(SettingsMessage::ApplyPassword),
        state.busy,
    )]);

    section("Root password", body)
}

fn view_console<'a>(state: &'a SettingsState, config: &'a ConsoleConfig) -> Element<'a, Message> {
    let mut body = column![
        switch("Dark theme", config.theme == Theme::Dark, |dark| {
            settings(SettingsMessage::ThemeSelected(if dark {
                Theme::Dark
            } else {
                Theme::Light
            }))
        }),
        row![
            container(field(
                "Server URL",
                input("http://localhost:15630", &state.server_url, |v| {
                    settings(SettingsMessage::ServerUrlChanged(v))
                }),
                None,
            ))
            .width(Length::FillPortion(3)),
            container(field(
                "Messages per page",
                input("20", &state.page_size, |v| {
                    settings(SettingsMessage::PageSizeChanged(v))
                }),
                None,
            ))
            .width(Length::FillPortion(1)),
        ]
        .spacing(12),
    ]
    .spacing(12);

    if let Some(error) = error_banner(state.config_error.as_deref()) {
        body = body.push(error);
    }
    body = body.push(row![primary_button(
        "Save",
        settings(SettingsMessage::SaveConfig),
        false,
    )]);

    section("Console", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_type_names() {
        assert_eq!(license_type_name(LicenseType::Trial), "Trial");
        assert_eq!(license_type_name(LicenseType::Perpetual), "Perpetual");
    }
}
