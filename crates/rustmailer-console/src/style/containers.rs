//! Container styles.

use iced::widget::container;
use iced::{Background, Border, Color};

use super::palette;
use super::shadows;
use super::shadows::radius;

/// Top bar with navigation.
pub fn header_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        ..Default::default()
    }
}

/// Mailbox tree panel.
pub fn sidebar_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        ..Default::default()
    }
}

/// Page background.
pub fn page_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.background)),
        text_color: Some(p.text_primary),
        ..Default::default()
    }
}

/// Card holding a form section, a stat or a table.
pub fn card_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface_elevated)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        ..Default::default()
    }
}

/// Column titles above a table.
pub fn table_header_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface_sunken)),
        text_color: Some(p.text_secondary),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        ..Default::default()
    }
}

/// Dimmed layer behind a dialog.
pub fn modal_backdrop_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.backdrop)),
        ..Default::default()
    }
}

/// Dialog body.
pub fn modal_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface_elevated)),
        text_color: Some(p.text_primary),
        border: Border {
            color: p.border_medium,
            width: 1.0,
            radius: radius::LARGE.into(),
        },
        shadow: shadows::floating(p.shadow),
        ..Default::default()
    }
}

/// Notification in the bottom corner; red for failures.
pub fn toast_style(is_error: bool) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();
        let accent = if is_error { p.danger } else { p.success };

        container::Style {
            background: Some(Background::Color(p.surface_elevated)),
            text_color: Some(p.text_primary),
            border: Border {
                color: accent,
                width: 1.0,
                radius: radius::MEDIUM.into(),
            },
            shadow: shadows::floating(p.shadow),
            ..Default::default()
        }
    }
}

/// Full-width strip for page-level messages (e.g. a load failure).
pub fn banner_style(color: Color) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(Background::Color(Color { a: 0.12, ..color })),
        text_color: Some(color),
        border: Border {
            color,
            width: 1.0,
            radius: radius::SMALL.into(),
        },
        ..Default::default()
    }
}

/// Pill behind a count or a status label.
pub fn badge_style(color: Color) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();

        container::Style {
            background: Some(Background::Color(color)),
            text_color: Some(p.text_on_primary),
            border: Border {
                radius: radius::PILL.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
