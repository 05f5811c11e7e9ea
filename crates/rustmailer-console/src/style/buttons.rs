//! Button styles.

use iced::widget::button;
use iced::{Background, Border, Color};

use super::palette::{self, Palette};
use super::shadows;
use super::shadows::radius;

/// Main call to action: save, send, sign in.
pub fn primary_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(p.primary)),
        text_color: p.text_on_primary,
        border: Border {
            color: p.primary_light,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::glow(p.primary, 0.3),
        snap: false,
    };

    match status {
        button::Status::Active => base,
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(p.primary_light)),
            shadow: shadows::glow(p.primary, 0.5),
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(p.primary_dark)),
            shadow: shadows::none(),
            ..base
        },
        button::Status::Disabled => disabled(&p, base),
    }
}

/// Outlined button for secondary actions (cancel, refresh, test).
pub fn secondary_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(p.surface_elevated)),
        text_color: p.text_primary,
        border: Border {
            color: p.border_medium,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        button::Status::Active => base,
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(p.hover)),
            border: Border {
                color: p.primary,
                ..base.border
            },
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(p.selected)),
            ..base
        },
        button::Status::Disabled => disabled(&p, base),
    }
}

/// Destructive actions (delete, reset token).
pub fn danger_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(p.danger)),
        text_color: Color::WHITE,
        border: Border {
            color: p.danger,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        button::Status::Active => base,
        button::Status::Hovered => button::Style {
            shadow: shadows::glow(p.danger, 0.4),
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(Color {
                a: 0.8,
                ..p.danger
            })),
            ..base
        },
        button::Status::Disabled => disabled(&p, base),
    }
}

/// Borderless text button (row actions, close).
pub fn ghost_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color: p.text_secondary,
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: radius::SMALL.into(),
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        button::Status::Active => base,
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(p.hover)),
            text_color: p.primary,
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(p.selected)),
            text_color: p.primary,
            ..base
        },
        button::Status::Disabled => button::Style {
            text_color: p.text_muted,
            ..base
        },
    }
}

/// Header navigation tab.
pub fn nav_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color: p.text_secondary,
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        button::Status::Active | button::Status::Disabled => base,
        button::Status::Hovered | button::Status::Pressed => button::Style {
            background: Some(Background::Color(p.hover)),
            text_color: p.text_primary,
            ..base
        },
    }
}

/// Header navigation tab for the current page.
pub fn nav_button_selected_style(_theme: &iced::Theme, _status: button::Status) -> button::Style {
    let p = palette::current();

    button::Style {
        background: Some(Background::Color(p.selected)),
        text_color: p.primary,
        border: Border {
            color: p.primary,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::none(),
        snap: false,
    }
}

/// Mailbox tree node.
pub fn tree_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color: p.text_primary,
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        button::Status::Active | button::Status::Disabled => base,
        button::Status::Hovered | button::Status::Pressed => button::Style {
            background: Some(Background::Color(p.hover)),
            ..base
        },
    }
}

/// Selected mailbox tree node.
pub fn tree_button_selected_style(_theme: &iced::Theme, _status: button::Status) -> button::Style {
    let p = palette::current();

    button::Style {
        background: Some(Background::Color(p.selected)),
        text_color: p.primary,
        border: Border {
            color: p.primary,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::none(),
        snap: false,
    }
}

/// Clickable table row (envelopes, records).
pub fn row_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let p = palette::current();

    let base = button::Style {
        background: Some(Background::Color(p.surface)),
        text_color: p.text_primary,
        border: Border {
            color: p.border_subtle,
            width: 0.0,
            radius: radius::NONE.into(),
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        button::Status::Active | button::Status::Disabled => base,
        button::Status::Hovered | button::Status::Pressed => button::Style {
            background: Some(Background::Color(p.hover)),
            ..base
        },
    }
}

/// Table row that is open or checked.
pub fn row_button_selected_style(_theme: &iced::Theme, _status: button::Status) -> button::Style {
    let p = palette::current();

    button::Style {
        background: Some(Background::Color(p.selected)),
        text_color: p.text_primary,
        border: Border {
            color: p.primary,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        shadow: shadows::none(),
        snap: false,
    }
}

fn disabled(p: &Palette, base: button::Style) -> button::Style {
    button::Style {
        background: Some(Background::Color(p.surface_sunken)),
        text_color: p.text_muted,
        border: Border {
            color: p.border_subtle,
            ..base.border
        },
        shadow: shadows::none(),
        ..base
    }
}
