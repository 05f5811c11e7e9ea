//! Light and dark color palettes.

use std::sync::{LazyLock, RwLock};

use iced::Color;
use rustmailer_console_core::Theme;

/// Colors used by the console.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub primary: Color,
    pub primary_light: Color,
    pub primary_dark: Color,

    pub surface: Color,
    pub surface_elevated: Color,
    pub surface_sunken: Color,
    pub background: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_on_primary: Color,

    /// Healthy, sent, succeeded.
    pub success: Color,
    /// Scheduled, pending, retrying.
    pub warning: Color,
    /// Failed, deleted, errors.
    pub danger: Color,
    /// Informational highlights and links.
    pub info: Color,

    pub selected: Color,
    pub hover: Color,

    pub border_subtle: Color,
    pub border_medium: Color,

    pub shadow: Color,
    /// Dims the page behind a dialog.
    pub backdrop: Color,
}

impl Palette {
    /// Light palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::from_rgb(0.0, 0.48, 0.95),
            primary_light: Color::from_rgb(0.35, 0.65, 1.0),
            primary_dark: Color::from_rgb(0.0, 0.38, 0.80),

            surface: Color::WHITE,
            surface_elevated: Color::WHITE,
            surface_sunken: Color::from_rgb(0.97, 0.975, 0.99),
            background: Color::from_rgb(0.98, 0.985, 0.99),

            text_primary: Color::from_rgb(0.08, 0.10, 0.14),
            text_secondary: Color::from_rgb(0.42, 0.46, 0.54),
            text_muted: Color::from_rgb(0.60, 0.64, 0.70),
            text_on_primary: Color::WHITE,

            success: Color::from_rgb(0.2, 0.75, 0.45),
            warning: Color::from_rgb(1.0, 0.75, 0.0),
            danger: Color::from_rgb(0.98, 0.28, 0.35),
            info: Color::from_rgb(0.0, 0.55, 1.0),

            selected: Color::from_rgb(0.94, 0.97, 1.0),
            hover: Color::from_rgb(0.97, 0.98, 0.99),

            border_subtle: Color::from_rgb(0.92, 0.93, 0.95),
            border_medium: Color::from_rgb(0.86, 0.88, 0.91),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.06),
            backdrop: Color::from_rgba(0.0, 0.0, 0.0, 0.35),
        }
    }

    /// Dark palette with teal accents.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::from_rgb(0.0, 1.0, 0.8),
            primary_light: Color::from_rgb(0.2, 1.0, 0.85),
            primary_dark: Color::from_rgb(0.0, 0.8, 0.65),

            surface: Color::from_rgb(0.12, 0.13, 0.15),
            surface_elevated: Color::from_rgb(0.15, 0.16, 0.18),
            surface_sunken: Color::from_rgb(0.10, 0.11, 0.13),
            background: Color::from_rgb(0.08, 0.09, 0.11),

            text_primary: Color::from_rgb(0.92, 0.93, 0.95),
            text_secondary: Color::from_rgb(0.65, 0.68, 0.72),
            text_muted: Color::from_rgb(0.50, 0.53, 0.58),
            text_on_primary: Color::from_rgb(0.08, 0.09, 0.11),

            success: Color::from_rgb(0.2, 0.9, 0.5),
            warning: Color::from_rgb(1.0, 0.85, 0.2),
            danger: Color::from_rgb(1.0, 0.35, 0.4),
            info: Color::from_rgb(0.3, 0.7, 1.0),

            selected: Color::from_rgb(0.10, 0.18, 0.20),
            hover: Color::from_rgb(0.14, 0.15, 0.17),

            border_subtle: Color::from_rgb(0.20, 0.21, 0.24),
            border_medium: Color::from_rgb(0.28, 0.29, 0.32),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.20),
            backdrop: Color::from_rgba(0.0, 0.0, 0.0, 0.55),
        }
    }

    /// Palette for `theme`.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}

static CURRENT: LazyLock<RwLock<Palette>> = LazyLock::new(|| RwLock::new(Palette::dark()));

/// Switches the active palette.
pub fn set_theme(theme: Theme) {
    if let Ok(mut palette) = CURRENT.write() {
        *palette = Palette::for_theme(theme);
    }
}

/// Copy of the active palette.
#[must_use]
pub fn current() -> Palette {
    CURRENT.read().map_or_else(|_| Palette::dark(), |p| *p)
}
