//! Shadows and corner radii.

use iced::{Color, Shadow, Vector};

/// Corner radii.
pub mod radius {
    pub const NONE: f32 = 0.0;
    pub const SMALL: f32 = 4.0;
    pub const MEDIUM: f32 = 6.0;
    pub const LARGE: f32 = 8.0;
    pub const PILL: f32 = 9999.0;
}

pub fn none() -> Shadow {
    Shadow::default()
}

/// Drop shadow for floating surfaces (dialogs, toasts).
pub const fn floating(color: Color) -> Shadow {
    Shadow {
        color,
        offset: Vector::new(0.0, 8.0),
        blur_radius: 24.0,
    }
}

/// Colored halo around primary buttons.
pub const fn glow(color: Color, strength: f32) -> Shadow {
    Shadow {
        color: Color::from_rgba(color.r, color.g, color.b, strength),
        offset: Vector::new(0.0, 2.0),
        blur_radius: 12.0,
    }
}
