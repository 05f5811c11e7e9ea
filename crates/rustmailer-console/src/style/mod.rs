//! Colors and widget styles for the console.
//!
//! Style functions read the active palette through [`palette::current`] so a
//! theme switch takes effect on the next redraw without threading the theme
//! through every view.

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use buttons::{
    danger_button_style, ghost_button_style, nav_button_selected_style, nav_button_style,
    primary_button_style, row_button_selected_style, row_button_style, secondary_button_style,
    tree_button_selected_style, tree_button_style,
};
pub use containers::{
    badge_style, banner_style, card_style, header_style, modal_backdrop_style, modal_style,
    page_style, sidebar_style, table_header_style, toast_style,
};
pub use inputs::{field_input_style, scrollable_style};
pub use shadows::radius;
