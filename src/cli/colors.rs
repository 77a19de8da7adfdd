//! To maintain a theme of colors, colors are added here as constants so
//! the UI does not look bad at any point.
//!
//! - WIZ_VIOLET: Main Color
//! - WIZ_AMBER: Warnings and order gaps

use colored::Color;

pub(crate) const WIZ_VIOLET: Color = Color::TrueColor {
    r: 155,
    g: 110,
    b: 255,
};

pub(crate) const WIZ_AMBER: Color = Color::TrueColor {
    r: 255,
    g: 184,
    b: 76,
};
