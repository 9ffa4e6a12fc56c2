//! Terminal rendering of composed commands
//!
//! Colored parts get an ANSI 24-bit foreground escape so the CLI output
//! mirrors the sheet's colored preview.

use crate::color::{parse_hex_color, Rgb};
use crate::compositor::CommandPart;

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// ANSI 24-bit foreground escape for a color.
///
/// ```
/// use jetpalette::color::Rgb;
/// use jetpalette::terminal::color_to_ansi_fg;
///
/// assert_eq!(color_to_ansi_fg(Rgb(255, 0, 0)), "\x1b[38;2;255;0;0m");
/// ```
pub fn color_to_ansi_fg(rgb: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", rgb.0, rgb.1, rgb.2)
}

/// Render parts with ANSI colors. Parts whose color does not parse are
/// printed uncolored.
pub fn render_ansi(parts: &[CommandPart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part.color.as_deref().map(parse_hex_color) {
            Some(Ok(rgb)) => {
                out.push_str(&color_to_ansi_fg(rgb));
                out.push_str(&part.text);
                out.push_str(ANSI_RESET);
            }
            _ => out.push_str(&part.text),
        }
    }
    out
}
