//! Buff color parsing
//!
//! Buff colors are stored as `#RRGGBB` strings. The short `#RGB` form is
//! understood when reading colors for terminal output.

use thiserror::Error;

/// Color given to buffs whose stored color is missing or malformed.
pub const DEFAULT_BUFF_COLOR: &str = "#BD93F9";

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Parse `#RGB` or `#RRGGBB`.
///
/// # Examples
///
/// ```
/// use jetpalette::color::{parse_hex_color, Rgb};
///
/// assert_eq!(parse_hex_color("#6272A4").unwrap(), Rgb(0x62, 0x72, 0xA4));
/// assert_eq!(parse_hex_color("#F00").unwrap(), Rgb(255, 0, 0));
/// assert!(parse_hex_color("red").is_err());
/// ```
pub fn parse_hex_color(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    let mut digits = Vec::with_capacity(6);
    for c in hex.chars() {
        let value = c.to_digit(16).ok_or(ColorError::InvalidHex(c))?;
        digits.push(value as u8);
    }

    match digits.len() {
        // #RGB -> #RRGGBB (doubled digits)
        3 => Ok(Rgb(digits[0] * 17, digits[1] * 17, digits[2] * 17)),
        6 => Ok(Rgb(
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        )),
        n => Err(ColorError::InvalidLength(n)),
    }
}

/// Whether a string is a stored buff color (`#RRGGBB` exactly).
pub fn is_buff_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Return the color unchanged if it is a valid buff color, otherwise `fallback`.
pub fn validate_color(color: &str, fallback: &str) -> String {
    if is_buff_color(color) {
        color.to_string()
    } else {
        fallback.to_string()
    }
}
