//! RGB colour used by the document tree and both render backends.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(17, 24, 39);
    pub const GRAY: Color = Color::rgb(107, 114, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(243, 244, 246);
    pub const BORDER: Color = Color::rgb(209, 213, 219);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            6 => Some(Self::rgb(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let expand = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                Some(Self::rgb(expand(0).ok()?, expand(1).ok()?, expand(2).ok()?))
            }
            _ => None,
        }
    }

    pub fn to_pixel(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
