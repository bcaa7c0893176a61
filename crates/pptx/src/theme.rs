//! Deck color palette.
//!
//! The sepia palette carries the source page's wartime aesthetic onto the
//! slides: dark for headlines, brown for body copy, medium for accents,
//! cream for card fills.

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Create a color from its channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Six-digit uppercase hex, as `a:srgbClr` expects it.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Headline color.
pub const SEPIA_DARK: Color = Color::new(0x3D, 0x28, 0x17);

/// Body copy color.
pub const SEPIA_BROWN: Color = Color::new(0x5C, 0x40, 0x33);

/// Card outlines and descriptions.
pub const SEPIA_MEDIUM: Color = Color::new(0x8B, 0x6F, 0x47);

/// Card fill.
pub const SEPIA_CREAM: Color = Color::new(0xF5, 0xF1, 0xE8);
