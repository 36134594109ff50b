//! Theme token resolution.
//!
//! A theme id maps to a fixed, immutable set of style tokens consumed by
//! both exporters. The id set is closed; unknown ids fail fast before any
//! export work starts.

use std::fmt;

/// An opaque sRGB color carried as 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `RRGGBB` hex, the form OOXML color attributes take.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Resolved style tokens for one theme id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTokens {
    pub id: &'static str,
    pub background: Color,
    pub text: Color,
    pub heading: Color,
    pub accent: Color,
    pub font_face: &'static str,
}

/// The fixed theme table.
pub const THEMES: [ThemeTokens; 3] = [
    ThemeTokens {
        id: "corporate",
        background: Color::new(0xFF, 0xFF, 0xFF),
        text: Color::new(0x1E, 0x29, 0x3B),
        heading: Color::new(0x0F, 0x17, 0x2A),
        accent: Color::new(0x4F, 0x46, 0xE5),
        font_face: "Arial",
    },
    ThemeTokens {
        id: "cyber",
        background: Color::new(0x0F, 0x17, 0x2A),
        text: Color::new(0xE2, 0xE8, 0xF0),
        heading: Color::new(0xF0, 0xFD, 0xF4),
        accent: Color::new(0x22, 0xD3, 0xEE),
        font_face: "Courier New",
    },
    ThemeTokens {
        id: "editorial",
        background: Color::new(0xFE, 0xFC, 0xE8),
        text: Color::new(0x37, 0x41, 0x51),
        heading: Color::new(0x1F, 0x29, 0x37),
        accent: Color::new(0x92, 0x40, 0x0E),
        font_face: "Georgia",
    },
];

impl ThemeTokens {
    /// Resolves a theme id to its tokens. Unknown ids are an error, never
    /// silently mapped to a fallback theme.
    pub fn resolve(id: &str) -> Result<&'static ThemeTokens, crate::export::ExportError> {
        THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| crate::export::ExportError::UnknownTheme(id.to_string()))
    }
}
