//! Core types shared by the orbita crates.
//!
//! Everything here is plain value data: viewport geometry in virtual pixels,
//! points, and colours that carry an alpha channel until a backend decides
//! how to composite them.

use ratatui::style::Color;

/// A position in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Translate by an offset.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Size of the drawing surface in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build a viewport from a terminal size and the pixel size of one cell.
    pub fn from_cells(columns: u16, rows: u16, cell_width: f64, cell_height: f64) -> Self {
        Self::new(columns as f64 * cell_width, rows as f64 * cell_height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `point` lies within the viewport grown by `margin` on every side.
    ///
    /// The bounds are inclusive: a point exactly on the expanded edge is inside.
    pub fn contains_with_margin(&self, point: Point, margin: f64) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

/// An sRGB colour with a separate opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different opacity (clamped to `0.0..=1.0`).
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl From<Rgba> for Color {
    /// Drops the alpha channel.
    fn from(c: Rgba) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Fixed colours used across the app.
pub mod palette {
    use super::Rgba;

    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BACKGROUND: Rgba = Rgba::rgb(0, 0, 0);
    /// Price went up.
    pub const UP: Rgba = Rgba::rgb(0x4a, 0xde, 0x80);
    /// Price went down or stayed flat.
    pub const DOWN: Rgba = Rgba::rgb(0xf8, 0x71, 0x71);
    pub const NEUTRAL: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    /// Nebula tints: near-black greys.
    pub const NEBULA: [Rgba; 3] = [
        Rgba::rgb(10, 10, 10),
        Rgba::rgb(20, 20, 20),
        Rgba::rgb(5, 5, 5),
    ];
}
