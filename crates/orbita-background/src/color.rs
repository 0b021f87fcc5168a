//! Colour helpers for the terminal backends.

use orbita_core::Rgba;
use ratatui::style::Color;

/// Below this effective opacity a draw call is skipped entirely.
pub const MIN_VISIBLE_ALPHA: f64 = 0.01;

/// Blend `color` over an opaque `background`, with its opacity multiplied by
/// `gain`. Returns `None` when the result would be indistinguishable from
/// the background.
pub fn composite(color: Rgba, background: Rgba, gain: f64) -> Option<Color> {
    let alpha = (color.a * gain).clamp(0.0, 1.0);
    if alpha < MIN_VISIBLE_ALPHA {
        return None;
    }
    Some(mix(background, color, alpha))
}

/// Linear mix from `from` (t = 0) to `to` (t = 1), ignoring both alphas.
pub fn mix(from: Rgba, to: Rgba, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color::Rgb(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    )
}

/// Multiply every channel by `brightness`, saturating at white.
pub fn shade(color: Rgba, brightness: f64) -> Color {
    let channel = |c: u8| (c as f64 * brightness.max(0.0)).round().min(255.0) as u8;
    Color::Rgb(channel(color.r), channel(color.g), channel(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbita_core::palette;

    #[test]
    fn test_composite_over_black() {
        let c = composite(palette::WHITE.with_alpha(0.5), palette::BACKGROUND, 1.0);
        assert_eq!(c, Some(Color::Rgb(128, 128, 128)));
    }

    #[test]
    fn test_composite_gain_saturates() {
        let c = composite(palette::WHITE.with_alpha(0.5), palette::BACKGROUND, 4.0);
        assert_eq!(c, Some(Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_composite_skips_invisible() {
        assert_eq!(composite(palette::WHITE.with_alpha(0.001), palette::BACKGROUND, 3.0), None);
        assert_eq!(composite(palette::WHITE.with_alpha(0.0), palette::BACKGROUND, 100.0), None);
    }

    #[test]
    fn test_shade() {
        let tint = Rgba::rgb(200, 100, 0);
        assert_eq!(shade(tint, 1.0), Color::Rgb(200, 100, 0));
        assert_eq!(shade(tint, 1.5), Color::Rgb(255, 150, 0));
        assert_eq!(shade(tint, 0.5), Color::Rgb(100, 50, 0));
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(255, 255, 255);
        assert_eq!(mix(a, b, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(mix(a, b, 1.0), Color::Rgb(255, 255, 255));
        assert_eq!(mix(a, b, 2.0), Color::Rgb(255, 255, 255));
    }
}
