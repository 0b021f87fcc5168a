//! Glyphs for the sprite overlay.

/// Body markers from smallest to largest apparent diameter.
pub const BODY_GLYPHS: &[char] = &['·', '•', '●', '⬤'];

/// Apparent diameters (virtual pixels) at which the next glyph takes over.
const GLYPH_STEPS: [f64; 3] = [16.0, 28.0, 42.0];

/// Pick a marker for a body drawn `diameter` virtual pixels wide.
pub fn body_glyph(diameter: f64) -> char {
    let step = GLYPH_STEPS.iter().filter(|&&s| diameter >= s).count();
    BODY_GLYPHS[step]
}
