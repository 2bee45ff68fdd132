// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks.
//!
//! Shaping happens downstream of the mark model, so anything that has to size itself around text
//! (tooltips, label gutters) goes through a [`TextMeasurer`].

/// A minimal text measurement interface.
///
/// Callers can plug in a real shaping backend or use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the marks.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Assumes an average glyph width of 0.6em and a height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn heuristic_width_scales_with_glyph_count() {
        let m = HeuristicTextMeasurer;
        assert_eq!(m.measure("", 10.0), (0.0, 10.0));
        assert_eq!(m.measure("Knox", 10.0), (24.0, 10.0));
        let (w1, _) = m.measure("Penobscot", 12.0);
        let (w2, _) = m.measure("Penobscot", 24.0);
        assert_eq!(w2, 2.0 * w1);
    }
}
