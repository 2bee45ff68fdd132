// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke styles and the per-element style memo.

use peniko::color::palette::css;
use peniko::{Brush, Color};

/// A paint + width pair for stroked outlines.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }

    /// No visible stroke (`stroke: none; stroke-width: 0`).
    pub fn none() -> Self {
        Self::solid(Color::TRANSPARENT, 0.0)
    }

    /// Returns `true` when the stroke paints nothing.
    pub fn is_none(&self) -> bool {
        if self.stroke_width <= 0.0 {
            return true;
        }
        matches!(&self.brush, Brush::Solid(c) if c.to_rgba8().a == 0)
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// The default stroke of an element, captured once when the element is created.
///
/// Highlighting overwrites an element's live stroke; dehighlighting restores from the memo. The
/// memo has no setter, so a highlight can never leak into it.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleMemo {
    stroke: StrokeStyle,
}

impl StyleMemo {
    /// Records `stroke` as the element's default.
    pub fn record(stroke: StrokeStyle) -> Self {
        Self { stroke }
    }

    /// The recorded default stroke.
    pub fn stroke(&self) -> &StrokeStyle {
        &self.stroke
    }

    /// A fresh copy of the recorded stroke, for restoring an element.
    pub fn restore(&self) -> StrokeStyle {
        self.stroke.clone()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn none_paints_nothing() {
        assert!(StrokeStyle::none().is_none());
        assert!(StrokeStyle::solid(css::BLACK, 0.0).is_none());
        assert!(!StrokeStyle::solid(css::BLACK, 0.5).is_none());
    }

    #[test]
    fn memo_restores_the_recorded_stroke() {
        let memo = StyleMemo::record(StrokeStyle::solid(css::BLACK, 0.5));
        let highlighted = StrokeStyle::solid(css::BLUE, 2.0);
        assert_ne!(&highlighted, memo.stroke());
        assert_eq!(memo.restore(), StrokeStyle::solid(css::BLACK, 0.5));
    }
}
