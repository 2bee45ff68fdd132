// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles.
//!
//! A title is a single text mark at a fixed position in chart coordinates. Its text is usually
//! derived from the expressed attribute, so the title is rebuilt whenever the attribute changes.

extern crate alloc;

use alloc::string::String;

use choro_core::{Mark, MarkId, TextAnchor, TextBaseline};
use kurbo::Point;
use peniko::Brush;

use crate::z_order;

/// A chart-level title.
#[derive(Clone, Debug)]
pub struct TitleSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Title text (unshaped).
    pub text: String,
    /// Anchor position in chart coordinates.
    pub pos: Point,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Rendering order hint.
    pub z_index: i32,
}

impl TitleSpec {
    /// Creates a start-anchored title at the origin with default styling.
    pub fn new(id: MarkId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            pos: Point::ZERO,
            font_size: 18.0,
            fill: Brush::default(),
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            z_index: z_order::TITLES,
        }
    }

    /// Places the title anchor at `(x, y)`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.pos = Point::new(x, y);
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Generates the title mark.
    pub fn mark(&self) -> Mark {
        Mark::builder(self.id)
            .text()
            .z_index(self.z_index)
            .x(self.pos.x)
            .y(self.pos.y)
            .content(self.text.clone())
            .font_size(self.font_size)
            .anchor(self.anchor)
            .baseline(self.baseline)
            .fill(self.fill.clone())
            .build()
    }
}
