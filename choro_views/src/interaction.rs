// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover highlighting and the tooltip.

use std::sync::Arc;

use choro_charts::TextMeasurer;
use choro_core::{StrokeStyle, StyleMemo};
use kurbo::{Point, Size};

use crate::config::TooltipConfig;

/// An element whose outline can be highlighted and later restored.
pub trait StrokeTarget {
    /// The outline currently drawn.
    fn stroke(&self) -> &StrokeStyle;
    /// Replaces the outline currently drawn.
    fn set_stroke(&mut self, stroke: StrokeStyle);
    /// The default outline captured at creation.
    fn memo(&self) -> &StyleMemo;
}

/// Draws `target` with the highlight outline.
pub fn highlight(target: &mut impl StrokeTarget, style: &StrokeStyle) {
    target.set_stroke(style.clone());
}

/// Restores `target`'s own memoized outline.
pub fn dehighlight(target: &mut impl StrokeTarget) {
    let restored = target.memo().restore();
    target.set_stroke(restored);
}

/// Formats an attribute value for display: shortest round-trip decimal, `No data` for NaN.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "No data".to_owned()
    } else if value.is_infinite() {
        let s = if value > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_owned()
    } else {
        format!("{value}")
    }
}

/// The floating label shown while a county is hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    key: Arc<str>,
    name: Option<String>,
    attribute: String,
    value: f64,
    position: Point,
    size: Size,
}

impl Tooltip {
    /// The hovered county key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Element id of the label, `{key}_label`.
    pub fn dom_id(&self) -> String {
        format!("{}_label", self.key)
    }

    /// Heading line (the county key).
    pub fn heading(&self) -> &str {
        &self.key
    }

    /// `{attribute}: {value}`.
    pub fn body(&self) -> String {
        format!("{}: {}", self.attribute, format_value(self.value))
    }

    /// Optional secondary line (the feature's display name).
    pub fn secondary(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Top-left corner in page coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Measured size.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Builds tooltips and keeps them next to the pointer without leaving the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipLayout {
    config: TooltipConfig,
    viewport_width: f64,
}

impl TooltipLayout {
    /// Creates a layout for a page `viewport_width` wide.
    pub fn new(config: TooltipConfig, viewport_width: f64) -> Self {
        Self {
            config,
            viewport_width,
        }
    }

    /// Creates a tooltip for `key` next to `pointer`.
    pub fn open(
        &self,
        measurer: &dyn TextMeasurer,
        key: Arc<str>,
        name: Option<String>,
        attribute: &str,
        value: f64,
        pointer: Point,
    ) -> Tooltip {
        let mut tooltip = Tooltip {
            key,
            name,
            attribute: attribute.to_owned(),
            value,
            position: Point::ZERO,
            size: Size::ZERO,
        };
        tooltip.size = self.measure(measurer, &tooltip);
        tooltip.position = self.place(pointer, tooltip.size.width);
        tooltip
    }

    /// Changes the attribute line of an open tooltip, keeping it anchored at its current corner.
    pub fn refresh(
        &self,
        measurer: &dyn TextMeasurer,
        tooltip: &mut Tooltip,
        attribute: &str,
        value: f64,
    ) {
        attribute.clone_into(&mut tooltip.attribute);
        tooltip.value = value;
        tooltip.size = self.measure(measurer, tooltip);
    }

    /// Moves `tooltip` to follow `pointer`.
    pub fn follow(&self, tooltip: &mut Tooltip, pointer: Point) {
        tooltip.position = self.place(pointer, tooltip.size.width);
    }

    /// Top-left corner for a label `width` wide.
    ///
    /// The label sits right of and above the pointer. It flips to the left when it would come
    /// within `edge_margin` of the right edge, and below the pointer when there is no room above.
    pub fn place(&self, pointer: Point, width: f64) -> Point {
        let c = &self.config;
        let x = if pointer.x > self.viewport_width - width - c.edge_margin {
            pointer.x - width - c.offset_x
        } else {
            pointer.x + c.offset_x
        };
        let y = if pointer.y < c.offset_above {
            pointer.y + c.offset_below
        } else {
            pointer.y - c.offset_above
        };
        Point::new(x, y)
    }

    fn measure(&self, measurer: &dyn TextMeasurer, tooltip: &Tooltip) -> Size {
        let c = &self.config;
        let heading = measurer.measure(tooltip.heading(), c.font_size * 1.5);
        let body = measurer.measure(&tooltip.body(), c.font_size);
        let secondary = tooltip
            .secondary()
            .map_or((0.0, 0.0), |s| measurer.measure(s, c.font_size));
        let width = heading.0.max(body.0).max(secondary.0) + 2.0 * c.padding;
        let height = heading.1 + body.1 + secondary.1 + 2.0 * c.padding;
        Size::new(width, height)
    }
}
