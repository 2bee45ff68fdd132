// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical axis mark generation.
//!
//! An [`AxisSpec`] is a single spec with an `orient` of left or right. Arranging it against a plot
//! rectangle generates the domain line, tick marks, and tick labels as marks.

extern crate alloc;

use alloc::vec::Vec;

use choro_core::{Mark, MarkId, StrokeStyle, TextAnchor, TextBaseline};
use kurbo::Rect;
use peniko::Brush;

use crate::format::format_tick_with_step;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleLinear, ScaleLinearSpec};
use crate::z_order;

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            label_fill: rule.brush.clone(),
            rule,
            label_font_size: 10.0,
        }
    }
}

/// Which side of the plot the axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Along the left edge, ticks and labels pointing left.
    Left,
    /// Along the right edge, ticks and labels pointing right.
    Right,
}

/// A vertical axis specification.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The axis scale specification.
    pub scale: ScaleLinearSpec,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks.
    pub tick_count: usize,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between the tick end and its label.
    pub tick_padding: f64,
    /// Whether to draw the axis domain line.
    pub show_domain: bool,
    /// Axis styling.
    pub style: AxisStyle,
}

impl AxisSpec {
    /// Creates an axis with ten ticks of length 6 and labels 3 units past the tick ends.
    pub fn new(id_base: u64, scale: ScaleLinearSpec, orient: AxisOrient) -> Self {
        Self {
            id_base,
            scale,
            orient,
            tick_count: 10,
            tick_size: 6.0,
            tick_padding: 3.0,
            show_domain: true,
            style: AxisStyle::default(),
        }
    }

    /// Convenience for a left axis.
    pub fn left(id_base: u64, scale: ScaleLinearSpec) -> Self {
        Self::new(id_base, scale, AxisOrient::Left)
    }

    /// Convenience for a right axis.
    pub fn right(id_base: u64, scale: ScaleLinearSpec) -> Self {
        Self::new(id_base, scale, AxisOrient::Right)
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the tick length.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Enables or disables the domain line.
    pub fn with_domain(mut self, show_domain: bool) -> Self {
        self.show_domain = show_domain;
        self
    }

    /// Sets the styling.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// The scale this axis draws against `plot` (domain bottom-to-top).
    pub fn scale_for(&self, plot: Rect) -> ScaleLinear {
        self.scale.instantiate((plot.y1, plot.y0))
    }

    /// Generates the axis marks for a plot rectangle.
    pub fn marks(&self, plot: Rect) -> Vec<Mark> {
        let (x, dir, anchor) = match self.orient {
            AxisOrient::Left => (plot.x0, -1.0, TextAnchor::End),
            AxisOrient::Right => (plot.x1, 1.0, TextAnchor::Start),
        };
        let tick_size = self.tick_size.abs();
        let label_x = x + dir * (tick_size + self.tick_padding.max(0.0));
        let scale = self.scale_for(plot);
        let ticks = scale.ticks(self.tick_count);
        let step = scale.tick_step(self.tick_count);

        let mut out = Vec::with_capacity(1 + 2 * ticks.len());

        if self.show_domain {
            out.push(
                RuleMarkSpec::vertical(MarkId::from_raw(self.id_base), x, plot.y0, plot.y1)
                    .with_stroke(self.style.rule.clone())
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
            );
        }

        for (i, v) in ticks.into_iter().enumerate() {
            let y = scale.map(v);
            if y < plot.y0 - 1.0e-9 || y > plot.y1 + 1.0e-9 {
                continue;
            }
            let i = i as u64;
            out.push(
                RuleMarkSpec::horizontal(
                    MarkId::from_raw(self.id_base + 1 + i),
                    y,
                    x,
                    x + dir * tick_size,
                )
                .with_stroke(self.style.rule.clone())
                .with_z_index(z_order::AXIS_RULES)
                .mark(),
            );
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1000 + i))
                    .text()
                    .z_index(z_order::AXIS_LABELS)
                    .x(label_x)
                    .y(y)
                    .content(format_tick_with_step(v, step))
                    .anchor(anchor)
                    .baseline(TextBaseline::Middle)
                    .font_size(self.style.label_font_size)
                    .fill(self.style.label_fill.clone())
                    .build(),
            );
        }

        out
    }
}
