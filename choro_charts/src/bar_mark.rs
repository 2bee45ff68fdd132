// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ranked bar layout.
//!
//! Bars sit in equal-width slots across the plot, one per record, in rank order. The bar at rank
//! `i` of `n` occupies slot `i`, narrowed by a gap, and rises from the plot bottom to the scaled
//! value.

use core::cmp::Ordering;

use choro_core::{Mark, MarkId, StrokeStyle};
use kurbo::Rect;
use peniko::Brush;

use crate::scale::ScaleLinear;

/// Ranked vertical bars.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Id namespace; bar `row` gets `MarkId::for_row(namespace, row)`.
    pub namespace: u32,
    /// Plot area in chart coordinates.
    pub plot: Rect,
    /// Value scale; its range should run from `plot.y1` up to `plot.y0`.
    pub y_scale: ScaleLinear,
    /// Horizontal space left between adjacent bars.
    pub gap: f64,
    /// Rendering order hint.
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Creates a bar layout with a 1px gap.
    pub fn new(namespace: u32, plot: Rect, y_scale: ScaleLinear) -> Self {
        Self {
            namespace,
            plot,
            y_scale,
            gap: 1.0,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the gap between bars.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Width of one slot when `count` bars share the plot.
    pub fn slot_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.plot.width() / count as f64
    }

    /// Geometry of the bar at `rank` out of `count`, for `value`.
    ///
    /// NaN collapses to a zero-height bar on the baseline. Values below the domain grow downward
    /// from the baseline rather than producing a negative height.
    pub fn bar_rect(&self, rank: usize, count: usize, value: f64) -> Rect {
        let slot = self.slot_width(count);
        let x0 = self.plot.x0 + rank as f64 * slot;
        let x1 = x0 + (slot - self.gap).max(0.0);
        let base = self.plot.y1;
        if value.is_nan() {
            return Rect::new(x0, base, x1, base);
        }
        let y = self.y_scale.map(value);
        Rect::new(x0, y.min(base), x1, y.max(base))
    }

    /// Generates the mark for the bar of record `row`.
    pub fn mark(
        &self,
        row: u32,
        rect: Rect,
        fill: impl Into<Brush>,
        stroke: &StrokeStyle,
        tag: &str,
    ) -> Mark {
        Mark::builder(MarkId::for_row(self.namespace, row))
            .rect()
            .z_index(self.z_index)
            .tag(tag)
            .bounds(rect)
            .fill(fill)
            .stroke(stroke.brush.clone(), stroke.stroke_width)
            .build()
    }
}

/// Stably re-sorts `order` so values descend; NaN values go last.
///
/// Entries with equal values keep their relative position in `order`, so re-ranking an already
/// ranked order by the same values is a no-op.
pub fn rank_descending(order: &mut [usize], value: impl Fn(usize) -> f64) {
    order.sort_by(|&a, &b| {
        let (va, vb) = (value(a), value(b));
        match (va.is_nan(), vb.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => vb.partial_cmp(&va).unwrap_or(Ordering::Equal),
        }
    });
}
