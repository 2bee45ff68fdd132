// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions shared by the map and chart panels.
//!
//! Marks carry an explicit `z_index`; renderers sort by `(z_index, MarkId)`.

/// Backdrops: the graticule sphere on the map, the chart background.
pub const PLOT_BACKGROUND: i32 = -100;
/// Graticule lines.
pub const GRID_LINES: i32 = -50;
/// Context outlines drawn under the data (neighbouring states).
pub const CONTEXT_SHAPES: i32 = -20;

/// Data-bound fills (county shapes, bars).
pub const SERIES_FILL: i32 = 0;

/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Plot frame drawn over the data.
pub const PLOT_FRAME: i32 = 60;
/// Chart-level titles.
pub const TITLES: i32 = 80;
