// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for `choro_core`.
//!
//! This crate sits between data and marks:
//! - **Scales** map data values into screen coordinates ([`ScaleLinear`]) or classes
//!   ([`ScaleQuantile`]).
//! - **Guides** (axes, titles) and **series** (ranked bars) generate `choro_core::Mark`s with
//!   stable ids, so successive frames diff cleanly.
//!
//! Text shaping and layout are out of scope; text marks store unshaped strings and sizing goes
//! through a [`TextMeasurer`].

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod bar_mark;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod measure;
mod rect_mark;
mod rule_mark;
mod scale;
mod title;
mod z_order;

pub use axis::{AxisOrient, AxisSpec, AxisStyle};
pub use bar_mark::{BarMarkSpec, rank_descending};
pub use format::format_tick_with_step;
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use rect_mark::RectMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{ScaleLinear, ScaleLinearSpec, ScaleQuantile};
pub use title::TitleSpec;
pub use z_order::*;
