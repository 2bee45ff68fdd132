// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained mark model for coordinated choropleth views.
//!
//! Views describe each frame as a list of [`Mark`]s with stable [`MarkId`]s. A [`Scene`] diffs
//! successive frames into [`MarkDiff`]s for a renderer to apply. Animated attributes are modeled
//! with [`Animated`] values that are evaluated at a frame time, and per-element default strokes
//! are kept in write-once [`StyleMemo`]s so hover highlighting can always be undone.
//!
//! Text shaping is out of scope; text marks store unshaped strings.

#![no_std]

mod mark;
mod scene;
mod style;
mod tween;

pub use mark::{
    Mark, MarkBuilder, MarkId, MarkKind, MarkPayload, PathMark, RectMark, TextAnchor,
    TextBaseline, TextMark,
};
pub use scene::{MarkDiff, Scene};
pub use style::{StrokeStyle, StyleMemo};
pub use tween::{Animated, Ease, Lerp};
