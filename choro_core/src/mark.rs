// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marks: stable-identity visual primitives.
//!
//! A [`Mark`] is a fully evaluated rect, path, or text item. Views rebuild their mark lists every
//! frame; identity comes from [`MarkId`], so a [`crate::Scene`] can diff successive lists into
//! enter/update/exit records.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};

/// A stable mark identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns an id for element `row` within a `namespace`.
    ///
    /// Views give each family of marks (map shapes, chart bars, axis parts) its own namespace so
    /// row indices never collide.
    pub const fn for_row(namespace: u32, row: u32) -> Self {
        Self(((namespace as u64) << 32) | row as u64)
    }
}

/// The geometric kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// An axis-aligned rectangle.
    Rect,
    /// An arbitrary Bézier path.
    Path,
    /// A run of unshaped text.
    Text,
}

/// Horizontal anchoring for text marks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// `x` is the start of the text.
    #[default]
    Start,
    /// `x` is the middle of the text.
    Middle,
    /// `x` is the end of the text.
    End,
}

/// Vertical baseline for text marks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// `y` is the alphabetic baseline.
    #[default]
    Alphabetic,
    /// `y` is the vertical middle of the text.
    Middle,
    /// `y` is the hanging baseline.
    Hanging,
}

/// Evaluated rectangle payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMark {
    /// Geometry in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the stroke.
    pub stroke_width: f64,
}

/// Evaluated path payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMark {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the stroke.
    pub stroke_width: f64,
}

/// Evaluated text payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Unshaped text.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

/// The evaluated visual content of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rectangle payload.
    Rect(RectMark),
    /// Path payload.
    Path(PathMark),
    /// Text payload.
    Text(TextMark),
}

impl MarkPayload {
    /// Returns the kind of this payload.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Path(_) => MarkKind::Path,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// Returns geometric bounds, if cheaply known.
    ///
    /// Text has no bounds here because it is unshaped.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect),
            Self::Path(p) => Some(p.path.bounding_box()),
            Self::Text(_) => None,
        }
    }
}

/// A fully evaluated mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Paint order; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Optional element key (a county key for data-bound marks).
    pub tag: Option<Arc<str>>,
    /// Visual content.
    pub payload: MarkPayload,
}

impl Mark {
    /// Starts building a mark with the given id.
    ///
    /// The builder defaults to a rect; call [`MarkBuilder::path`] or [`MarkBuilder::text`] to
    /// switch kinds.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder::new(id)
    }

    /// Returns the kind of this mark.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }
}

/// Builder for [`Mark`].
#[derive(Clone, Debug)]
pub struct MarkBuilder {
    id: MarkId,
    kind: MarkKind,
    z_index: i32,
    tag: Option<Arc<str>>,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    path: BezPath,
    text: String,
    font_size: f64,
    angle: f64,
    anchor: TextAnchor,
    baseline: TextBaseline,
    fill: Brush,
    stroke: Brush,
    stroke_width: f64,
}

impl MarkBuilder {
    fn new(id: MarkId) -> Self {
        Self {
            id,
            kind: MarkKind::Rect,
            z_index: 0,
            tag: None,
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            path: BezPath::new(),
            text: String::new(),
            font_size: 10.0,
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            fill: Brush::default(),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
        }
    }

    /// Builds a rect mark.
    pub fn rect(mut self) -> Self {
        self.kind = MarkKind::Rect;
        self
    }

    /// Builds a path mark.
    pub fn path(mut self) -> Self {
        self.kind = MarkKind::Path;
        self
    }

    /// Builds a text mark.
    pub fn text(mut self) -> Self {
        self.kind = MarkKind::Text;
        self
    }

    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Tags the mark with an element key.
    pub fn tag(mut self, tag: impl Into<Arc<str>>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets `x` (rect origin or text anchor).
    pub fn x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Sets `y` (rect origin or text anchor).
    pub fn y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Sets the rect width.
    pub fn w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    /// Sets the rect height.
    pub fn h(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    /// Sets the whole rect geometry at once.
    pub fn bounds(self, rect: Rect) -> Self {
        self.x(rect.x0).y(rect.y0).w(rect.width()).h(rect.height())
    }

    /// Sets path geometry.
    pub fn path_data(mut self, path: BezPath) -> Self {
        self.path = path;
        self
    }

    /// Sets text content.
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the font size.
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the text rotation in degrees.
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the horizontal text anchor.
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the text baseline.
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        let payload = match self.kind {
            MarkKind::Rect => MarkPayload::Rect(RectMark {
                rect: Rect::new(self.x, self.y, self.x + self.w, self.y + self.h),
                fill: self.fill,
                stroke: self.stroke,
                stroke_width: self.stroke_width,
            }),
            MarkKind::Path => MarkPayload::Path(PathMark {
                path: self.path,
                fill: self.fill,
                stroke: self.stroke,
                stroke_width: self.stroke_width,
            }),
            MarkKind::Text => MarkPayload::Text(TextMark {
                pos: Point::new(self.x, self.y),
                text: self.text,
                font_size: self.font_size,
                angle: self.angle,
                anchor: self.anchor,
                baseline: self.baseline,
                fill: self.fill,
            }),
        };
        Mark {
            id: self.id,
            z_index: self.z_index,
            tag: self.tag,
            payload,
        }
    }
}
