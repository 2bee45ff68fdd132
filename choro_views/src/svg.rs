// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output driven by mark diffs.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use choro_core::{MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline};
use kurbo::Rect;
use peniko::Brush;

#[derive(Clone, Debug)]
struct Entry {
    z_index: i32,
    tag: Option<Arc<str>>,
    payload: MarkPayload,
}

/// A retained copy of one panel, updated from [`MarkDiff`]s and serialized on demand.
#[derive(Clone, Debug, Default)]
pub struct SvgScene {
    marks: HashMap<MarkId, Entry>,
    view_box: Option<Rect>,
    class: Option<String>,
}

impl SvgScene {
    /// Creates an empty scene clipped to `view_box`.
    pub fn new(view_box: Rect) -> Self {
        Self {
            view_box: Some(view_box),
            ..Self::default()
        }
    }

    /// Sets the `class` attribute of the root element.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Number of retained marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Whether no mark is retained.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Applies one frame of diffs.
    pub fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter {
                    id,
                    z_index,
                    tag,
                    new,
                    ..
                } => {
                    self.marks.insert(
                        *id,
                        Entry {
                            z_index: *z_index,
                            tag: tag.clone(),
                            payload: (**new).clone(),
                        },
                    );
                }
                MarkDiff::Update {
                    id,
                    new_z_index,
                    tag,
                    new,
                    ..
                } => {
                    self.marks.insert(
                        *id,
                        Entry {
                            z_index: *new_z_index,
                            tag: tag.clone(),
                            payload: (**new).clone(),
                        },
                    );
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    /// Serializes the scene, painting marks by ascending z-index, then id.
    pub fn to_svg_string(&self) -> String {
        let view_box = self
            .view_box
            .or_else(|| self.fitted_view_box())
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::new();

        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
        if let Some(class) = &self.class {
            let _ = write!(out, r#" class="{}""#, escape_xml(class));
        }
        let _ = writeln!(
            out,
            r#" viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        );

        let mut entries: Vec<_> = self.marks.iter().collect();
        entries.sort_by_key(|(id, e)| (e.z_index, id.0));

        for (_, entry) in entries {
            match &entry.payload {
                MarkPayload::Rect(r) => {
                    let _ = write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height(),
                    );
                    write_tag(&mut out, entry.tag.as_deref());
                    write_paint_attr(&mut out, "fill", &r.fill);
                    write_stroke(&mut out, &r.stroke, r.stroke_width);
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Middle => "middle",
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Hanging => "hanging",
                    };
                    let _ = write!(
                        out,
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                        t.pos.x, t.pos.y, t.font_size, baseline
                    );
                    if t.angle != 0.0 {
                        let _ = write!(
                            out,
                            r#" transform="rotate({} {} {})""#,
                            t.angle, t.pos.x, t.pos.y
                        );
                    }
                    out.push_str(match t.anchor {
                        TextAnchor::Start => r#" text-anchor="start""#,
                        TextAnchor::Middle => r#" text-anchor="middle""#,
                        TextAnchor::End => r#" text-anchor="end""#,
                    });
                    write_tag(&mut out, entry.tag.as_deref());
                    write_paint_attr(&mut out, "fill", &t.fill);
                    out.push('>');
                    out.push_str(&escape_xml(&t.text));
                    out.push_str("</text>\n");
                }
                MarkPayload::Path(p) => {
                    let _ = write!(out, r#"<path d="{}""#, p.path.to_svg());
                    write_tag(&mut out, entry.tag.as_deref());
                    write_paint_attr(&mut out, "fill", &p.fill);
                    write_stroke(&mut out, &p.stroke, p.stroke_width);
                    out.push_str("/>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }

    fn fitted_view_box(&self) -> Option<Rect> {
        let rect = self
            .marks
            .values()
            .filter_map(|e| e.payload.bounds())
            .reduce(|a, b| a.union(b))?;
        let pad = 10.0;
        Some(rect.inflate(pad, pad))
    }
}

fn write_tag(out: &mut String, tag: Option<&str>) {
    if let Some(tag) = tag {
        let _ = write!(out, r#" data-key="{}""#, escape_xml(tag));
    }
}

fn write_stroke(out: &mut String, brush: &Brush, width: f64) {
    if width > 0.0 {
        write_paint_attr(out, "stroke", brush);
        let _ = write!(out, r#" stroke-width="{width}""#);
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return ("none".to_owned(), None);
            }
            let paint = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = (rgba.a != 255).then(|| f64::from(rgba.a) / 255.0);
            (paint, opacity)
        }
        _ => ("none".to_owned(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

/// Escapes text for use in XML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use choro_core::{Mark, Scene};
    use peniko::Color;
    use peniko::color::palette::css;

    use super::*;

    fn bar(id: u64, key: &str, height: f64, stroke: Option<(Color, f64)>) -> Mark {
        let mut b = Mark::builder(MarkId::from_raw(id))
            .rect()
            .tag(key)
            .bounds(Rect::new(0.0, 10.0, 5.0, 10.0 + height))
            .fill(css::RED);
        if let Some((c, w)) = stroke {
            b = b.stroke(c, w);
        }
        b.build()
    }

    #[test]
    fn diffs_drive_the_serialized_scene() {
        let mut scene = Scene::new();
        let mut svg = SvgScene::new(Rect::new(0.0, 0.0, 50.0, 50.0)).with_class("chart");

        svg.apply_diffs(&scene.tick([bar(1, "Knox", 20.0, None), bar(2, "A&B", 5.0, None)]));
        let s = svg.to_svg_string();
        assert!(s.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" viewBox="0 0 50 50""#));
        assert!(s.contains(r##"data-key="Knox" fill="#ff0000""##), "{s}");
        assert!(s.contains(r#"data-key="A&amp;B""#));
        assert!(!s.contains("stroke="));

        svg.apply_diffs(&scene.tick([bar(1, "Knox", 20.0, Some((css::BLUE, 2.0)))]));
        let s = svg.to_svg_string();
        assert_eq!(svg.len(), 1);
        assert!(s.contains(r##"stroke="#0000ff" stroke-width="2""##), "{s}");
        assert!(!s.contains("A&amp;B"));
    }

    #[test]
    fn transparent_paint_is_none() {
        let mut out = String::new();
        write_paint_attr(&mut out, "fill", &Brush::Solid(Color::TRANSPARENT));
        assert_eq!(out, r#" fill="none""#);
    }
}
