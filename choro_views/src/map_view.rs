// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The choropleth map panel.

use std::sync::Arc;

use choro_charts::{CONTEXT_SHAPES, GRID_LINES, PLOT_BACKGROUND, SERIES_FILL};
use choro_core::{Animated, Ease, Mark, MarkId, StrokeStyle, StyleMemo};
use choro_geo::{
    AttributeCatalog, AttributeId, ConicEqualArea, FeatureCollection, GeoPath, Graticule,
};
use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Color;
use tracing::warn;

use crate::config::ViewConfig;
use crate::interaction::StrokeTarget;
use crate::state::AppState;

/// Id namespace of county shapes.
pub const SHAPE_NAMESPACE: u32 = 1;

const SPHERE_ID: MarkId = MarkId::from_raw(1);
const GRATICULE_ID: MarkId = MarkId::from_raw(2);
const CONTEXT_ID: MarkId = MarkId::from_raw(3);

/// One county on the map.
#[derive(Clone, Debug)]
pub struct MapShape {
    key: Arc<str>,
    name: Option<String>,
    path: BezPath,
    bounds: Rect,
    values: Vec<f64>,
    fill: Animated<Color>,
    stroke: StrokeStyle,
    memo: StyleMemo,
}

impl MapShape {
    /// County key.
    pub fn key(&self) -> &Arc<str> {
        &self.key
    }

    /// Display name, if the feature had one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Projected outline.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Joined value of `attribute`; NaN without a record.
    pub fn value(&self, attribute: AttributeId) -> f64 {
        self.values
            .get(attribute.index())
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Fill at time `now`.
    pub fn fill_at(&self, now: f64) -> Color {
        self.fill.value_at(now)
    }

    /// Fill the running transition ends at.
    pub fn target_fill(&self) -> Color {
        *self.fill.target()
    }
}

impl StrokeTarget for MapShape {
    fn stroke(&self) -> &StrokeStyle {
        &self.stroke
    }

    fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.stroke = stroke;
    }

    fn memo(&self) -> &StyleMemo {
        &self.memo
    }
}

/// Projected counties over a graticule and context outlines.
///
/// Geometry is projected once at construction. Changing the expressed attribute only retargets
/// fills.
#[derive(Clone, Debug)]
pub struct MapView {
    frame: Rect,
    projection: ConicEqualArea,
    sphere: BezPath,
    graticule: BezPath,
    context: BezPath,
    shapes: Vec<MapShape>,
    sphere_fill: Color,
    graticule_stroke: Color,
    context_fill: Color,
    context_stroke: Color,
    fill_duration: f64,
}

impl MapView {
    /// Projects `counties` (already joined) and `background` into a panel.
    pub fn new(
        config: &ViewConfig,
        catalog: &AttributeCatalog,
        counties: &FeatureCollection,
        background: &FeatureCollection,
        state: &AppState,
    ) -> Self {
        let width = config.map_width();
        let height = config.map.height;
        let m = &config.map;
        let projection = ConicEqualArea::albers()
            .with_center(m.center[0], m.center[1])
            .with_rotate(m.rotate[0], m.rotate[1], m.rotate[2])
            .with_parallels(m.parallels[0], m.parallels[1])
            .with_scale(m.scale)
            .with_translate(width / 2.0, height / 2.0);
        let geo_path = GeoPath::new(&projection);
        let graticule = Graticule::new()
            .with_step(m.graticule_step[0], m.graticule_step[1])
            .with_precision(m.graticule_precision);

        let colors = &config.colors;
        let default_stroke = StrokeStyle::solid(colors.map_stroke.color(), colors.map_stroke_width);
        let mut shapes = Vec::with_capacity(counties.len());
        for (i, feature) in counties.features.iter().enumerate() {
            let Some(key) = feature.key(&config.key_field) else {
                warn!(index = i, field = %config.key_field, "county feature without a key; skipped");
                continue;
            };
            let path = feature
                .geometry
                .as_ref()
                .map(|g| geo_path.geometry(g))
                .unwrap_or_default();
            let values: Vec<f64> = catalog
                .iter()
                .map(|(_, a)| feature.properties.value(a.name()))
                .collect();
            let expressed = values
                .get(state.expressed().index())
                .copied()
                .unwrap_or(f64::NAN);
            let fill = state.fill_for(expressed);
            shapes.push(MapShape {
                key: Arc::from(key),
                name: feature.properties.text(&config.name_field),
                bounds: path.bounding_box(),
                path,
                values,
                fill: Animated::settled(fill),
                stroke: default_stroke.clone(),
                memo: StyleMemo::record(default_stroke.clone()),
            });
        }

        Self {
            frame: Rect::new(0.0, 0.0, width, height),
            sphere: geo_path.sphere(&graticule),
            graticule: geo_path.lines(&graticule.lines()),
            context: geo_path.collection(background),
            projection,
            shapes,
            sphere_fill: colors.sphere.color(),
            graticule_stroke: colors.graticule.color(),
            context_fill: colors.context_fill.color(),
            context_stroke: colors.context_stroke.color(),
            fill_duration: config.transitions.map_fill_ms,
        }
    }

    /// Panel bounds.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The projection used for every layer.
    pub fn projection(&self) -> &ConicEqualArea {
        &self.projection
    }

    /// County shapes in feature order.
    pub fn shapes(&self) -> &[MapShape] {
        &self.shapes
    }

    /// Mutable access to one shape, for highlighting.
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut MapShape> {
        self.shapes.get_mut(index)
    }

    /// Retargets every fill to the expressed attribute's color.
    pub fn restyle(&mut self, state: &AppState, now: f64) {
        let attribute = state.expressed();
        for shape in &mut self.shapes {
            let to = state.fill_for(shape.value(attribute));
            shape
                .fill
                .retarget(to, now, 0.0, self.fill_duration, Ease::CubicInOut);
        }
    }

    /// Time at which the last fill transition finishes.
    pub fn settled_at(&self) -> f64 {
        self.shapes
            .iter()
            .map(|s| s.fill.end_time())
            .fold(0.0, f64::max)
    }

    /// The topmost county under `point`, by non-zero winding.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.shapes
            .iter()
            .rposition(|s| s.bounds.contains(point) && s.path.contains(point))
    }

    /// Marks for the panel at time `now`.
    pub fn marks(&self, now: f64) -> Vec<Mark> {
        let mut out = Vec::with_capacity(3 + self.shapes.len());
        out.push(
            Mark::builder(SPHERE_ID)
                .path()
                .z_index(PLOT_BACKGROUND)
                .path_data(self.sphere.clone())
                .fill(self.sphere_fill)
                .build(),
        );
        out.push(
            Mark::builder(GRATICULE_ID)
                .path()
                .z_index(GRID_LINES)
                .path_data(self.graticule.clone())
                .fill(Color::TRANSPARENT)
                .stroke(self.graticule_stroke, 0.5)
                .build(),
        );
        out.push(
            Mark::builder(CONTEXT_ID)
                .path()
                .z_index(CONTEXT_SHAPES)
                .path_data(self.context.clone())
                .fill(self.context_fill)
                .stroke(self.context_stroke, 1.0)
                .build(),
        );
        for (i, shape) in self.shapes.iter().enumerate() {
            out.push(
                Mark::builder(shape_id(i))
                    .path()
                    .z_index(SERIES_FILL)
                    .tag(Arc::clone(&shape.key))
                    .path_data(shape.path.clone())
                    .fill(shape.fill_at(now))
                    .stroke(shape.stroke.brush.clone(), shape.stroke.stroke_width)
                    .build(),
            );
        }
        out
    }
}

/// Mark id of the county shape at `index`.
pub fn shape_id(index: usize) -> MarkId {
    MarkId::for_row(SHAPE_NAMESPACE, u32::try_from(index).unwrap_or(u32::MAX))
}
