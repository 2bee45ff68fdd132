// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning geographic geometry into projected [`BezPath`]s.

use std::f64::consts::PI;

use geo::{Coord, Geometry, LineString, Polygon};
use kurbo::BezPath;

use crate::feature::FeatureCollection;
use crate::graticule::{Graticule, LonLatLine};
use crate::projection::ConicEqualArea;

/// Projects geometry through a [`ConicEqualArea`] into drawable paths.
///
/// Polygon rings become closed subpaths. Open lines are split where they cross the seam of the
/// rotated frame, so a parallel that wraps around the globe does not draw a chord across the map.
/// Points carry no area and are skipped.
#[derive(Clone, Copy, Debug)]
pub struct GeoPath<'a> {
    projection: &'a ConicEqualArea,
}

impl<'a> GeoPath<'a> {
    /// Creates a path generator for `projection`.
    pub fn new(projection: &'a ConicEqualArea) -> Self {
        Self { projection }
    }

    /// The projection in use.
    pub fn projection(&self) -> &'a ConicEqualArea {
        self.projection
    }

    /// Projects one geometry.
    pub fn geometry(&self, geometry: &Geometry<f64>) -> BezPath {
        let mut path = BezPath::new();
        self.push_geometry(&mut path, geometry);
        path
    }

    /// Projects every feature geometry of `collection` into a single path.
    pub fn collection(&self, collection: &FeatureCollection) -> BezPath {
        let mut path = BezPath::new();
        for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
            self.push_geometry(&mut path, geometry);
        }
        path
    }

    /// Projects open polylines, as produced by [`Graticule::lines`].
    pub fn lines(&self, lines: &[LonLatLine]) -> BezPath {
        let mut path = BezPath::new();
        for line in lines {
            self.push_open(&mut path, line.iter().copied());
        }
        path
    }

    /// The closed outline of the globe for `graticule`'s major extent.
    ///
    /// The outline is traced in the rotated frame, so it follows the seam rather than the
    /// unrotated ±180° meridian.
    pub fn sphere(&self, graticule: &Graticule) -> BezPath {
        let mut path = BezPath::new();
        let mut points = graticule
            .outline()
            .into_iter()
            .map(|(lon, lat)| self.projection.project_unrotated(lon, lat));
        if let Some(first) = points.next() {
            path.move_to(first);
            for p in points {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }

    fn push_geometry(&self, path: &mut BezPath, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::Line(line) => {
                self.push_open(path, [coord(line.start), coord(line.end)].into_iter());
            }
            Geometry::LineString(ls) => self.push_line_string(path, ls),
            Geometry::MultiLineString(mls) => {
                for ls in &mls.0 {
                    self.push_line_string(path, ls);
                }
            }
            Geometry::Polygon(polygon) => self.push_polygon(path, polygon),
            Geometry::MultiPolygon(mp) => {
                for polygon in &mp.0 {
                    self.push_polygon(path, polygon);
                }
            }
            Geometry::Rect(rect) => self.push_polygon(path, &rect.to_polygon()),
            Geometry::Triangle(triangle) => self.push_polygon(path, &triangle.to_polygon()),
            Geometry::GeometryCollection(gc) => {
                for g in &gc.0 {
                    self.push_geometry(path, g);
                }
            }
        }
    }

    fn push_line_string(&self, path: &mut BezPath, ls: &LineString<f64>) {
        self.push_open(path, ls.coords().map(|c| coord(*c)));
    }

    fn push_polygon(&self, path: &mut BezPath, polygon: &Polygon<f64>) {
        self.push_ring(path, polygon.exterior());
        for interior in polygon.interiors() {
            self.push_ring(path, interior);
        }
    }

    fn push_ring(&self, path: &mut BezPath, ring: &LineString<f64>) {
        let mut coords = ring.coords();
        // GeoJSON rings repeat the first coordinate at the end; `close_path` covers it.
        let n = if ring.is_closed() {
            ring.0.len().saturating_sub(1)
        } else {
            ring.0.len()
        };
        if n < 3 {
            return;
        }
        if let Some(first) = coords.next() {
            path.move_to(self.projection.project(first.x, first.y));
            for c in coords.take(n - 1) {
                path.line_to(self.projection.project(c.x, c.y));
            }
            path.close_path();
        }
    }

    fn push_open(&self, path: &mut BezPath, coords: impl Iterator<Item = (f64, f64)>) {
        let mut previous: Option<f64> = None;
        for (lon, lat) in coords {
            let (lambda, _) = self.projection.rotated(lon, lat);
            let p = self.projection.project(lon, lat);
            match previous {
                Some(prev) if (lambda - prev).abs() <= PI => path.line_to(p),
                _ => path.move_to(p),
            }
            previous = Some(lambda);
        }
    }
}

fn coord(c: Coord<f64>) -> (f64, f64) {
    (c.x, c.y)
}
