// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graticule generation: meridians, parallels, and the outline of the globe.
//!
//! Lines are produced in degrees, sampled densely enough that they bend correctly once
//! projected. Major lines span the full globe; minor lines stop short of the poles.

const EPSILON: f64 = 1e-6;

/// A `(longitude, latitude)` polyline in degrees.
pub type LonLatLine = Vec<(f64, f64)>;

/// Graticule parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Graticule {
    /// Extent of major lines: `((lon0, lat0), (lon1, lat1))`.
    pub extent_major: ((f64, f64), (f64, f64)),
    /// Extent of minor lines.
    pub extent_minor: ((f64, f64), (f64, f64)),
    /// Spacing of major meridians and parallels.
    pub step_major: (f64, f64),
    /// Spacing of minor meridians and parallels.
    pub step_minor: (f64, f64),
    /// Sampling interval along each line, in degrees.
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            extent_major: ((-180.0, -90.0 + EPSILON), (180.0, 90.0 - EPSILON)),
            extent_minor: ((-180.0, -80.0 - EPSILON), (180.0, 80.0 + EPSILON)),
            step_major: (90.0, 360.0),
            step_minor: (10.0, 10.0),
            precision: 2.5,
        }
    }
}

impl Graticule {
    /// A graticule with the default 10° minor step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minor step `(longitude, latitude)`.
    pub fn with_step(mut self, dx: f64, dy: f64) -> Self {
        self.step_minor = (dx, dy);
        self
    }

    /// Sets the sampling interval.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// All graticule lines: major meridians, major parallels, then the minor ones that do not
    /// coincide with a major line.
    pub fn lines(&self) -> Vec<LonLatLine> {
        let ((big_x0, big_y0), (big_x1, big_y1)) = self.extent_major;
        let ((x0, y0), (x1, y1)) = self.extent_minor;
        let (big_dx, big_dy) = self.step_major;
        let (dx, dy) = self.step_minor;
        let p = self.precision;

        let mut out = Vec::new();
        for x in range((big_x0 / big_dx).ceil() * big_dx, big_x1, big_dx) {
            out.push(meridian(x, big_y0, big_y1, p));
        }
        for y in range((big_y0 / big_dy).ceil() * big_dy, big_y1, big_dy) {
            out.push(parallel(y, big_x0, big_x1, p));
        }
        for x in range((x0 / dx).ceil() * dx, x1, dx) {
            if (x % big_dx).abs() > EPSILON {
                out.push(meridian(x, y0, y1, p));
            }
        }
        for y in range((y0 / dy).ceil() * dy, y1, dy) {
            if (y % big_dy).abs() > EPSILON {
                out.push(parallel(y, x0, x1, p));
            }
        }
        out
    }

    /// The closed outline of the major extent, for filling the background of the globe.
    pub fn outline(&self) -> LonLatLine {
        let ((x0, y0), (x1, y1)) = self.extent_major;
        let p = self.precision;
        let mut ring = meridian(x0, y0, y1, p);
        ring.extend(parallel(y1, x0, x1, p).into_iter().skip(1));
        let mut east = meridian(x1, y0, y1, p);
        east.reverse();
        ring.extend(east.into_iter().skip(1));
        let mut south = parallel(y0, x0, x1, p);
        south.reverse();
        ring.extend(south.into_iter().skip(1));
        ring
    }
}

/// `start, start + step, ...` strictly below `stop`.
fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step.is_nan() || step <= 0.0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil().max(0.0);
    #[allow(clippy::cast_possible_truncation, reason = "bounded by the 360° extent")]
    let n = n.min(100_000.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Samples between `a` and `b` every `step`, always ending exactly on `b`.
fn samples(a: f64, b: f64, step: f64) -> Vec<f64> {
    let mut v = range(a, b - EPSILON, step);
    v.push(b);
    v
}

fn meridian(lon: f64, lat0: f64, lat1: f64, precision: f64) -> LonLatLine {
    samples(lat0, lat1, precision)
        .into_iter()
        .map(|lat| (lon, lat))
        .collect()
}

fn parallel(lat: f64, lon0: f64, lon1: f64, precision: f64) -> LonLatLine {
    samples(lon0, lon1, precision)
        .into_iter()
        .map(|lon| (lon, lat))
        .collect()
}
