// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conic equal-area (Albers) projection.
//!
//! Longitudes and latitudes are in degrees. A point is first rotated on the sphere, then
//! projected with the conic equal-area formulas for two standard parallels, then scaled,
//! flipped so north is up, and translated so the configured center lands on the translate
//! point.

use std::f64::consts::PI;

use kurbo::Point;

const EPSILON: f64 = 1e-6;

/// Builder-style Albers projection.
#[derive(Clone, Debug, PartialEq)]
pub struct ConicEqualArea {
    center: (f64, f64),
    rotate: (f64, f64, f64),
    parallels: (f64, f64),
    scale: f64,
    translate: (f64, f64),
    derived: Derived,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Derived {
    raw: Raw,
    rotation: Rotation,
    center_x: f64,
    center_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Raw {
    Conic { n: f64, c: f64, r0: f64 },
    // Both parallels symmetric about the equator.
    Cylindrical { cos_phi0: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rotation {
    lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
    tilted: bool,
}

impl Default for ConicEqualArea {
    fn default() -> Self {
        Self::albers()
    }
}

impl ConicEqualArea {
    /// The lower-48 Albers defaults: parallels 29.5°/45.5°, rotate 96°, center (-0.6°, 38.7°),
    /// scale 1070, translate (480, 250).
    pub fn albers() -> Self {
        Self::build((-0.6, 38.7), (96.0, 0.0, 0.0), (29.5, 45.5), 1070.0, (480.0, 250.0))
    }

    fn build(
        center: (f64, f64),
        rotate: (f64, f64, f64),
        parallels: (f64, f64),
        scale: f64,
        translate: (f64, f64),
    ) -> Self {
        let raw = Raw::new(parallels.0.to_radians(), parallels.1.to_radians());
        let rotation = Rotation::new(rotate);
        let (center_x, center_y) = raw.forward(center.0.to_radians(), center.1.to_radians());
        Self {
            center,
            rotate,
            parallels,
            scale,
            translate,
            derived: Derived {
                raw,
                rotation,
                center_x,
                center_y,
            },
        }
    }

    fn rebuild(self) -> Self {
        Self::build(
            self.center,
            self.rotate,
            self.parallels,
            self.scale,
            self.translate,
        )
    }

    /// Sets the projection center (in the rotated frame) as `(longitude, latitude)`.
    pub fn with_center(mut self, lon: f64, lat: f64) -> Self {
        self.center = (lon, lat);
        self.rebuild()
    }

    /// Sets the spherical rotation `(lambda, phi, gamma)` in degrees.
    pub fn with_rotate(mut self, lambda: f64, phi: f64, gamma: f64) -> Self {
        self.rotate = (lambda, phi, gamma);
        self.rebuild()
    }

    /// Sets the two standard parallels.
    pub fn with_parallels(mut self, phi0: f64, phi1: f64) -> Self {
        self.parallels = (phi0, phi1);
        self.rebuild()
    }

    /// Sets the scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the pixel position of the projection center.
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    /// The configured scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The configured translate point.
    pub fn translate(&self) -> Point {
        Point::new(self.translate.0, self.translate.1)
    }

    /// Projects `(longitude, latitude)` in degrees to pixels.
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let (lambda, phi) = self.rotated(lon, lat);
        self.project_radians(lambda, phi)
    }

    /// Projects a point already expressed in the rotated frame, skipping the rotation.
    ///
    /// The outline of the globe is drawn this way so that it follows the seam at ±180° of the
    /// rotated frame.
    pub fn project_unrotated(&self, lon: f64, lat: f64) -> Point {
        self.project_radians(lon.to_radians(), lat.to_radians())
    }

    /// Rotated `(lambda, phi)` in radians, lambda wrapped to `[-PI, PI]`.
    pub(crate) fn rotated(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.derived
            .rotation
            .apply(lon.to_radians(), lat.to_radians())
    }

    fn project_radians(&self, lambda: f64, phi: f64) -> Point {
        let d = &self.derived;
        let (x, y) = d.raw.forward(lambda, phi);
        Point::new(
            self.translate.0 + self.scale * (x - d.center_x),
            self.translate.1 - self.scale * (y - d.center_y),
        )
    }
}

impl Raw {
    fn new(y0: f64, y1: f64) -> Self {
        let sy0 = y0.sin();
        let n = (sy0 + y1.sin()) / 2.0;
        if n.abs() < EPSILON {
            return Self::Cylindrical { cos_phi0: y0.cos() };
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Self::Conic {
            n,
            c,
            r0: c.sqrt() / n,
        }
    }

    fn forward(self, lambda: f64, phi: f64) -> (f64, f64) {
        match self {
            Self::Conic { n, c, r0 } => {
                let r = (c - 2.0 * n * phi.sin()).max(0.0).sqrt() / n;
                let a = lambda * n;
                (r * a.sin(), r0 - r * a.cos())
            }
            Self::Cylindrical { cos_phi0 } => (lambda * cos_phi0, phi.sin() / cos_phi0),
        }
    }
}

impl Rotation {
    fn new((lambda, phi, gamma): (f64, f64, f64)) -> Self {
        let (phi, gamma) = (phi.to_radians(), gamma.to_radians());
        Self {
            lambda: lambda.to_radians(),
            cos_phi: phi.cos(),
            sin_phi: phi.sin(),
            cos_gamma: gamma.cos(),
            sin_gamma: gamma.sin(),
            tilted: phi != 0.0 || gamma != 0.0,
        }
    }

    fn apply(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let mut lambda = lambda + self.lambda;
        if lambda > PI {
            lambda -= 2.0 * PI;
        } else if lambda < -PI {
            lambda += 2.0 * PI;
        }
        if !self.tilted {
            return (lambda, phi);
        }
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        (
            (y * self.cos_gamma - k * self.sin_gamma).atan2(x * self.cos_phi - z * self.sin_phi),
            (k * self.cos_gamma + y * self.sin_gamma).clamp(-1.0, 1.0).asin(),
        )
    }
}
