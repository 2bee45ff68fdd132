// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales.
//!
//! [`ScaleLinear`] maps a continuous domain onto screen coordinates (bar heights, axis ticks).
//! [`ScaleQuantile`] maps values onto a discrete range (color classes) by rank in a sample.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Specification for a linear scale (domain only, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// Values outside the domain extrapolate; NaN stays NaN.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }

    /// Returns the spacing between the values of [`ScaleLinear::ticks`].
    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count)
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self { domain }
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.domain, range)
    }
}

// Error thresholds between the 1-2-5 step multiples: sqrt(50), sqrt(10), sqrt(2).
const E10: f64 = 7.0710678118654755;
const E5: f64 = 3.1622776601683795;
const E2: f64 = 1.4142135623730951;

/// Integer tick indices `i1..=i2` and the increment they are multiplied by.
///
/// A negative increment means "divide by `-inc`", which keeps sub-unit steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powi(clamp_i32(power));
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (i1, i2, inc) = if power < 0.0 {
        let inv = 10_f64.powi(clamp_i32(-power)) / factor;
        let mut i1 = (start * inv).round();
        let mut i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        (i1, i2, -inv)
    } else {
        let inc = 10_f64.powi(clamp_i32(power)) * factor;
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        (i1, i2, inc)
    };
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

fn clamp_i32(v: f64) -> i32 {
    #[allow(clippy::cast_possible_truncation, reason = "clamped to a small exponent range")]
    {
        v.clamp(-300.0, 300.0) as i32
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    let reverse = max < min;
    if reverse {
        core::mem::swap(&mut min, &mut max);
    }
    let Some((i1, i2, inc)) = tick_spec(min, max, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0).min(10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "non-negative and capped at 10k"
    )]
    let n = n as usize;
    let mut ticks: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

fn tick_step(min: f64, max: f64, count: usize) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    match tick_spec(lo, hi, count as f64) {
        Some((_, _, inc)) if inc < 0.0 => 1.0 / -inc,
        Some((_, _, inc)) => inc,
        None => 0.0,
    }
}

/// A quantile scale: sorts a sample and splits it into equally populated classes.
///
/// With `k` range entries the scale computes `k - 1` thresholds at the quantiles `i / k`
/// (linear interpolation between closest ranks). A value maps to the class whose index is the
/// number of thresholds less than or equal to it. NaN values are left out of the sample and map to
/// no class.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleQuantile<T> {
    domain: Vec<f64>,
    thresholds: Vec<f64>,
    range: Vec<T>,
}

impl<T> ScaleQuantile<T> {
    /// Fits the scale to `sample`, splitting it into `range.len()` classes.
    pub fn new(sample: impl IntoIterator<Item = f64>, range: Vec<T>) -> Self {
        let mut domain: Vec<f64> = sample.into_iter().filter(|v| !v.is_nan()).collect();
        domain.sort_by(f64::total_cmp);
        let k = range.len();
        let thresholds = if domain.is_empty() || k < 2 {
            Vec::new()
        } else {
            (1..k)
                .map(|i| quantile_sorted(&domain, i as f64 / k as f64))
                .collect()
        };
        Self {
            domain,
            thresholds,
            range,
        }
    }

    /// The sorted, NaN-free sample the scale was fitted to.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Class boundaries, ascending.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// The class outputs.
    pub fn range(&self) -> &[T] {
        &self.range
    }

    /// Returns the class index of `x`.
    ///
    /// NaN, an empty sample, or an empty range yield `None`.
    pub fn class_of(&self, x: f64) -> Option<usize> {
        if x.is_nan() || self.domain.is_empty() || self.range.is_empty() {
            return None;
        }
        Some(self.thresholds.partition_point(|t| *t <= x))
    }

    /// Maps `x` onto its class output.
    pub fn map(&self, x: f64) -> Option<&T> {
        self.class_of(x).and_then(|i| self.range.get(i))
    }
}

/// Quantile `p` of an ascending slice using linear interpolation between closest ranks.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if p <= 0.0 || n < 2 {
        return sorted[0];
    }
    if p >= 1.0 {
        return sorted[n - 1];
    }
    let i = (n - 1) as f64 * p;
    let i0_f = i.floor();
    #[allow(clippy::cast_possible_truncation, reason = "0 <= i0 < n - 1")]
    let i0 = i0_f as usize;
    let v0 = sorted[i0];
    let v1 = sorted[i0 + 1];
    v0 + (v1 - v0) * (i - i0_f)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn linear_maps_endpoints_to_range() {
        let s = ScaleLinearSpec::new((0.0, 200_000.0)).instantiate((463.0, 0.0));
        assert_eq!(s.map(0.0), 463.0);
        assert_eq!(s.map(200_000.0), 0.0);
        assert!((s.map(100_000.0) - 231.5).abs() < 1e-9);
        assert!(s.map(f64::NAN).is_nan());
    }

    #[test]
    fn ticks_use_one_two_five_steps() {
        let ticks = ScaleLinear::new((0.0, 200_000.0), (0.0, 1.0)).ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[1], 20_000.0);

        let ticks = ScaleLinear::new((0.0, 325_000.0), (0.0, 1.0)).ticks(10);
        assert_eq!(ticks, vec![0.0, 50_000.0, 100_000.0, 150_000.0, 200_000.0, 250_000.0, 300_000.0]);

        let ticks = ScaleLinear::new((0.0, 5_500.0), (0.0, 1.0)).ticks(10);
        assert_eq!(ticks.len(), 12);
        assert_eq!(*ticks.last().unwrap(), 5_500.0);
    }

    #[test]
    fn fractional_ticks_are_exact() {
        let s = ScaleLinear::new((0.0, 0.8), (0.0, 1.0));
        let ticks = s.ticks(10);
        assert_eq!(ticks[3], 0.3);
        assert!((s.tick_step(10) - 0.1).abs() < 1e-12);

        let s = ScaleLinear::new((0.0, 8.0), (0.0, 1.0));
        assert_eq!(s.ticks(10), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(s.tick_step(10), 1.0);
    }

    #[test]
    fn degenerate_tick_domains() {
        assert_eq!(ScaleLinear::new((3.0, 3.0), (0.0, 1.0)).ticks(10), vec![3.0]);
        assert!(ScaleLinear::new((0.0, 1.0), (0.0, 1.0)).ticks(0).is_empty());
        let reversed = ScaleLinear::new((10.0, 0.0), (0.0, 1.0)).ticks(5);
        assert_eq!(reversed.first(), Some(&10.0));
    }

    #[test]
    fn quantile_thresholds_interpolate_between_ranks() {
        let s = ScaleQuantile::new([1.0, 2.0, 3.0, 4.0, 5.0], vec!['a', 'b', 'c', 'd', 'e']);
        let expected = [1.8, 2.6, 3.4, 4.2];
        assert_eq!(s.thresholds().len(), expected.len());
        for (t, e) in s.thresholds().iter().zip(expected) {
            assert!((t - e).abs() < 1e-9, "threshold {t} != {e}");
        }
        assert_eq!(s.map(1.0), Some(&'a'));
        assert_eq!(s.map(2.0), Some(&'b'));
        assert_eq!(s.map(5.0), Some(&'e'));
        assert_eq!(s.map(100.0), Some(&'e'));
        assert_eq!(s.map(-100.0), Some(&'a'));
    }

    #[test]
    fn quantile_boundary_values_go_up() {
        let s = ScaleQuantile::new([0.0, 10.0], vec![0, 1]);
        assert_eq!(s.thresholds(), &[5.0]);
        assert_eq!(s.class_of(5.0), Some(1));
        assert_eq!(s.class_of(4.999), Some(0));
    }

    #[test]
    fn quantile_ignores_nan() {
        let s = ScaleQuantile::new([3.0, f64::NAN, 1.0, 2.0], vec![0, 1, 2]);
        assert_eq!(s.domain(), &[1.0, 2.0, 3.0]);
        assert_eq!(s.map(f64::NAN), None);

        let empty = ScaleQuantile::new([f64::NAN], vec![0, 1]);
        assert!(empty.domain().is_empty());
        assert_eq!(empty.map(1.0), None);
    }

    #[test]
    fn quantile_with_identical_values_uses_last_class() {
        let s = ScaleQuantile::new([7.0, 7.0, 7.0], vec![0, 1, 2, 3, 4]);
        assert_eq!(s.map(7.0), Some(&4));
    }
}
