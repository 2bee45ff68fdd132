// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based interpolation for animated attributes.
//!
//! Times are plain `f64` milliseconds on a caller-supplied clock. An [`Animated`] value is
//! evaluated lazily with [`Animated::value_at`]; nothing ticks in the background.

use kurbo::Rect;
use peniko::Color;

/// Linear interpolation between two values of the same type.
pub trait Lerp: Clone {
    /// Returns the value `t` of the way from `self` to `to` (`t` in `[0, 1]`).
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        mix(*self, *to, t)
    }
}

impl Lerp for Rect {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self::new(
            mix(self.x0, to.x0, t),
            mix(self.y0, to.y0, t),
            mix(self.x1, to.x1, t),
            mix(self.y1, to.y1, t),
        )
    }
}

impl Lerp for Color {
    /// Interpolates in 8-bit sRGB, channel by channel.
    fn lerp(&self, to: &Self, t: f64) -> Self {
        let a = self.to_rgba8();
        let b = to.to_rgba8();
        Self::from_rgba8(
            channel(a.r, b.r, t),
            channel(a.g, b.g, t),
            channel(a.b, b.b, t),
            channel(a.a, b.a, t),
        )
    }
}

fn channel(a: u8, b: u8, t: f64) -> u8 {
    let v = mix(f64::from(a), f64::from(b), t).clamp(0.0, 255.0) + 0.5;
    #[allow(
        clippy::cast_possible_truncation,
        reason = "clamped to the u8 range before the cast"
    )]
    {
        v as u8
    }
}

/// Easing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Ease {
    /// Maps linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Segment<T> {
    from: T,
    to: T,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl<T: Lerp> Segment<T> {
    fn value_at(&self, now: f64) -> T {
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to.clone();
        }
        if now <= self.start {
            return self.from.clone();
        }
        let t = self.ease.apply((now - self.start) / self.duration);
        self.from.lerp(&self.to, t)
    }
}

/// A value that may be transitioning between two states.
///
/// Retargeting interrupts the running transition: the new transition starts (after its delay)
/// from whatever the old one displays at that moment, and until then the old one keeps running.
#[derive(Clone, Debug, PartialEq)]
pub struct Animated<T> {
    segment: Segment<T>,
    previous: Option<Segment<T>>,
}

impl<T: Lerp> Animated<T> {
    /// A value at rest.
    pub fn settled(value: T) -> Self {
        Self {
            segment: Segment {
                from: value.clone(),
                to: value,
                start: 0.0,
                duration: 0.0,
                ease: Ease::default(),
            },
            previous: None,
        }
    }

    /// The value displayed at time `now`.
    pub fn value_at(&self, now: f64) -> T {
        match &self.previous {
            Some(prev) if now < self.segment.start => prev.value_at(now),
            _ => self.segment.value_at(now),
        }
    }

    /// The value this animation ends at.
    pub fn target(&self) -> &T {
        &self.segment.to
    }

    /// Returns `true` once the value has reached its target.
    pub fn is_settled(&self, now: f64) -> bool {
        now >= self.segment.start + self.segment.duration
    }

    /// Time at which the current transition completes.
    pub fn end_time(&self) -> f64 {
        self.segment.start + self.segment.duration.max(0.0)
    }

    /// Starts a transition towards `to`, beginning `delay` ms after `now`.
    ///
    /// A transition that has not started by `now` is cancelled; what is on screen until the new
    /// one starts is whatever was running before it.
    pub fn retarget(&mut self, to: T, now: f64, delay: f64, duration: f64, ease: Ease) {
        if now < self.segment.start {
            self.segment = match self.previous.take() {
                Some(running) => running,
                None => {
                    let shown = self.segment.from.clone();
                    Segment {
                        from: shown.clone(),
                        to: shown,
                        start: now,
                        duration: 0.0,
                        ease: Ease::default(),
                    }
                }
            };
        }
        let start = now + delay.max(0.0);
        let from = self.value_at(start);
        let next = Segment {
            from,
            to,
            start,
            duration: duration.max(0.0),
            ease,
        };
        self.previous = Some(core::mem::replace(&mut self.segment, next));
    }

    /// Jumps to `value` with no transition.
    pub fn jump_to(&mut self, value: T) {
        *self = Self::settled(value);
    }
}
