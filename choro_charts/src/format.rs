// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.

extern crate alloc;

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats a tick value with thousands separators and just enough decimals for `step`.
///
/// `step = 20000` gives `"120,000"`; `step = 0.5` gives `"2.5"`.
pub fn format_tick_with_step(value: f64, step: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let precision = precision_for_step(step);
    let raw = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut out = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    let negative = value < 0.0 && raw.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    if negative {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn precision_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    // Nudge so exact powers of ten (0.1, 0.01) never land just below an integer.
    let e = -(step.log10() + 1e-9).floor();
    if e <= 0.0 {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "positive and capped at 20 decimals"
    )]
    {
        e.min(20.0) as usize
    }
}
