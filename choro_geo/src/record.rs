// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular county records and lenient number parsing.

use std::collections::BTreeMap;

/// One county's row: a key plus the raw text of every column.
///
/// Cells stay as text; numeric views are produced on demand by [`Record::value`], so a cell that
/// does not parse simply reads as NaN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    key: String,
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Creates a record from its key and its raw cells.
    pub fn new(key: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    /// Builds a record from `(column, cell)` pairs, taking the key from `key_column`.
    ///
    /// A missing key cell yields an empty key, which never matches a feature.
    pub fn from_pairs<K, V>(key_column: &str, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let key = fields.get(key_column).cloned().unwrap_or_default();
        Self { key, fields }
    }

    /// The join key (county name).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw cell for `column`.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// The numeric value of `column`; NaN when absent or not numeric.
    pub fn value(&self, column: &str) -> f64 {
        self.raw(column).map_or(f64::NAN, parse_number)
    }

    /// All cells in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parses the longest numeric prefix of `text`, the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped, then an optional sign and either `Infinity` or a decimal
/// literal (`12`, `12.`, `.5`, `1.5e3`) is read. Trailing garbage is ignored (`"12.5%"` is
/// `12.5`). Anything without a leading number is NaN; hex, thousands separators, and `NaN` itself
/// are not numbers here.
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
