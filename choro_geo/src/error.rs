// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use std::path::PathBuf;

/// Failure to load one of the input datasets.
///
/// Loading is all-or-nothing: any of these aborts the pipeline before a view is built.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {path}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The records file is not valid CSV.
    #[error("failed to parse CSV records in {path}")]
    Csv {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },
    /// The records file has no column with the join key.
    #[error("key column `{column}` not found in {path}")]
    MissingKeyColumn {
        /// Expected column name.
        column: String,
        /// Offending file.
        path: PathBuf,
    },
    /// The boundary file is not valid GeoJSON.
    #[error("failed to parse GeoJSON in {path}")]
    GeoJson {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<geojson::Error>,
    },
    /// A GeoJSON geometry could not be converted into a planar geometry.
    #[error("feature {index} in {path} has an unsupported geometry")]
    Geometry {
        /// Offending file.
        path: PathBuf,
        /// Index of the feature within the collection.
        index: usize,
        /// Underlying error.
        #[source]
        source: Box<geojson::Error>,
    },
}

/// An invalid attribute catalog or lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A catalog needs at least one attribute.
    #[error("the attribute catalog is empty")]
    Empty,
    /// Two attributes share a name.
    #[error("attribute `{0}` is listed more than once")]
    Duplicate(String),
    /// The name is not in the catalog.
    #[error("unknown attribute `{0}`")]
    Unknown(String),
}
