// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic data for the county views.
//!
//! This crate owns everything that happens before a view is drawn:
//!
//! - [`Record`]s read from CSV, with [`parse_number`] for lenient numeric cells.
//! - The [`AttributeCatalog`] of displayable attributes and their size domains.
//! - [`FeatureCollection`]s converted from GeoJSON.
//! - [`join_records`], which attaches record values to features by key.
//! - The [`ConicEqualArea`] projection, the [`Graticule`], and [`GeoPath`] for turning all of the
//!   above into `kurbo` paths.
//! - [`load_all`], which reads the three inputs concurrently.

mod catalog;
mod error;
mod feature;
mod graticule;
mod join;
mod load;
mod path;
mod projection;
mod record;

pub use catalog::{Attribute, AttributeCatalog, AttributeId};
pub use error::{CatalogError, LoadError};
pub use feature::{Feature, FeatureCollection, GeometryError, Properties};
pub use graticule::{Graticule, LonLatLine};
pub use join::{JoinReport, join_records};
pub use load::{
    LoadedData, ReadError, SourcePaths, load_all, load_features, load_records, parse_features,
    read_records,
};
pub use path::GeoPath;
pub use projection::ConicEqualArea;
pub use record::{Record, parse_number};
