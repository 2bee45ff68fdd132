// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for building and driving the views.

use choro_geo::CatalogError;

use crate::index::ElementHandle;

/// Failure to configure or drive the coordinated views.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    /// An attribute catalog problem, including selection of an unknown attribute.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A color string is neither `#RGB` nor `#RRGGBB`.
    #[error("invalid color `{0}`: expected #RGB or #RRGGBB")]
    InvalidColor(String),
    /// The color palette has no entries.
    #[error("the color palette is empty")]
    EmptyPalette,
    /// A pointer event named an element that does not exist.
    #[error("no element {0:?}")]
    UnknownElement(ElementHandle),
}
