// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading the records table and the two boundary collections.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use geojson::GeoJson;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::feature::FeatureCollection;
use crate::record::Record;

/// Where the three inputs live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourcePaths {
    /// County records (CSV with a header row).
    pub records: PathBuf,
    /// County boundaries (GeoJSON).
    pub counties: PathBuf,
    /// Context boundaries drawn behind the counties (GeoJSON).
    pub background: PathBuf,
    /// Column of the records file (and property of the counties) holding the join key.
    pub key_column: String,
}

/// Everything the views need, loaded together.
#[derive(Clone, Debug, Default)]
pub struct LoadedData {
    /// County records in file order.
    pub records: Vec<Record>,
    /// County features in file order.
    pub counties: FeatureCollection,
    /// Context features.
    pub background: FeatureCollection,
}

/// Reads CSV records from `reader`.
///
/// Every column is kept as raw text. Rows shorter than the header simply lack the trailing cells.
pub fn read_records<R: Read>(reader: R, key_column: &str) -> Result<Vec<Record>, ReadError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv.headers().map_err(ReadError::Csv)?.clone();
    if !headers.iter().any(|h| h == key_column) {
        return Err(ReadError::MissingKeyColumn);
    }

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row.map_err(ReadError::Csv)?;
        let record = Record::from_pairs(key_column, headers.iter().zip(row.iter()));
        if record.key().is_empty() {
            warn!(line = row.position().map(csv::Position::line), "record without a key");
        }
        records.push(record);
    }
    Ok(records)
}

/// Why [`read_records`] failed, before a path is attached.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Malformed CSV.
    #[error("malformed CSV")]
    Csv(#[source] csv::Error),
    /// The header has no key column.
    #[error("key column not found")]
    MissingKeyColumn,
}

/// Loads the records file at `path`.
pub fn load_records(path: &Path, key_column: &str) -> Result<Vec<Record>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let records = read_records(BufReader::new(file), key_column).map_err(|e| match e {
        ReadError::Csv(source) => LoadError::Csv {
            path: path.to_owned(),
            source,
        },
        ReadError::MissingKeyColumn => LoadError::MissingKeyColumn {
            column: key_column.to_owned(),
            path: path.to_owned(),
        },
    })?;
    info!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Parses GeoJSON text into features.
pub fn parse_features(text: &str, path: &Path) -> Result<FeatureCollection, LoadError> {
    let geojson: GeoJson = text.parse().map_err(|source| LoadError::GeoJson {
        path: path.to_owned(),
        source: Box::new(source),
    })?;
    FeatureCollection::from_geojson(geojson).map_err(|e| LoadError::Geometry {
        path: path.to_owned(),
        index: e.index,
        source: Box::new(e.source),
    })
}

/// Loads a GeoJSON file at `path`.
pub fn load_features(path: &Path) -> Result<FeatureCollection, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let features = parse_features(&text, path)?;
    info!(path = %path.display(), count = features.len(), "loaded features");
    Ok(features)
}

/// Loads all three inputs concurrently.
///
/// Succeeds only if every load succeeds; the first error (records, then counties, then background)
/// is returned otherwise.
pub fn load_all(paths: &SourcePaths) -> Result<LoadedData, LoadError> {
    let (records, (counties, background)) = rayon::join(
        || load_records(&paths.records, &paths.key_column),
        || {
            rayon::join(
                || load_features(&paths.counties),
                || load_features(&paths.background),
            )
        },
    );
    Ok(LoadedData {
        records: records?,
        counties: counties?,
        background: background?,
    })
}
