// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic features and their properties.

use std::collections::BTreeMap;

use geo::Geometry;
use geojson::{GeoJson, JsonObject, JsonValue};

/// The properties of a feature: the source fields plus joined attribute values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    fields: JsonObject,
    values: BTreeMap<String, f64>,
}

impl Properties {
    /// Wraps source fields; no attribute values are attached yet.
    pub fn new(fields: JsonObject) -> Self {
        Self {
            fields,
            values: BTreeMap::new(),
        }
    }

    /// A source field rendered as text (strings as-is, numbers in JSON notation).
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The raw source field.
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    /// The joined value of `attribute`; NaN when the feature had no matching record.
    pub fn value(&self, attribute: &str) -> f64 {
        self.values.get(attribute).copied().unwrap_or(f64::NAN)
    }

    /// Whether a value was joined for `attribute` (it may still be NaN).
    pub fn has_value(&self, attribute: &str) -> bool {
        self.values.contains_key(attribute)
    }

    /// Attaches a joined value.
    pub fn set_value(&mut self, attribute: impl Into<String>, value: f64) {
        self.values.insert(attribute.into(), value);
    }

    /// Joined values by attribute name.
    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

/// A geographic feature in longitude/latitude degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Geometry, if the source had one.
    pub geometry: Option<Geometry<f64>>,
    /// Source fields and joined values.
    pub properties: Properties,
}

impl Feature {
    /// Creates a feature.
    pub fn new(geometry: Option<Geometry<f64>>, properties: Properties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// The feature's join key, read from `key_field`.
    pub fn key(&self, key_field: &str) -> Option<String> {
        self.properties.text(key_field)
    }
}

/// An ordered list of features.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    /// Features in source order.
    pub features: Vec<Feature>,
}

/// A GeoJSON geometry that has no planar equivalent.
#[derive(Debug)]
pub struct GeometryError {
    /// Index of the offending feature.
    pub index: usize,
    /// Conversion error.
    pub source: geojson::Error,
}

impl FeatureCollection {
    /// Converts parsed GeoJSON into features.
    ///
    /// A `FeatureCollection` maps one-to-one, a lone `Feature` becomes a one-element collection,
    /// and a bare `Geometry` becomes one feature without properties.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, GeometryError> {
        let raw: Vec<(Option<geojson::Geometry>, JsonObject)> = match geojson {
            GeoJson::FeatureCollection(fc) => fc
                .features
                .into_iter()
                .map(|f| (f.geometry, f.properties.unwrap_or_default()))
                .collect(),
            GeoJson::Feature(f) => vec![(f.geometry, f.properties.unwrap_or_default())],
            GeoJson::Geometry(g) => vec![(Some(g), JsonObject::new())],
        };

        let features = raw
            .into_iter()
            .enumerate()
            .map(|(index, (geometry, fields))| {
                let geometry = geometry
                    .map(|g| Geometry::<f64>::try_from(g.value))
                    .transpose()
                    .map_err(|source| GeometryError { index, source })?;
                Ok(Feature::new(geometry, Properties::new(fields)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features })
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_COUNTIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"COUNTY": "Knox", "name": "Knox County"},
             "geometry": {"type": "Polygon", "coordinates": [[[-69,44],[-68,44],[-68,45],[-69,45],[-69,44]]]}},
            {"type": "Feature", "properties": {"COUNTY": 7},
             "geometry": null}
        ]
    }"#;

    #[test]
    fn collection_keeps_fields_and_geometry() {
        let gj: GeoJson = TWO_COUNTIES.parse().unwrap();
        let fc = FeatureCollection::from_geojson(gj).unwrap();
        assert_eq!(fc.len(), 2);
        assert!(matches!(fc.features[0].geometry, Some(Geometry::Polygon(_))));
        assert_eq!(fc.features[0].key("COUNTY").as_deref(), Some("Knox"));
        assert_eq!(
            fc.features[0].properties.text("name").as_deref(),
            Some("Knox County")
        );
        assert_eq!(fc.features[1].key("COUNTY").as_deref(), Some("7"));
        assert!(fc.features[1].geometry.is_none());
    }

    #[test]
    fn bare_geometry_becomes_one_feature() {
        let gj: GeoJson = r#"{"type": "LineString", "coordinates": [[0,0],[1,1]]}"#
            .parse()
            .unwrap();
        let fc = FeatureCollection::from_geojson(gj).unwrap();
        assert_eq!(fc.len(), 1);
        assert!(fc.features[0].key("COUNTY").is_none());
    }

    #[test]
    fn missing_values_read_as_nan() {
        let mut p = Properties::default();
        assert!(p.value("Employed").is_nan());
        assert!(!p.has_value("Employed"));
        p.set_value("Employed", 12.0);
        assert_eq!(p.value("Employed"), 12.0);
        assert!(p.has_value("Employed"));
    }
}
