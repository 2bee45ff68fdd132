// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attaching record values to features.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::catalog::AttributeCatalog;
use crate::feature::Feature;
use crate::record::Record;

/// Outcome of [`join_records`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Records that found a feature.
    pub matched: usize,
    /// Keys of records with no feature.
    pub unmatched_records: Vec<String>,
    /// Features that no record matched.
    pub unmatched_features: usize,
}

/// Writes every catalog attribute of each record into the feature with the same key.
///
/// Keys compare exactly (case-sensitive) against the feature property `key_field`. For each match
/// the feature gains `record.value(attribute)` (NaN for non-numeric cells) under each attribute
/// name. Records without a feature are skipped and features without a record stay untouched;
/// neither is an error.
pub fn join_records(
    features: &mut [Feature],
    records: &[Record],
    key_field: &str,
    catalog: &AttributeCatalog,
) -> JoinReport {
    let mut by_key: HashMap<String, Vec<usize>> = HashMap::with_capacity(features.len());
    for (i, f) in features.iter().enumerate() {
        if let Some(key) = f.key(key_field) {
            by_key.entry(key).or_default().push(i);
        }
    }
    for (key, idx) in &by_key {
        if idx.len() > 1 {
            warn!(key = %key, count = idx.len(), "duplicate feature key; all copies receive the record");
        }
    }

    let mut report = JoinReport::default();
    let mut touched = vec![false; features.len()];
    for record in records {
        let Some(targets) = by_key.get(record.key()) else {
            debug!(key = record.key(), "record has no matching feature");
            report.unmatched_records.push(record.key().to_owned());
            continue;
        };
        report.matched += 1;
        for &i in targets {
            touched[i] = true;
            let props = &mut features[i].properties;
            for (_, attribute) in catalog.iter() {
                props.set_value(attribute.name(), record.value(attribute.name()));
            }
        }
    }
    report.unmatched_features = touched.iter().filter(|t| !**t).count();

    info!(
        matched = report.matched,
        unmatched_records = report.unmatched_records.len(),
        unmatched_features = report.unmatched_features,
        "joined records to features"
    );
    report
}

#[cfg(test)]
mod tests {
    use geojson::JsonObject;

    use super::*;
    use crate::feature::Properties;

    fn feature(key: &str) -> Feature {
        let mut fields = JsonObject::new();
        fields.insert("COUNTY".into(), key.into());
        Feature::new(None, Properties::new(fields))
    }

    fn record(key: &str, labor: &str, rate: &str) -> Record {
        Record::from_pairs(
            "COUNTY",
            [
                ("COUNTY", key),
                ("Labor Force", labor),
                ("Employed", "10"),
                ("Unemployed", "1"),
                ("Unemployed Rate", rate),
                ("Population", "20"),
            ],
        )
    }

    #[test]
    fn matched_features_receive_every_attribute() {
        let catalog = AttributeCatalog::employment();
        let mut features = vec![feature("Knox"), feature("Waldo")];
        let records = vec![record("Knox", "21000", "3.9"), record("Waldo", "19000", "x")];
        let report = join_records(&mut features, &records, "COUNTY", &catalog);

        assert_eq!(report.matched, 2);
        for (f, r) in features.iter().zip(&records) {
            for (_, a) in catalog.iter() {
                let joined = f.properties.value(a.name());
                let expected = r.value(a.name());
                assert!(
                    joined == expected || (joined.is_nan() && expected.is_nan()),
                    "{} mismatch",
                    a.name()
                );
            }
        }
        assert!(features[1].properties.value("Unemployed Rate").is_nan());
        assert!(features[1].properties.has_value("Unemployed Rate"));
    }

    #[test]
    fn misses_are_reported_not_fatal() {
        let catalog = AttributeCatalog::employment();
        let mut features = vec![feature("Knox"), feature("Oxford")];
        let records = vec![record("Knox", "1", "1"), record("knox", "2", "2")];
        let report = join_records(&mut features, &records, "COUNTY", &catalog);

        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched_records, vec!["knox".to_owned()]);
        assert_eq!(report.unmatched_features, 1);
        assert!(features[1].properties.values().is_empty());
    }

    #[test]
    fn empty_inputs_join_trivially() {
        let catalog = AttributeCatalog::employment();
        let report = join_records(&mut [], &[], "COUNTY", &catalog);
        assert_eq!(report, JoinReport::default());
    }
}
