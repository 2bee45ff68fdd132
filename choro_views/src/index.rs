// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-view lookup from a county key to every element that shows it.

use std::sync::Arc;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// One drawable element, by panel and position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementHandle {
    /// A county shape on the map (index into the map's shapes).
    MapShape(usize),
    /// A bar on the chart (index into the chart's bars, in record order).
    ChartBar(usize),
}

/// County key to element handles.
///
/// A key normally owns one map shape and one bar, so the handles are stored inline.
#[derive(Clone, Debug, Default)]
pub struct ElementIndex {
    by_key: HashMap<Arc<str>, SmallVec<[ElementHandle; 2]>>,
}

impl ElementIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under `key`. Empty keys are not indexed.
    pub fn insert(&mut self, key: &Arc<str>, handle: ElementHandle) {
        if key.is_empty() {
            return;
        }
        let handles = self.by_key.entry(Arc::clone(key)).or_default();
        if !handles.contains(&handle) {
            handles.push(handle);
        }
    }

    /// All elements tagged with `key`, in registration order.
    pub fn get(&self, key: &str) -> &[ElementHandle] {
        self.by_key.get(key).map(|h| h.as_slice()).unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether no key is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_collect_handles_from_both_panels() {
        let mut index = ElementIndex::new();
        let knox: Arc<str> = Arc::from("Knox");
        index.insert(&knox, ElementHandle::MapShape(3));
        index.insert(&knox, ElementHandle::ChartBar(0));
        index.insert(&knox, ElementHandle::ChartBar(0));
        index.insert(&Arc::from(""), ElementHandle::MapShape(9));

        assert_eq!(
            index.get("Knox"),
            &[ElementHandle::MapShape(3), ElementHandle::ChartBar(0)]
        );
        assert!(index.get("knox").is_empty());
        assert_eq!(index.len(), 1);
    }
}
