// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene state and mark diffing.

extern crate alloc;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Rect;

use crate::mark::{Mark, MarkId, MarkKind, MarkPayload};

/// A change between two successive frames of a scene.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark appeared.
    Enter {
        /// Mark identity.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// Element key, if any.
        tag: Option<Arc<str>>,
        /// New payload.
        new: Box<MarkPayload>,
        /// New bounds (if known).
        bounds: Option<Rect>,
    },
    /// A mark changed payload or paint order.
    Update {
        /// Mark identity.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Previous paint order.
        old_z_index: i32,
        /// New paint order.
        new_z_index: i32,
        /// Element key, if any.
        tag: Option<Arc<str>>,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
        /// Previous bounds (if known).
        old_bounds: Option<Rect>,
        /// New bounds (if known).
        new_bounds: Option<Rect>,
    },
    /// A mark disappeared.
    Exit {
        /// Mark identity.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Last known bounds (if known).
        bounds: Option<Rect>,
    },
}

impl MarkDiff {
    /// Returns the id of the mark this diff refers to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

#[derive(Clone, Debug)]
struct Retained {
    z_index: i32,
    tag: Option<Arc<str>>,
    payload: MarkPayload,
}

/// The last frame of marks seen by a consumer.
///
/// [`Scene::tick`] takes the complete mark list for a frame and returns the diffs against the
/// previous frame. Unchanged marks produce no diff.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Retained>,
    frame: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marks retained from the last frame.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` when no marks are retained.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Number of frames processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the retained payload for `id`.
    pub fn get(&self, id: MarkId) -> Option<&MarkPayload> {
        self.marks.get(&id).map(|r| &r.payload)
    }

    /// Replaces the scene with `marks` and returns what changed.
    ///
    /// Enter and update diffs follow the order of `marks`; exits follow, sorted by id. When the
    /// same id appears twice the later mark wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        self.frame += 1;
        let mut diffs = Vec::new();
        let mut seen: HashSet<MarkId> = HashSet::with_capacity(self.marks.len());

        for mark in marks {
            let Mark {
                id,
                z_index,
                tag,
                payload,
            } = mark;
            seen.insert(id);
            match self.marks.get_mut(&id) {
                Some(prev) => {
                    if prev.z_index == z_index && prev.payload == payload && prev.tag == tag {
                        continue;
                    }
                    let old = core::mem::replace(&mut prev.payload, payload.clone());
                    let old_z_index = core::mem::replace(&mut prev.z_index, z_index);
                    prev.tag.clone_from(&tag);
                    diffs.push(MarkDiff::Update {
                        id,
                        kind: payload.kind(),
                        old_z_index,
                        new_z_index: z_index,
                        tag,
                        old_bounds: old.bounds(),
                        new_bounds: payload.bounds(),
                        old: Box::new(old),
                        new: Box::new(payload),
                    });
                }
                None => {
                    diffs.push(MarkDiff::Enter {
                        id,
                        kind: payload.kind(),
                        z_index,
                        tag: tag.clone(),
                        bounds: payload.bounds(),
                        new: Box::new(payload.clone()),
                    });
                    self.marks.insert(
                        id,
                        Retained {
                            z_index,
                            tag,
                            payload,
                        },
                    );
                }
            }
        }

        let mut gone: Vec<MarkId> = self
            .marks
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        gone.sort_unstable();
        for id in gone {
            if let Some(prev) = self.marks.remove(&id) {
                diffs.push(MarkDiff::Exit {
                    id,
                    kind: prev.payload.kind(),
                    bounds: prev.payload.bounds(),
                });
            }
        }

        diffs
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use peniko::color::palette::css;

    use super::*;

    fn bar(id: u64, height: f64) -> Mark {
        Mark::builder(MarkId(id))
            .rect()
            .x(0.0)
            .y(0.0)
            .w(10.0)
            .h(height)
            .fill(css::BLACK)
            .build()
    }

    #[test]
    fn first_tick_enters_everything() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar(1, 5.0), bar(2, 6.0)]);
        assert_eq!(diffs.len(), 2);
        assert!(matches!(diffs[0], MarkDiff::Enter { id: MarkId(1), .. }));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.frame(), 1);
    }

    #[test]
    fn unchanged_marks_produce_no_diffs() {
        let mut scene = Scene::new();
        scene.tick(vec![bar(1, 5.0)]);
        let diffs = scene.tick(vec![bar(1, 5.0)]);
        assert!(diffs.is_empty(), "identical frame should not diff");
    }

    #[test]
    fn changed_and_removed_marks_are_reported() {
        let mut scene = Scene::new();
        scene.tick(vec![bar(1, 5.0), bar(2, 6.0), bar(3, 7.0)]);
        let diffs = scene.tick(vec![bar(1, 9.0), bar(2, 6.0)]);
        assert_eq!(diffs.len(), 2);
        match &diffs[0] {
            MarkDiff::Update {
                id,
                old_bounds,
                new_bounds,
                ..
            } => {
                assert_eq!(*id, MarkId(1));
                assert_eq!(*old_bounds, Some(Rect::new(0.0, 0.0, 10.0, 5.0)));
                assert_eq!(*new_bounds, Some(Rect::new(0.0, 0.0, 10.0, 9.0)));
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert_eq!(diffs[1].id(), MarkId(3));
        assert!(matches!(diffs[1], MarkDiff::Exit { .. }));
        assert!(scene.get(MarkId(3)).is_none());
    }

    #[test]
    fn tag_changes_count_as_updates() {
        let mut scene = Scene::new();
        scene.tick(vec![bar(1, 5.0)]);
        let mut tagged = bar(1, 5.0);
        tagged.tag = Some(Arc::from("Lincoln"));
        let diffs = scene.tick(vec![tagged]);
        assert!(matches!(&diffs[0], MarkDiff::Update { tag: Some(t), .. } if &**t == "Lincoln"));
    }
}
