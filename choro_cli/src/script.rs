// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed user events replayed against a [`Coordinator`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use choro_views::{Coordinator, Panel};
use kurbo::Point;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PanelName {
    Map,
    Chart,
}

impl From<PanelName> for Panel {
    fn from(name: PanelName) -> Self {
        match name {
            PanelName::Map => Self::Map,
            PanelName::Chart => Self::Chart,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum Action {
    /// Pick an attribute from the dropdown.
    Select { attribute: String },
    /// Move the pointer to a panel-local position.
    Pointer { panel: PanelName, x: f64, y: f64 },
    /// Move the pointer off every element.
    Leave,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub(crate) struct Event {
    pub(crate) at: f64,
    #[serde(flatten)]
    pub(crate) action: Action,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub(crate) struct Script {
    #[serde(default)]
    pub(crate) events: Vec<Event>,
    #[serde(default)]
    pub(crate) snapshots: Vec<f64>,
}

impl Script {
    pub(crate) fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("failed to parse script {}", path.display()))
    }

    pub(crate) fn from_toml(content: &str) -> Result<Self> {
        let mut script: Self = toml::from_str(content)?;
        script.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        script.snapshots.sort_by(f64::total_cmp);
        Ok(script)
    }

    /// Applies events in time order, calling `snapshot` at each snapshot time after every event at
    /// or before it.
    pub(crate) fn play(
        &self,
        coordinator: &mut Coordinator,
        mut snapshot: impl FnMut(&mut Coordinator, f64) -> Result<()>,
    ) -> Result<()> {
        let mut events = self.events.iter().peekable();
        for &time in &self.snapshots {
            while let Some(event) = events.next_if(|e| e.at <= time) {
                apply(coordinator, event)?;
            }
            snapshot(coordinator, time)?;
        }
        for event in events {
            apply(coordinator, event)?;
        }
        Ok(())
    }
}

fn apply(coordinator: &mut Coordinator, event: &Event) -> Result<()> {
    debug!(at = event.at, action = ?event.action, "script event");
    match &event.action {
        Action::Select { attribute } => coordinator
            .select_attribute_by_name(attribute, event.at)
            .with_context(|| format!("event at {} ms", event.at))?,
        Action::Pointer { panel, x, y } => {
            coordinator.pointer_at((*panel).into(), Point::new(*x, *y), event.at);
        }
        Action::Leave => coordinator.pointer_leave(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use choro_geo::{FeatureCollection, LoadedData, Record, parse_features};
    use choro_views::ViewConfig;

    use super::*;

    const SCRIPT: &str = r#"
        snapshots = [2000, 0, 1000]

        [[events]]
        at = 1500
        kind = "leave"

        [[events]]
        at = 0
        kind = "select"
        attribute = "Population"

        [[events]]
        at = 100
        kind = "pointer"
        panel = "chart"
        x = 60
        y = 450
    "#;

    fn coordinator() -> Coordinator {
        let counties = parse_features(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"COUNTY": "Knox"},
                 "geometry": {"type": "Polygon", "coordinates": [[[-69.4,44.0],[-68.9,44.0],[-68.9,44.4],[-69.4,44.0]]]}}
            ]}"#,
            Path::new("counties.json"),
        )
        .unwrap();
        let records = vec![Record::from_pairs(
            "COUNTY",
            [("COUNTY", "Knox"), ("Labor Force", "21000"), ("Population", "39000")],
        )];
        let data = LoadedData {
            records,
            counties,
            background: FeatureCollection::default(),
        };
        Coordinator::new(data, &ViewConfig::default()).unwrap()
    }

    #[test]
    fn events_and_snapshots_are_sorted() {
        let script = Script::from_toml(SCRIPT).unwrap();
        assert_eq!(script.snapshots, [0.0, 1000.0, 2000.0]);
        let times: Vec<f64> = script.events.iter().map(|e| e.at).collect();
        assert_eq!(times, [0.0, 100.0, 1500.0]);
        assert_eq!(
            script.events[1].action,
            Action::Pointer {
                panel: PanelName::Chart,
                x: 60.0,
                y: 450.0
            }
        );
    }

    #[test]
    fn snapshots_see_events_up_to_their_time() {
        let script = Script::from_toml(SCRIPT).unwrap();
        let mut c = coordinator();
        let mut seen = Vec::new();
        script
            .play(&mut c, |c, t| {
                seen.push((t, c.state().expressed_name().to_owned(), c.hovered().is_some()));
                Ok(())
            })
            .unwrap();
        assert_eq!(
            seen,
            [
                (0.0, "Population".to_owned(), false),
                (1000.0, "Population".to_owned(), true),
                (2000.0, "Population".to_owned(), false)
            ]
        );
    }

    #[test]
    fn unknown_attributes_fail_the_run() {
        let script = Script::from_toml(
            "[[events]]\nat = 5\nkind = \"select\"\nattribute = \"Median Income\"\n",
        )
        .unwrap();
        let mut c = coordinator();
        assert!(script.play(&mut c, |_, _| Ok(())).is_err());
    }
}
