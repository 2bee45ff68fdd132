// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing rendered frames to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use choro_views::{Coordinator, SvgScene};
use tracing::info;

/// Retained SVG copies of both panels, flushed to files on demand.
#[derive(Debug)]
pub(crate) struct Output {
    dir: PathBuf,
    map: SvgScene,
    chart: SvgScene,
}

impl Output {
    pub(crate) fn new(dir: &Path, coordinator: &Coordinator) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            map: SvgScene::new(coordinator.map().frame()).with_class("map"),
            chart: SvgScene::new(coordinator.chart().frame()).with_class("chart"),
        })
    }

    /// Advances both panels to `now` and writes `map{suffix}.svg`, `chart{suffix}.svg` and
    /// `index{suffix}.html`.
    pub(crate) fn write(&mut self, coordinator: &mut Coordinator, now: f64, suffix: &str) -> Result<()> {
        let frame = coordinator.frame(now);
        self.map.apply_diffs(&frame.map);
        self.chart.apply_diffs(&frame.chart);

        let map_svg = self.map.to_svg_string();
        let chart_svg = self.chart.to_svg_string();
        let html = coordinator.page(&map_svg, &chart_svg).to_html_string();

        self.write_file(&format!("map{suffix}.svg"), &map_svg)?;
        self.write_file(&format!("chart{suffix}.svg"), &chart_svg)?;
        self.write_file(&format!("index{suffix}.html"), &html)?;
        info!(
            now,
            frame = frame.index,
            dir = %self.dir.display(),
            map_changes = frame.map.len(),
            chart_changes = frame.chart.len(),
            "wrote snapshot"
        );
        Ok(())
    }

    fn write_file(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use choro_geo::{FeatureCollection, LoadedData, Record, parse_features};
    use choro_views::ViewConfig;

    use super::*;

    #[test]
    fn snapshot_files_carry_both_panels() {
        let counties = parse_features(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"COUNTY": "Knox"},
                 "geometry": {"type": "Polygon", "coordinates": [[[-69.4,44.0],[-68.9,44.0],[-68.9,44.4],[-69.4,44.0]]]}}
            ]}"#,
            Path::new("counties.json"),
        )
        .unwrap();
        let data = LoadedData {
            records: vec![Record::from_pairs(
                "COUNTY",
                [("COUNTY", "Knox"), ("Labor Force", "21000")],
            )],
            counties,
            background: FeatureCollection::default(),
        };
        let mut coordinator = Coordinator::new(data, &ViewConfig::default()).unwrap();

        let dir = std::env::temp_dir().join(format!("choro-output-{}", std::process::id()));
        let mut output = Output::new(&dir, &coordinator).unwrap();
        output.write(&mut coordinator, 0.0, "-0").unwrap();

        let html = fs::read_to_string(dir.join("index-0.html")).unwrap();
        assert!(html.contains(r#"<svg xmlns="http://www.w3.org/2000/svg" class="map""#));
        assert!(html.contains(r#"class="chart""#));
        let chart = fs::read_to_string(dir.join("chart-0.svg")).unwrap();
        assert!(chart.contains(r#"data-key="Knox""#));
        assert!(chart.contains("Number of Labor Force in each County"));
        assert!(dir.join("map-0.svg").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
