// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single piece of shared view state: which attribute is expressed, and its scales.

use choro_charts::{ScaleLinear, ScaleQuantile};
use choro_geo::{AttributeCatalog, AttributeId, Record};
use peniko::Color;
use tracing::{info, warn};

use crate::error::ViewError;

/// Expressed attribute plus the scales derived from it.
///
/// The attribute and both scales are only ever replaced together, by [`AppState::express`], so a
/// renderer holding `&AppState` always sees a consistent triple.
#[derive(Clone, Debug)]
pub struct AppState {
    catalog: AttributeCatalog,
    expressed: AttributeId,
    size: ScaleLinear,
    color: ScaleQuantile<Color>,
    palette: Vec<Color>,
    no_data: Color,
    inner_height: f64,
}

impl AppState {
    /// Creates the state with the catalog's first attribute expressed.
    pub fn new(
        catalog: AttributeCatalog,
        palette: Vec<Color>,
        no_data: Color,
        inner_height: f64,
        records: &[Record],
    ) -> Result<Self, ViewError> {
        if palette.is_empty() {
            return Err(ViewError::EmptyPalette);
        }
        let first = catalog.first();
        let mut state = Self {
            size: ScaleLinear::new(catalog.get(first).size_domain(), (inner_height, 0.0)),
            color: ScaleQuantile::new(core::iter::empty::<f64>(), palette.clone()),
            catalog,
            expressed: first,
            palette,
            no_data,
            inner_height,
        };
        state.express(first, records);
        Ok(state)
    }

    /// Makes `id` the expressed attribute and rebuilds both scales.
    ///
    /// The size scale takes the attribute's fixed domain. The color scale is refitted to the
    /// attribute's value in every record.
    pub fn express(&mut self, id: AttributeId, records: &[Record]) {
        let attribute = self.catalog.get(id);
        let name = attribute.name();
        self.size = ScaleLinear::new(attribute.size_domain(), (self.inner_height, 0.0));
        self.color = ScaleQuantile::new(records.iter().map(|r| r.value(name)), self.palette.clone());
        if self.color.domain().is_empty() && !records.is_empty() {
            warn!(attribute = name, "no record has a numeric value");
        }
        self.expressed = id;
        info!(
            attribute = name,
            values = self.color.domain().len(),
            "expressed attribute"
        );
    }

    /// The attribute catalog.
    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// The expressed attribute.
    pub fn expressed(&self) -> AttributeId {
        self.expressed
    }

    /// Name of the expressed attribute.
    pub fn expressed_name(&self) -> &str {
        self.catalog.name(self.expressed)
    }

    /// Bar size scale, mapping the attribute domain onto `[inner height, 0]`.
    pub fn size_scale(&self) -> &ScaleLinear {
        &self.size
    }

    /// Quantile color scale.
    pub fn color_scale(&self) -> &ScaleQuantile<Color> {
        &self.color
    }

    /// The no-data color.
    pub fn no_data(&self) -> Color {
        self.no_data
    }

    /// Fill for `value`: its quantile class color, or the no-data color for NaN.
    pub fn fill_for(&self, value: f64) -> Color {
        self.color.map(value).copied().unwrap_or(self.no_data)
    }
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;

    use super::*;

    fn records(rows: &[(&str, &str, &str)]) -> Vec<Record> {
        rows.iter()
            .map(|(k, labor, rate)| {
                Record::from_pairs(
                    "COUNTY",
                    [("COUNTY", *k), ("Labor Force", *labor), ("Unemployed Rate", *rate)],
                )
            })
            .collect()
    }

    fn palette() -> Vec<Color> {
        vec![css::RED, css::GREEN, css::BLUE]
    }

    #[test]
    fn starts_on_first_attribute_with_its_domain() {
        let recs = records(&[("A", "10", "1"), ("B", "20", "2"), ("C", "30", "3")]);
        let state =
            AppState::new(AttributeCatalog::employment(), palette(), css::GRAY, 463.0, &recs)
                .unwrap();
        assert_eq!(state.expressed_name(), "Labor Force");
        assert_eq!(state.size_scale().domain(), (0.0, 200_000.0));
        assert_eq!(state.size_scale().range(), (463.0, 0.0));
        assert_eq!(state.color_scale().domain(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn express_replaces_attribute_and_both_scales() {
        let recs = records(&[("A", "10", "1.5"), ("B", "20", "x"), ("C", "30", "0.5")]);
        let mut state =
            AppState::new(AttributeCatalog::employment(), palette(), css::GRAY, 463.0, &recs)
                .unwrap();
        let rate = state.catalog().lookup("Unemployed Rate").unwrap();
        state.express(rate, &recs);
        assert_eq!(state.expressed(), rate);
        assert_eq!(state.size_scale().domain(), (0.0, 8.0));
        assert_eq!(state.color_scale().domain(), &[0.5, 1.5]);
        assert_eq!(state.fill_for(f64::NAN), css::GRAY);
        assert_eq!(state.fill_for(0.5), css::RED);
        assert_eq!(state.fill_for(1.5), css::BLUE);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let err = AppState::new(AttributeCatalog::employment(), vec![], css::GRAY, 463.0, &[])
            .unwrap_err();
        assert_eq!(err, ViewError::EmptyPalette);
    }

    #[test]
    fn no_records_means_everything_is_no_data() {
        let state =
            AppState::new(AttributeCatalog::employment(), palette(), css::GRAY, 463.0, &[])
                .unwrap();
        assert_eq!(state.fill_for(5.0), css::GRAY);
    }
}
