// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring between the attribute selector, both panels and the tooltip.

use std::sync::Arc;

use choro_charts::HeuristicTextMeasurer;
use choro_core::{MarkDiff, Scene, StrokeStyle};
use choro_geo::{AttributeId, JoinReport, LoadedData, Record, join_records};
use kurbo::{Point, Vec2};
use tracing::{debug, info};

use crate::chart_view::ChartView;
use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::html::Page;
use crate::index::{ElementHandle, ElementIndex};
use crate::interaction::{Tooltip, TooltipLayout, dehighlight, highlight};
use crate::map_view::MapView;
use crate::state::AppState;

/// One of the two side-by-side panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    /// The choropleth map, at the left edge of the page.
    Map,
    /// The bar chart, directly right of the map.
    Chart,
}

/// Diffs for both panels produced by one [`Coordinator::frame`] call.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Number of frames built so far, this one included.
    pub index: u64,
    /// Map panel diffs.
    pub map: Vec<MarkDiff>,
    /// Chart panel diffs.
    pub chart: Vec<MarkDiff>,
}

impl Frame {
    /// Whether neither panel changed.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty() && self.chart.is_empty()
    }
}

/// Owns the application state and both views, and routes user input between them.
///
/// Times are milliseconds on a caller-supplied clock. Positions passed to the pointer methods are
/// page coordinates unless noted.
#[derive(Debug)]
pub struct Coordinator {
    records: Vec<Record>,
    state: AppState,
    map: MapView,
    chart: ChartView,
    index: ElementIndex,
    layout: TooltipLayout,
    measurer: HeuristicTextMeasurer,
    highlight: StrokeStyle,
    tooltip: Option<Tooltip>,
    hovered: Option<Arc<str>>,
    map_scene: Scene,
    chart_scene: Scene,
    join_report: JoinReport,
}

impl Coordinator {
    /// Joins `data`, fits the scales to the first attribute and builds both panels.
    pub fn new(data: LoadedData, config: &ViewConfig) -> Result<Self, ViewError> {
        let LoadedData {
            records,
            mut counties,
            background,
        } = data;
        let catalog = config.catalog()?;
        let join_report = join_records(&mut counties.features, &records, &config.key_field, &catalog);

        let inner_height = config.chart.height - 2.0 * config.chart.top_bottom_padding;
        let state = AppState::new(
            catalog.clone(),
            config.palette(),
            config.colors.no_data.color(),
            inner_height,
            &records,
        )?;
        let map = MapView::new(config, &catalog, &counties, &background, &state);
        let chart = ChartView::new(config, &catalog, &records, &state);

        let mut index = ElementIndex::new();
        for (i, shape) in map.shapes().iter().enumerate() {
            index.insert(shape.key(), ElementHandle::MapShape(i));
        }
        for (i, bar) in chart.bars().iter().enumerate() {
            index.insert(bar.key(), ElementHandle::ChartBar(i));
        }
        info!(
            shapes = map.shapes().len(),
            bars = chart.bars().len(),
            keys = index.len(),
            "built coordinated views"
        );

        Ok(Self {
            records,
            state,
            map,
            chart,
            index,
            layout: TooltipLayout::new(config.tooltip.clone(), config.viewport_width),
            measurer: HeuristicTextMeasurer,
            highlight: StrokeStyle::solid(
                config.colors.highlight.color(),
                config.colors.highlight_width,
            ),
            tooltip: None,
            hovered: None,
            map_scene: Scene::new(),
            chart_scene: Scene::new(),
            join_report,
        })
    }

    /// Current selection and scales.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The map panel.
    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// The chart panel.
    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    /// Key to element lookup.
    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    /// The visible tooltip, if a county is hovered.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Key of the hovered county.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// How the records matched the county features.
    pub fn join_report(&self) -> &JoinReport {
        &self.join_report
    }

    /// Expresses `id`: refits the scales, recolors the map and re-sorts the chart.
    ///
    /// Selecting the already expressed attribute retargets every element to where it already is.
    pub fn select_attribute(&mut self, id: AttributeId, now: f64) {
        self.state.express(id, &self.records);
        self.map.restyle(&self.state, now);
        self.chart.restyle(&self.state, now);

        if let Some(mut tooltip) = self.tooltip.take() {
            let value = self.value_of(tooltip.key(), id);
            self.layout.refresh(
                &self.measurer,
                &mut tooltip,
                self.state.expressed_name(),
                value,
            );
            self.tooltip = Some(tooltip);
        }
    }

    /// Expresses the attribute called `name`, as chosen from the dropdown.
    pub fn select_attribute_by_name(&mut self, name: &str, now: f64) -> Result<(), ViewError> {
        let id = self.state.catalog().lookup(name)?;
        self.select_attribute(id, now);
        Ok(())
    }

    /// The pointer entered `handle` at page position `pointer`.
    ///
    /// Every element sharing the handle's key is highlighted and the tooltip opens for it.
    pub fn pointer_enter(&mut self, handle: ElementHandle, pointer: Point) -> Result<(), ViewError> {
        let key = self.key_of(handle)?;
        self.enter_key(key, pointer);
        Ok(())
    }

    fn enter_key(&mut self, key: Arc<str>, pointer: Point) {
        if self.hovered.as_deref() == Some(&*key) {
            self.pointer_move(pointer);
            return;
        }
        self.pointer_leave();

        debug!(key = %key, "hover");
        self.set_highlight(&key, true);
        let attribute = self.state.expressed();
        let value = self.value_of(&key, attribute);
        let name = self.name_of(&key);
        self.tooltip = Some(self.layout.open(
            &self.measurer,
            Arc::clone(&key),
            name,
            self.state.expressed_name(),
            value,
            pointer,
        ));
        self.hovered = Some(key);
    }

    /// The pointer moved to `pointer` while over the hovered element.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let Some(tooltip) = &mut self.tooltip {
            self.layout.follow(tooltip, pointer);
        }
    }

    /// The pointer left the hovered element.
    pub fn pointer_leave(&mut self) {
        if let Some(key) = self.hovered.take() {
            self.set_highlight(&key, false);
        }
        self.tooltip = None;
    }

    /// Page offset of a panel's top-left corner.
    pub fn panel_origin(&self, panel: Panel) -> Vec2 {
        match panel {
            Panel::Map => Vec2::ZERO,
            Panel::Chart => Vec2::new(self.map.frame().width(), 0.0),
        }
    }

    /// Routes a pointer position given in `panel`-local coordinates.
    ///
    /// Hit-tests the panel and enters, follows or leaves accordingly. Returns the element under
    /// the pointer.
    pub fn pointer_at(&mut self, panel: Panel, local: Point, now: f64) -> Option<ElementHandle> {
        let hit = match panel {
            Panel::Map => self.map.hit_test(local).and_then(|i| {
                let key = Arc::clone(self.map.shapes().get(i)?.key());
                Some((ElementHandle::MapShape(i), key))
            }),
            Panel::Chart => self.chart.hit_test(local, now).and_then(|i| {
                let key = Arc::clone(self.chart.bars().get(i)?.key());
                Some((ElementHandle::ChartBar(i), key))
            }),
        };
        let page = local + self.panel_origin(panel);
        match hit {
            Some((handle, key)) => {
                self.enter_key(key, page);
                Some(handle)
            }
            None => {
                self.pointer_leave();
                None
            }
        }
    }

    /// Routes a page position to whichever panel lies under it.
    pub fn pointer_at_page(&mut self, page: Point, now: f64) -> Option<ElementHandle> {
        let panel = if page.x < self.map.frame().width() {
            Panel::Map
        } else {
            Panel::Chart
        };
        let local = page - self.panel_origin(panel);
        self.pointer_at(panel, local, now)
    }

    /// Time at which every running transition in both panels has finished.
    pub fn settled_at(&self) -> f64 {
        self.map.settled_at().max(self.chart.settled_at())
    }

    /// Builds both panels at time `now` and returns what changed since the last frame.
    pub fn frame(&mut self, now: f64) -> Frame {
        let map = self.map_scene.tick(self.map.marks(now));
        let chart = self.chart_scene.tick(self.chart.marks(now));
        Frame {
            index: self.map_scene.frame(),
            map,
            chart,
        }
    }

    /// The page around already serialized panels.
    pub fn page<'a>(&'a self, map_svg: &'a str, chart_svg: &'a str) -> Page<'a> {
        Page {
            map_svg,
            chart_svg,
            catalog: self.state.catalog(),
            expressed: self.state.expressed(),
            tooltip: self.tooltip.as_ref(),
        }
    }

    fn key_of(&self, handle: ElementHandle) -> Result<Arc<str>, ViewError> {
        let key = match handle {
            ElementHandle::MapShape(i) => self.map.shapes().get(i).map(|s| s.key()),
            ElementHandle::ChartBar(i) => self.chart.bars().get(i).map(|b| b.key()),
        };
        key.cloned().ok_or(ViewError::UnknownElement(handle))
    }

    /// Value from the first element carrying `key`; every element of a key carries the same record.
    fn value_of(&self, key: &str, attribute: AttributeId) -> f64 {
        self.index
            .get(key)
            .iter()
            .find_map(|&h| match h {
                ElementHandle::MapShape(i) => self.map.shapes().get(i).map(|s| s.value(attribute)),
                ElementHandle::ChartBar(i) => self.chart.bars().get(i).map(|b| b.value(attribute)),
            })
            .unwrap_or(f64::NAN)
    }

    fn name_of(&self, key: &str) -> Option<String> {
        self.index.get(key).iter().find_map(|&h| match h {
            ElementHandle::MapShape(i) => self
                .map
                .shapes()
                .get(i)
                .and_then(|s| s.name())
                .map(str::to_owned),
            ElementHandle::ChartBar(_) => None,
        })
    }

    fn set_highlight(&mut self, key: &str, on: bool) {
        for &handle in self.index.get(key) {
            match handle {
                ElementHandle::MapShape(i) => {
                    if let Some(shape) = self.map.shape_mut(i) {
                        if on {
                            highlight(shape, &self.highlight);
                        } else {
                            dehighlight(shape);
                        }
                    }
                }
                ElementHandle::ChartBar(i) => {
                    if let Some(bar) = self.chart.bar_mut(i) {
                        if on {
                            highlight(bar, &self.highlight);
                        } else {
                            dehighlight(bar);
                        }
                    }
                }
            }
        }
    }
}
