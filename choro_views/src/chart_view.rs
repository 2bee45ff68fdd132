// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ranked bar chart panel.

use std::sync::Arc;

use choro_charts::{
    AxisSpec, AxisStyle, BarMarkSpec, PLOT_BACKGROUND, PLOT_FRAME, RectMarkSpec, ScaleLinear,
    ScaleLinearSpec, TitleSpec, rank_descending,
};
use choro_core::{Animated, Ease, Mark, MarkId, StrokeStyle, StyleMemo};
use choro_geo::{AttributeCatalog, AttributeId, Record};
use kurbo::{Point, Rect};
use peniko::Color;

use crate::config::ViewConfig;
use crate::interaction::StrokeTarget;
use crate::state::AppState;

/// Id namespace of bars.
pub const BAR_NAMESPACE: u32 = 2;

const BACKGROUND_ID: MarkId = MarkId::from_raw(10);
const FRAME_ID: MarkId = MarkId::from_raw(11);
const TITLE_ID: MarkId = MarkId::from_raw(12);
const AXIS_ID_BASE: u64 = 100;

/// One county's bar.
#[derive(Clone, Debug)]
pub struct ChartBar {
    key: Arc<str>,
    row: u32,
    values: Vec<f64>,
    rect: Animated<Rect>,
    fill: Animated<Color>,
    stroke: StrokeStyle,
    memo: StyleMemo,
}

impl ChartBar {
    /// County key.
    pub fn key(&self) -> &Arc<str> {
        &self.key
    }

    /// Value of `attribute`; NaN when the cell is not numeric.
    pub fn value(&self, attribute: AttributeId) -> f64 {
        self.values
            .get(attribute.index())
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Geometry at time `now`.
    pub fn rect_at(&self, now: f64) -> Rect {
        self.rect.value_at(now)
    }

    /// Geometry the running transition ends at.
    pub fn target_rect(&self) -> Rect {
        *self.rect.target()
    }

    /// Fill at time `now`.
    pub fn fill_at(&self, now: f64) -> Color {
        self.fill.value_at(now)
    }

    /// Fill the running transition ends at.
    pub fn target_fill(&self) -> Color {
        *self.fill.target()
    }
}

impl StrokeTarget for ChartBar {
    fn stroke(&self) -> &StrokeStyle {
        &self.stroke
    }

    fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.stroke = stroke;
    }

    fn memo(&self) -> &StyleMemo {
        &self.memo
    }
}

/// One bar per record, ranked by the expressed attribute, with a left axis and a title.
#[derive(Clone, Debug)]
pub struct ChartView {
    frame: Rect,
    plot: Rect,
    bars: Vec<ChartBar>,
    order: Vec<usize>,
    title: String,
    size_domain: (f64, f64),
    gap: f64,
    tick_count: usize,
    title_position: Point,
    title_font_size: f64,
    background: Color,
    frame_stroke: Color,
    text: Color,
    duration: f64,
    stagger: f64,
}

impl ChartView {
    /// Lays out one bar per record for the state's expressed attribute, with no transition.
    pub fn new(
        config: &ViewConfig,
        catalog: &AttributeCatalog,
        records: &[Record],
        state: &AppState,
    ) -> Self {
        let c = &config.chart;
        let width = config.chart_width();
        let plot = Rect::new(
            c.left_padding,
            c.top_bottom_padding,
            width - c.right_padding,
            c.height - c.top_bottom_padding,
        );
        let stroke = StrokeStyle::none();
        let bars = records
            .iter()
            .enumerate()
            .map(|(row, record)| ChartBar {
                key: Arc::from(record.key()),
                row: u32::try_from(row).unwrap_or(u32::MAX),
                values: catalog.iter().map(|(_, a)| record.value(a.name())).collect(),
                rect: Animated::settled(Rect::ZERO),
                fill: Animated::settled(state.no_data()),
                stroke: stroke.clone(),
                memo: StyleMemo::record(stroke.clone()),
            })
            .collect();

        let mut view = Self {
            frame: Rect::new(0.0, 0.0, width, c.height),
            plot,
            bars,
            order: (0..records.len()).collect(),
            title: String::new(),
            size_domain: state.size_scale().domain(),
            gap: c.bar_gap,
            tick_count: c.tick_count,
            title_position: Point::new(c.title_position[0], c.title_position[1]),
            title_font_size: c.title_font_size,
            background: config.colors.chart_background.color(),
            frame_stroke: config.colors.chart_frame.color(),
            text: config.colors.text.color(),
            duration: config.transitions.bar_ms,
            stagger: config.transitions.bar_stagger_ms,
        };
        view.relayout(state, None);
        view
    }

    /// Panel bounds.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Plot area inside the paddings.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// Bars in record order.
    pub fn bars(&self) -> &[ChartBar] {
        &self.bars
    }

    /// Mutable access to one bar, for highlighting.
    pub fn bar_mut(&mut self, index: usize) -> Option<&mut ChartBar> {
        self.bars.get_mut(index)
    }

    /// Bar indices in display order, left to right.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// County keys in display order.
    pub fn display_keys(&self) -> Vec<&str> {
        self.order.iter().map(|&i| &*self.bars[i].key).collect()
    }

    /// Time at which the last bar finishes moving and recoloring.
    pub fn settled_at(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.rect.end_time().max(b.fill.end_time()))
            .fold(0.0, f64::max)
    }

    /// Current title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Re-ranks, resizes and recolors the bars for the state's attribute.
    ///
    /// Each bar moves over the bar duration after a delay of its new rank times the stagger.
    /// The axis and title switch immediately.
    pub fn restyle(&mut self, state: &AppState, now: f64) {
        self.relayout(state, Some(now));
    }

    fn relayout(&mut self, state: &AppState, now: Option<f64>) {
        let attribute = state.expressed();
        self.size_domain = state.size_scale().domain();
        self.title = format!("Number of {} in each County", state.expressed_name());

        let bars = &self.bars;
        rank_descending(&mut self.order, |i| bars[i].value(attribute));

        let spec = self.bar_spec();
        let n = self.order.len();
        for (rank, &i) in self.order.iter().enumerate() {
            let bar = &mut self.bars[i];
            let value = bar.value(attribute);
            let rect = spec.bar_rect(rank, n, value);
            let fill = state.fill_for(value);
            match now {
                Some(now) => {
                    let delay = rank as f64 * self.stagger;
                    bar.rect
                        .retarget(rect, now, delay, self.duration, Ease::CubicInOut);
                    bar.fill
                        .retarget(fill, now, delay, self.duration, Ease::CubicInOut);
                }
                None => {
                    bar.rect.jump_to(rect);
                    bar.fill.jump_to(fill);
                }
            }
        }
    }

    fn y_scale(&self) -> ScaleLinear {
        ScaleLinear::new(self.size_domain, (self.plot.y1, self.plot.y0))
    }

    fn bar_spec(&self) -> BarMarkSpec {
        BarMarkSpec::new(BAR_NAMESPACE, self.plot, self.y_scale()).with_gap(self.gap)
    }

    fn axis(&self) -> AxisSpec {
        let rule = StrokeStyle::solid(self.text, 1.0);
        AxisSpec::left(AXIS_ID_BASE, ScaleLinearSpec::new(self.size_domain))
            .with_tick_count(self.tick_count)
            .with_style(AxisStyle {
                rule,
                label_fill: self.text.into(),
                label_font_size: 10.0,
            })
    }

    /// The bar under `point` at time `now`.
    pub fn hit_test(&self, point: Point, now: f64) -> Option<usize> {
        self.bars.iter().position(|b| {
            let r = b.rect_at(now);
            r.height() > 0.0 && r.contains(point)
        })
    }

    /// Marks for the panel at time `now`.
    pub fn marks(&self, now: f64) -> Vec<Mark> {
        let spec = self.bar_spec();
        let mut out = Vec::with_capacity(self.bars.len() + 32);
        out.push(
            RectMarkSpec::new(BACKGROUND_ID, self.plot)
                .with_fill(self.background)
                .with_z_index(PLOT_BACKGROUND)
                .mark(),
        );
        for bar in &self.bars {
            out.push(spec.mark(
                bar.row,
                bar.rect_at(now),
                bar.fill_at(now),
                &bar.stroke,
                &bar.key,
            ));
        }
        out.push(
            RectMarkSpec::new(FRAME_ID, self.plot)
                .with_fill(Color::TRANSPARENT)
                .with_stroke(StrokeStyle::solid(self.frame_stroke, 1.0))
                .with_z_index(PLOT_FRAME)
                .mark(),
        );
        out.extend(self.axis().marks(self.plot));
        out.push(
            TitleSpec::new(TITLE_ID, self.title.clone())
                .at(self.title_position.x, self.title_position.y)
                .with_font_size(self.title_font_size)
                .with_fill(self.text)
                .mark(),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use choro_core::{MarkKind, MarkPayload};

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

    fn chart(recs: &[Record]) -> (ChartView, AppState, ViewConfig) {
        let config = ViewConfig::default();
        let catalog = config.catalog().unwrap();
        let state = AppState::new(
            catalog.clone(),
            config.palette(),
            config.colors.no_data.color(),
            463.0,
            recs,
        )
        .unwrap();
        (ChartView::new(&config, &catalog, recs, &state), state, config)
    }

    #[test]
    fn plot_follows_the_paddings() {
        let (view, _, config) = chart(&[]);
        let plot = view.plot();
        assert_eq!(plot.x0, 38.0);
        assert_eq!(plot.y0, 5.0);
        assert_eq!(plot.height(), 463.0);
        assert!((plot.width() - (config.chart_width() - 40.0)).abs() < 1e-9);
    }

    #[test]
    fn bars_are_ranked_and_sized_from_the_start() {
        let recs = records(&[("A", "100000", "2"), ("B", "50000", "5"), ("C", "200000", "1")]);
        let (view, _, _) = chart(&recs);
        assert_eq!(view.display_keys(), ["C", "A", "B"]);

        let slot = view.plot().width() / 3.0;
        let c = view.bars()[2].rect_at(0.0);
        assert_eq!(c.x0, 38.0);
        assert!((c.width() - (slot - 1.0)).abs() < 1e-9);
        assert!((c.y0 - 5.0).abs() < 1e-9, "full-domain bar reaches the top");
        assert!((c.height() - 463.0).abs() < 1e-9);

        let a = view.bars()[0].rect_at(0.0);
        assert!((a.x0 - (38.0 + slot)).abs() < 1e-9);
        assert!((a.height() - 231.5).abs() < 1e-9);
        assert_eq!(view.title(), "Number of Labor Force in each County");
    }

    #[test]
    fn restyle_staggers_by_rank() {
        let recs = records(&[("A", "100000", "2"), ("B", "50000", "5"), ("C", "200000", "1")]);
        let (mut view, mut state, _) = chart(&recs);
        let rate = state.catalog().lookup("Unemployed Rate").unwrap();
        state.express(rate, &recs);
        view.restyle(&state, 1000.0);

        assert_eq!(view.display_keys(), ["B", "A", "C"]);
        assert_eq!(view.title(), "Number of Unemployed Rate in each County");
        // A is ranked second: it waits 20ms, then takes 500ms.
        let a = &view.bars()[0];
        let before = a.rect_at(0.0);
        assert_eq!(a.rect_at(1020.0), before);
        assert_ne!(a.rect_at(1200.0), before);
        assert_eq!(a.rect_at(1520.0), a.target_rect());
        // C is ranked last (index 2): delay 40ms.
        let c = &view.bars()[2];
        assert_eq!(c.rect_at(1040.0), c.rect_at(0.0));
        assert_eq!(c.target_rect().x0, view.plot().x0 + 2.0 * view.plot().width() / 3.0);
        assert_eq!(view.settled_at(), 1540.0);
    }

    #[test]
    fn non_numeric_values_rank_last_with_flat_no_data_bars() {
        let recs = records(&[("A", "x", "2"), ("B", "10", "5")]);
        let (view, state, _) = chart(&recs);
        assert_eq!(view.display_keys(), ["B", "A"]);
        let a = &view.bars()[0];
        assert_eq!(a.rect_at(0.0).height(), 0.0);
        assert_eq!(a.rect_at(0.0).y1, view.plot().y1);
        assert_eq!(a.fill_at(0.0), state.no_data());
        assert_eq!(view.hit_test(Point::new(a.rect_at(0.0).x0 + 1.0, view.plot().y1), 0.0), None);
    }

    #[test]
    fn marks_include_guides_and_tagged_bars() {
        let recs = records(&[("A", "100000", "2"), ("B", "50000", "5")]);
        let (view, _, _) = chart(&recs);
        let marks = view.marks(0.0);
        let bars: Vec<_> = marks
            .iter()
            .filter(|m| m.tag.is_some() && m.kind() == MarkKind::Rect)
            .collect();
        assert_eq!(bars.len(), 2);
        assert!(marks.iter().any(|m| matches!(
            &m.payload,
            MarkPayload::Text(t) if t.text == "Number of Labor Force in each County"
        )));
        assert!(marks.iter().any(|m| matches!(
            &m.payload,
            MarkPayload::Text(t) if t.text == "200,000"
        )));
    }
}
