// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinated county views.
//!
//! A [`Coordinator`] holds one [`AppState`] (the expressed attribute and the scales fitted to it)
//! and two panels that read it:
//!
//! - [`MapView`]: county shapes filled from a quantile color scale, over a sphere, a graticule
//!   and context outlines.
//! - [`ChartView`]: one bar per record, sorted descending and sized by a linear scale with a
//!   fixed per-attribute domain.
//!
//! Selecting an attribute refits the scales and retargets every fill and bar. Hovering an
//! element highlights every element with the same county key, found through an
//! [`ElementIndex`], and opens a [`Tooltip`]. Each panel turns into marks that feed a
//! [`choro_core::Scene`]; the resulting diffs drive an [`SvgScene`], and [`Page`] wraps both
//! panels into one HTML document.

mod chart_view;
mod config;
mod coordinator;
mod error;
mod html;
mod index;
mod interaction;
mod map_view;
mod state;
mod svg;

pub use chart_view::{BAR_NAMESPACE, ChartBar, ChartView};
pub use config::{
    AttributeConfig, ChartConfig, ColorConfig, HexColor, MapConfig, TooltipConfig,
    TransitionConfig, ViewConfig,
};
pub use coordinator::{Coordinator, Frame, Panel};
pub use error::ViewError;
pub use html::Page;
pub use index::{ElementHandle, ElementIndex};
pub use interaction::{
    StrokeTarget, Tooltip, TooltipLayout, dehighlight, format_value, highlight,
};
pub use map_view::{MapShape, MapView, SHAPE_NAMESPACE, shape_id};
pub use state::AppState;
pub use svg::{SvgScene, escape_xml};

#[cfg(test)]
mod scenario_tests {
    use std::path::Path;

    use choro_core::StrokeStyle;
    use choro_geo::{FeatureCollection, LoadedData, Record, parse_features, parse_number};
    use kurbo::Point;
    use peniko::Color;

    use super::*;

    const ATTRIBUTES: [&str; 5] = [
        "Labor Force",
        "Employed",
        "Unemployed",
        "Unemployed Rate",
        "Population",
    ];

    const COUNTIES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"COUNTY": "A", "name": "Alpha County"},
         "geometry": {"type": "Polygon", "coordinates": [[[-70.0,45.0],[-69.6,45.0],[-69.6,45.3],[-70.0,45.3],[-70.0,45.0]]]}},
        {"type": "Feature", "properties": {"COUNTY": "B"},
         "geometry": {"type": "Polygon", "coordinates": [[[-69.5,45.0],[-69.1,45.0],[-69.1,45.3],[-69.5,45.3],[-69.5,45.0]]]}},
        {"type": "Feature", "properties": {"COUNTY": "C"},
         "geometry": {"type": "Polygon", "coordinates": [[[-69.0,45.0],[-68.6,45.0],[-68.6,45.3],[-69.0,45.3],[-69.0,45.0]]]}},
        {"type": "Feature", "properties": {"COUNTY": "Oxford"},
         "geometry": {"type": "Polygon", "coordinates": [[[-71.0,44.2],[-70.6,44.2],[-70.6,44.6],[-71.0,44.6],[-71.0,44.2]]]}}
    ]}"#;

    fn record(key: &str, values: [&str; 5]) -> Record {
        let mut pairs = vec![("COUNTY", key)];
        pairs.extend(ATTRIBUTES.iter().copied().zip(values));
        Record::from_pairs("COUNTY", pairs)
    }

    fn scenario_records() -> Vec<Record> {
        vec![
            record("A", ["100", "90", "10", "10%", "1000"]),
            record("B", ["50", "45", "5", "10%", "500"]),
            record("C", ["200", "180", "20", "10%", "2000"]),
        ]
    }

    fn coordinator(records: Vec<Record>) -> Coordinator {
        let counties = parse_features(COUNTIES, Path::new("counties.json")).unwrap();
        let data = LoadedData {
            records,
            counties,
            background: FeatureCollection::default(),
        };
        Coordinator::new(data, &ViewConfig::default()).unwrap()
    }

    fn shape_index(c: &Coordinator, key: &str) -> usize {
        c.map().shapes().iter().position(|s| &**s.key() == key).unwrap()
    }

    fn bar_index(c: &Coordinator, key: &str) -> usize {
        c.chart().bars().iter().position(|b| &**b.key() == key).unwrap()
    }

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn bars_sort_descending_and_ties_keep_their_order() {
        let mut c = coordinator(scenario_records());
        assert_eq!(c.state().expressed_name(), "Labor Force");
        assert_eq!(c.chart().display_keys(), ["C", "A", "B"]);

        c.select_attribute_by_name("Unemployed Rate", 0.0).unwrap();
        assert_eq!(c.chart().display_keys(), ["C", "A", "B"]);
        assert_eq!(c.chart().title(), "Number of Unemployed Rate in each County");
    }

    #[test]
    fn unmatched_county_stays_no_data_through_every_switch() {
        let mut c = coordinator(scenario_records());
        let no_data = c.state().no_data();
        let oxford = shape_index(&c, "Oxford");
        assert!(c.index().get("Oxford").len() == 1, "no bar without a record");
        assert_eq!(c.join_report().unmatched_features, 1);

        assert_eq!(c.map().shapes()[oxford].fill_at(0.0), no_data);
        let mut now = 0.0;
        for name in ATTRIBUTES.iter().rev() {
            now += 2000.0;
            c.select_attribute_by_name(name, now).unwrap();
            let shape = &c.map().shapes()[oxford];
            assert!(shape.value(c.state().expressed()).is_nan());
            assert_eq!(shape.target_fill(), no_data);
            assert_eq!(shape.fill_at(now + 1000.0), no_data);
        }
    }

    #[test]
    fn joined_shapes_carry_every_record_value() {
        let records = scenario_records();
        let c = coordinator(records.clone());
        let catalog = c.state().catalog();
        for r in &records {
            let shape = &c.map().shapes()[shape_index(&c, r.key())];
            for (id, attribute) in catalog.iter() {
                let expected = parse_number(r.raw(attribute.name()).unwrap());
                assert_eq!(shape.value(id), expected, "{} {}", r.key(), attribute.name());
            }
        }
        assert_eq!(c.join_report().matched, 3);
    }

    #[test]
    fn color_domain_tracks_the_expressed_attribute() {
        let records = vec![
            record("A", ["100", "90", "10", "3.5", "1000"]),
            record("B", ["50", "n/a", "5", "4.5", "500"]),
            record("C", ["200", "180", "20", "2.5", "2000"]),
        ];
        let mut c = coordinator(records.clone());
        for (i, name) in ATTRIBUTES.iter().enumerate() {
            c.select_attribute_by_name(name, i as f64 * 2000.0).unwrap();
            let expected: Vec<f64> = records
                .iter()
                .map(|r| r.value(name))
                .filter(|v| !v.is_nan())
                .collect();
            assert_eq!(
                sorted(c.state().color_scale().domain().to_vec()),
                sorted(expected),
                "{name}"
            );
        }
    }

    #[test]
    fn adjacent_bars_never_increase() {
        let records = vec![
            record("A", ["100", "90", "7", "3.5", "1000"]),
            record("B", ["50", "45", "n/a", "4.5", "500"]),
            record("C", ["200", "180", "20", "2.5", "2000"]),
            record("D", ["75", "70", "5", "6.5", "800"]),
        ];
        let mut c = coordinator(records);
        for (i, name) in ATTRIBUTES.iter().enumerate() {
            c.select_attribute_by_name(name, i as f64 * 2000.0).unwrap();
            let attribute = c.state().expressed();
            let values: Vec<f64> = c
                .chart()
                .order()
                .iter()
                .map(|&b| c.chart().bars()[b].value(attribute))
                .collect();
            for pair in values.windows(2) {
                assert!(
                    pair[0] >= pair[1] || pair[1].is_nan(),
                    "{name}: {values:?}"
                );
            }
        }
    }

    #[test]
    fn reselecting_the_expressed_attribute_changes_nothing() {
        let mut c = coordinator(scenario_records());
        let _ = c.frame(0.0);
        let order = c.chart().order().to_vec();
        let fills: Vec<Color> = c.map().shapes().iter().map(MapShape::target_fill).collect();
        let domain = c.state().color_scale().domain().to_vec();

        c.select_attribute_by_name("Labor Force", 10.0).unwrap();
        assert_eq!(c.chart().order(), order);
        let after: Vec<Color> = c.map().shapes().iter().map(MapShape::target_fill).collect();
        assert_eq!(after, fills);
        assert_eq!(c.state().color_scale().domain(), domain);
        assert!(c.frame(5000.0).is_empty());
    }

    fn displayed_at(c: &Coordinator, now: f64) -> (Vec<kurbo::Rect>, Vec<Color>, Vec<Color>) {
        (
            c.chart().bars().iter().map(|b| b.rect_at(now)).collect(),
            c.chart().bars().iter().map(|b| b.fill_at(now)).collect(),
            c.map().shapes().iter().map(|s| s.fill_at(now)).collect(),
        )
    }

    #[test]
    fn superseding_a_staggered_selection_never_jumps() {
        let mut c = coordinator(scenario_records());
        c.select_attribute_by_name("Employed", 0.0).unwrap();
        c.select_attribute_by_name("Labor Force", 100.0).unwrap();
        let shown = displayed_at(&c, 110.0);

        c.select_attribute_by_name("Employed", 110.0).unwrap();
        assert_eq!(displayed_at(&c, 110.0), shown);
        assert_eq!(c.chart().display_keys(), ["C", "A", "B"]);
        for bar in c.chart().bars() {
            assert_eq!(bar.rect_at(2000.0), bar.target_rect());
        }
    }

    #[test]
    fn settled_at_covers_the_slowest_transition() {
        let mut c = coordinator(scenario_records());
        assert_eq!(c.settled_at(), 0.0);
        c.select_attribute_by_name("Unemployed Rate", 100.0).unwrap();
        // Map fills take 1000ms; the last bar starts 40ms late and takes 500ms.
        assert_eq!(c.settled_at(), 1100.0);

        let _ = c.frame(c.settled_at());
        assert!(c.frame(c.settled_at() + 500.0).is_empty());
    }

    #[test]
    fn hover_highlights_both_panels_and_leave_restores_each_memo() {
        let mut c = coordinator(scenario_records());
        let config = ViewConfig::default();
        let map_default = StrokeStyle::solid(
            config.colors.map_stroke.color(),
            config.colors.map_stroke_width,
        );
        let hi = StrokeStyle::solid(config.colors.highlight.color(), config.colors.highlight_width);
        let a_shape = shape_index(&c, "A");
        let a_bar = bar_index(&c, "A");

        c.pointer_enter(ElementHandle::MapShape(a_shape), Point::new(100.0, 200.0))
            .unwrap();
        assert_eq!(c.hovered(), Some("A"));
        assert_eq!(c.map().shapes()[a_shape].stroke(), &hi);
        assert_eq!(c.chart().bars()[a_bar].stroke(), &hi);
        let tooltip = c.tooltip().unwrap();
        assert_eq!(tooltip.dom_id(), "A_label");
        assert_eq!(tooltip.body(), "Labor Force: 100");
        assert_eq!(tooltip.secondary(), Some("Alpha County"));

        c.pointer_leave();
        assert!(c.tooltip().is_none());
        assert_eq!(c.map().shapes()[a_shape].stroke(), &map_default);
        assert!(c.chart().bars()[a_bar].stroke().is_none());
    }

    #[test]
    fn pointer_routing_hit_tests_each_panel() {
        let mut c = coordinator(scenario_records());
        let b_shape = shape_index(&c, "B");
        let centre = c.map().projection().project(-69.3, 45.15);
        assert_eq!(
            c.pointer_at(Panel::Map, centre, 0.0),
            Some(ElementHandle::MapShape(b_shape))
        );
        assert_eq!(c.hovered(), Some("B"));
        let moved = centre + kurbo::Vec2::new(1.0, 1.0);
        assert_eq!(
            c.pointer_at(Panel::Map, moved, 0.0),
            Some(ElementHandle::MapShape(b_shape))
        );
        assert_eq!(c.hovered(), Some("B"));

        let c_bar = bar_index(&c, "C");
        let bar_centre = c.chart().bars()[c_bar].rect_at(0.0).center();
        assert_eq!(
            c.pointer_at(Panel::Chart, bar_centre, 0.0),
            Some(ElementHandle::ChartBar(c_bar))
        );
        assert_eq!(c.hovered(), Some("C"));
        assert_ne!(
            c.map().shapes()[b_shape].stroke(),
            c.map().shapes()[shape_index(&c, "C")].stroke()
        );
        let page = bar_centre + c.panel_origin(Panel::Chart);
        let placed = TooltipLayout::new(config_tooltip(), 1280.0)
            .place(page, c.tooltip().unwrap().size().width);
        assert_eq!(c.tooltip().unwrap().position(), placed);

        assert_eq!(c.pointer_at(Panel::Chart, Point::new(1.0, 1.0), 0.0), None);
        assert_eq!(c.hovered(), None);

        assert_eq!(
            c.pointer_at_page(page, 0.0),
            Some(ElementHandle::ChartBar(c_bar))
        );
        assert_eq!(
            c.pointer_at_page(centre, 0.0),
            Some(ElementHandle::MapShape(b_shape))
        );
    }

    fn config_tooltip() -> TooltipConfig {
        ViewConfig::default().tooltip
    }

    #[test]
    fn open_tooltip_follows_attribute_changes() {
        let mut c = coordinator(scenario_records());
        let bar = bar_index(&c, "B");
        c.pointer_enter(ElementHandle::ChartBar(bar), Point::new(400.0, 300.0))
            .unwrap();
        assert_eq!(c.tooltip().unwrap().secondary(), None);
        c.select_attribute_by_name("Population", 0.0).unwrap();
        assert_eq!(c.tooltip().unwrap().body(), "Population: 500");
        c.pointer_move(Point::new(420.0, 320.0));
        assert_eq!(c.tooltip().unwrap().position(), Point::new(430.0, 245.0));
    }

    #[test]
    fn unknown_elements_and_attributes_are_errors() {
        let mut c = coordinator(scenario_records());
        assert_eq!(
            c.pointer_enter(ElementHandle::ChartBar(99), Point::ZERO),
            Err(ViewError::UnknownElement(ElementHandle::ChartBar(99)))
        );
        assert!(c.select_attribute_by_name("Median Income", 0.0).is_err());
        assert_eq!(c.state().expressed_name(), "Labor Force");
    }

    #[test]
    fn frames_feed_svg_and_html() {
        let mut c = coordinator(scenario_records());
        let frame = c.frame(0.0);
        assert_eq!(frame.index, 1);
        let mut map_svg = SvgScene::new(c.map().frame());
        let mut chart_svg = SvgScene::new(c.chart().frame());
        map_svg.apply_diffs(&frame.map);
        chart_svg.apply_diffs(&frame.chart);
        assert_eq!(map_svg.len(), 3 + 4);

        c.pointer_enter(ElementHandle::MapShape(shape_index(&c, "C")), Point::new(50.0, 50.0))
            .unwrap();
        let frame = c.frame(0.0);
        assert_eq!(frame.index, 2);
        assert_eq!(frame.map.len(), 1, "only the highlighted shape changed");
        assert_eq!(frame.chart.len(), 1);
        map_svg.apply_diffs(&frame.map);
        chart_svg.apply_diffs(&frame.chart);

        let (m, ch) = (map_svg.to_svg_string(), chart_svg.to_svg_string());
        assert!(ch.contains(r##"data-key="C" fill="#"##));
        assert!(ch.contains(r##"stroke="#0000ff" stroke-width="2""##));
        let html = c.page(&m, &ch).to_html_string();
        assert!(html.contains("id=\"C_label\""));
        assert!(html.contains("<option value=\"Labor Force\" selected>"));
    }
}
