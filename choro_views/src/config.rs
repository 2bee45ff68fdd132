// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View configuration.
//!
//! Every field has a default, so an empty table deserializes into the stock county employment
//! views. Colors are written as `#RGB` or `#RRGGBB` strings.

use core::fmt;
use core::str::FromStr;

use choro_geo::{Attribute, AttributeCatalog};
use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// A color written as a hex string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Color);

impl HexColor {
    /// An opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Color::from_rgb8(r, g, b))
    }

    /// The wrapped color.
    pub fn color(self) -> Color {
        self.0
    }
}

/// Parses `#RGB` or `#RRGGBB`, case-insensitively.
impl FromStr for HexColor {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ViewError::InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ViewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0.to_rgba8();
        write!(f, "#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    }
}

/// One selectable attribute and the fixed domain its bars are sized against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConfig {
    /// Column name in the records file.
    pub name: String,
    /// `[min, max]` of the bar size scale.
    pub size_domain: [f64; 2],
}

/// Map panel layout and projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Panel width as a fraction of the viewport width.
    pub width_fraction: f64,
    /// Panel height in pixels.
    pub height: f64,
    /// Projection center `[lon, lat]` in the rotated frame.
    pub center: [f64; 2],
    /// Spherical rotation `[lambda, phi, gamma]`.
    pub rotate: [f64; 3],
    /// Standard parallels.
    pub parallels: [f64; 2],
    /// Projection scale.
    pub scale: f64,
    /// Minor graticule step `[lon, lat]` in degrees.
    pub graticule_step: [f64; 2],
    /// Graticule sampling interval in degrees.
    pub graticule_precision: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width_fraction: 0.5,
            height: 460.0,
            center: [0.0, 45.2538],
            rotate: [69.4, 0.0, 0.0],
            parallels: [17.0, 45.0],
            scale: 4000.0,
            graticule_step: [5.0, 5.0],
            graticule_precision: 2.5,
        }
    }
}

/// Chart panel layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Panel width as a fraction of the viewport width.
    pub width_fraction: f64,
    /// Panel height in pixels.
    pub height: f64,
    /// Space left of the plot, holding the axis.
    pub left_padding: f64,
    /// Space right of the plot.
    pub right_padding: f64,
    /// Space above and below the plot.
    pub top_bottom_padding: f64,
    /// Gap between adjacent bars.
    pub bar_gap: f64,
    /// Title anchor `[x, y]`.
    pub title_position: [f64; 2],
    /// Title font size.
    pub title_font_size: f64,
    /// Approximate number of axis ticks.
    pub tick_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_fraction: 0.425,
            height: 473.0,
            left_padding: 38.0,
            right_padding: 2.0,
            top_bottom_padding: 5.0,
            bar_gap: 1.0,
            title_position: [55.0, 40.0],
            title_font_size: 18.0,
            tick_count: 10,
        }
    }
}

/// Colors and strokes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Quantile classes, lowest first.
    pub palette: Vec<HexColor>,
    /// Fill of counties and bars without a value.
    pub no_data: HexColor,
    /// Default outline of map shapes.
    pub map_stroke: HexColor,
    /// Default outline width of map shapes.
    pub map_stroke_width: f64,
    /// Outline of hovered elements.
    pub highlight: HexColor,
    /// Outline width of hovered elements.
    pub highlight_width: f64,
    /// Fill of the globe behind everything.
    pub sphere: HexColor,
    /// Graticule line color.
    pub graticule: HexColor,
    /// Fill of the context outlines.
    pub context_fill: HexColor,
    /// Stroke of the context outlines.
    pub context_stroke: HexColor,
    /// Fill of the chart plot area.
    pub chart_background: HexColor,
    /// Stroke of the chart frame.
    pub chart_frame: HexColor,
    /// Axis, title and tooltip text.
    pub text: HexColor,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                HexColor::rgb(0xD4, 0xB9, 0xDA),
                HexColor::rgb(0xC9, 0x94, 0xC7),
                HexColor::rgb(0xDF, 0x65, 0xB0),
                HexColor::rgb(0xDD, 0x1C, 0x77),
                HexColor::rgb(0x98, 0x00, 0x43),
            ],
            no_data: HexColor::rgb(0xCC, 0xFF, 0xDD),
            map_stroke: HexColor::rgb(0, 0, 0),
            map_stroke_width: 0.5,
            highlight: HexColor::rgb(0, 0, 0xFF),
            highlight_width: 2.0,
            sphere: HexColor::rgb(0xD5, 0xE7, 0xF2),
            graticule: HexColor::rgb(0x99, 0x99, 0x99),
            context_fill: HexColor::rgb(0xEE, 0xEE, 0xEE),
            context_stroke: HexColor::rgb(0xFF, 0xFF, 0xFF),
            chart_background: HexColor::rgb(0xEE, 0xEE, 0xEE),
            chart_frame: HexColor::rgb(0x99, 0x99, 0x99),
            text: HexColor::rgb(0x33, 0x33, 0x33),
        }
    }
}

/// Animation timings, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Map fill transition.
    pub map_fill_ms: f64,
    /// Bar geometry and fill transition.
    pub bar_ms: f64,
    /// Extra delay per bar rank.
    pub bar_stagger_ms: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            map_fill_ms: 1000.0,
            bar_ms: 500.0,
            bar_stagger_ms: 20.0,
        }
    }
}

/// Tooltip placement and text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TooltipConfig {
    /// Horizontal distance from the pointer.
    pub offset_x: f64,
    /// Distance above the pointer.
    pub offset_above: f64,
    /// Distance below the pointer when there is no room above.
    pub offset_below: f64,
    /// Room kept to the right viewport edge before flipping left.
    pub edge_margin: f64,
    /// Font size of the body lines; the heading is 1.5x.
    pub font_size: f64,
    /// Inner padding.
    pub padding: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 10.0,
            offset_above: 75.0,
            offset_below: 25.0,
            edge_margin: 20.0,
            font_size: 14.0,
            padding: 5.0,
        }
    }
}

/// Complete view configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Width of the page the panels share.
    pub viewport_width: f64,
    /// Feature property and record column holding the county key.
    pub key_field: String,
    /// Feature property shown as the tooltip's secondary line.
    pub name_field: String,
    /// Selectable attributes in dropdown order; the first is expressed at startup.
    pub attributes: Vec<AttributeConfig>,
    /// Map panel.
    pub map: MapConfig,
    /// Chart panel.
    pub chart: ChartConfig,
    /// Colors and strokes.
    pub colors: ColorConfig,
    /// Animation timings.
    pub transitions: TransitionConfig,
    /// Tooltip.
    pub tooltip: TooltipConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let attributes = AttributeCatalog::employment()
            .iter()
            .map(|(_, a)| AttributeConfig {
                name: a.name().to_owned(),
                size_domain: [a.size_domain().0, a.size_domain().1],
            })
            .collect();
        Self {
            viewport_width: 1280.0,
            key_field: "COUNTY".to_owned(),
            name_field: "name".to_owned(),
            attributes,
            map: MapConfig::default(),
            chart: ChartConfig::default(),
            colors: ColorConfig::default(),
            transitions: TransitionConfig::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Builds the attribute catalog from `attributes`.
    pub fn catalog(&self) -> Result<AttributeCatalog, ViewError> {
        let attributes = self
            .attributes
            .iter()
            .map(|a| Attribute::new(a.name.clone(), (a.size_domain[0], a.size_domain[1])))
            .collect();
        Ok(AttributeCatalog::new(attributes)?)
    }

    /// Width of the map panel.
    pub fn map_width(&self) -> f64 {
        self.viewport_width * self.map.width_fraction
    }

    /// Width of the chart panel.
    pub fn chart_width(&self) -> f64 {
        self.viewport_width * self.chart.width_fraction
    }

    /// The palette as colors.
    pub fn palette(&self) -> Vec<Color> {
        self.colors.palette.iter().map(|c| c.color()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_short_and_long_forms() {
        assert_eq!("#CFD".parse::<HexColor>().unwrap(), HexColor::rgb(0xCC, 0xFF, 0xDD));
        assert_eq!("#dd1c77".parse::<HexColor>().unwrap(), HexColor::rgb(0xDD, 0x1C, 0x77));
        assert_eq!(HexColor::rgb(0x98, 0, 0x43).to_string(), "#980043");
        for bad in ["CFD", "#CF", "#GGGGGG", "#1234567", ""] {
            assert_eq!(
                bad.parse::<HexColor>(),
                Err(ViewError::InvalidColor(bad.to_owned())),
                "{bad}"
            );
        }
    }

    #[test]
    fn empty_table_gives_stock_views() {
        let config: ViewConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.map_width(), 640.0);
        assert_eq!(config.chart_width(), 544.0);
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog, AttributeCatalog::employment());
    }

    #[test]
    fn partial_tables_override_only_what_they_name() {
        let config: ViewConfig = toml::from_str(
            r##"
            viewport_width = 1000.0

            [colors]
            no_data = "#ccc"
            palette = ["#000", "#fff"]

            [[attributes]]
            name = "Employed"
            size_domain = [0.0, 50000.0]
            "##,
        )
        .unwrap();
        assert_eq!(config.viewport_width, 1000.0);
        assert_eq!(config.colors.no_data, HexColor::rgb(0xCC, 0xCC, 0xCC));
        assert_eq!(config.palette().len(), 2);
        assert_eq!(config.colors.highlight, HexColor::rgb(0, 0, 0xFF));
        assert_eq!(config.map, MapConfig::default());
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(catalog.first()).size_domain(), (0.0, 50000.0));
    }

    #[test]
    fn bad_colors_and_unknown_keys_are_rejected() {
        assert!(toml::from_str::<ViewConfig>("[colors]\nno_data = \"teal\"").is_err());
        assert!(toml::from_str::<ViewConfig>("colour = 1").is_err());
        let empty = ViewConfig {
            attributes: Vec::new(),
            ..ViewConfig::default()
        };
        assert!(matches!(empty.catalog(), Err(ViewError::Catalog(_))));
    }
}
