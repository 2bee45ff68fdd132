// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A standalone HTML page holding the selector, both panels and the tooltip.

use std::fmt::Write as _;

use choro_geo::{AttributeCatalog, AttributeId};

use crate::interaction::Tooltip;
use crate::svg::escape_xml;

const STYLE: &str = "\
body { margin: 0; font-family: sans-serif; }
.dropdown { position: absolute; top: 30px; left: 30px; z-index: 10; }
.panels { display: flex; }
.infolabel { position: absolute; padding: 5px; background: rgba(255, 255, 255, 0.8); \
border: 1px solid #999; pointer-events: none; }
.infolabel h1 { margin: 0; font-size: 21px; }
.labelname { font-size: 14px; }
";

/// Everything shown on one rendered page.
#[derive(Clone, Copy, Debug)]
pub struct Page<'a> {
    /// Serialized map panel.
    pub map_svg: &'a str,
    /// Serialized chart panel.
    pub chart_svg: &'a str,
    /// Dropdown entries.
    pub catalog: &'a AttributeCatalog,
    /// The selected dropdown entry.
    pub expressed: AttributeId,
    /// The open tooltip, if any.
    pub tooltip: Option<&'a Tooltip>,
}

impl Page<'_> {
    /// Serializes the page.
    pub fn to_html_string(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>County employment</title>\n<style>\n");
        out.push_str(STYLE);
        out.push_str("</style>\n</head>\n<body>\n");

        out.push_str("<select class=\"dropdown\">\n");
        out.push_str("<option class=\"titleOption\" disabled=\"true\">Select Attribute</option>\n");
        for (id, attribute) in self.catalog.iter() {
            let name = escape_xml(attribute.name());
            let selected = if id == self.expressed { " selected" } else { "" };
            let _ = writeln!(out, "<option value=\"{name}\"{selected}>{name}</option>");
        }
        out.push_str("</select>\n");

        out.push_str("<div class=\"panels\">\n");
        out.push_str(self.map_svg);
        out.push_str(self.chart_svg);
        out.push_str("</div>\n");

        if let Some(tooltip) = self.tooltip {
            write_tooltip(&mut out, tooltip);
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

fn write_tooltip(out: &mut String, tooltip: &Tooltip) {
    let pos = tooltip.position();
    let _ = write!(
        out,
        "<div class=\"infolabel\" id=\"{}\" style=\"left: {}px; top: {}px;\">",
        escape_xml(&tooltip.dom_id()),
        pos.x,
        pos.y
    );
    let _ = write!(
        out,
        "<h1>{}</h1><br>{}",
        escape_xml(tooltip.heading()),
        escape_xml(&tooltip.body())
    );
    if let Some(name) = tooltip.secondary() {
        let _ = write!(out, "<div class=\"labelname\">{}</div>", escape_xml(name));
    }
    out.push_str("</div>\n");
}
