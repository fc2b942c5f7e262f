/// Small internal module to build the KML elements
///
use std::collections::HashMap;

use flighttracks_formats::{Quality, Track};
use kml::types::{Element, LabelStyle, LineStyle, PolyStyle, Style};
use kml::Kml;

use crate::config::{Camera, StyleDef};

/// Leaf element with text content.
///
pub(crate) fn element(name: &str, content: impl ToString) -> Element {
    Element {
        name: name.into(),
        attrs: HashMap::new(),
        content: Some(content.to_string()),
        children: vec![],
    }
}

/// Element with only children.
///
pub(crate) fn node(name: &str, children: Vec<Element>) -> Element {
    Element {
        name: name.into(),
        attrs: HashMap::new(),
        content: None,
        children,
    }
}

/// `StyleMap` id for each quality, the only place where a quality becomes a style.
///
pub(crate) fn style_id(quality: Quality) -> &'static str {
    match quality {
        Quality::Actual => "good",
        Quality::Estimated => "bad",
    }
}

/// Create a `Style` entry, no icon and hidden labels so that only the track shows.
///
#[tracing::instrument]
pub(crate) fn make_style(name: &str, def: &StyleDef) -> Kml {
    Kml::Style(Style {
        id: Some(name.into()),
        line: LineStyle {
            color: def.line.clone(),
            width: def.width,
            ..Default::default()
        }
        .into(),
        poly: PolyStyle {
            color: def.poly.clone(),
            ..Default::default()
        }
        .into(),
        label: LabelStyle {
            scale: 0.,
            ..Default::default()
        }
        .into(),
        ..Default::default()
    })
}

/// Create a `StyleMap` using the same style for normal and highlight.
///
#[tracing::instrument]
pub(crate) fn make_style_map(name: &str, style: &str) -> Kml {
    let pair = |key: &str| {
        node(
            "Pair",
            vec![element("key", key), element("styleUrl", format!("#{style}"))],
        )
    };
    let mut map = node("StyleMap", vec![pair("normal"), pair("highlight")]);
    map.attrs.insert("id".into(), name.into());
    Kml::Element(map)
}

/// Initial view of the document.
///
pub(crate) fn make_camera(cam: &Camera) -> Kml {
    Kml::Element(node(
        "Camera",
        vec![
            element("longitude", cam.longitude),
            element("latitude", cam.latitude),
            element("altitude", cam.altitude),
            element("heading", cam.heading),
            element("tilt", cam.tilt),
            element("roll", cam.roll),
            element("altitudeMode", "relativeToGround"),
        ],
    ))
}

/// Generate a `gx:Track` with one `when` and one `gx:coord` per point.
///
fn from_track_to_gx(track: &Track) -> Element {
    let mut children = vec![element("extrude", 1), element("altitudeMode", "absolute")];
    children.extend(track.points.iter().map(|p| element("when", p.when())));
    children.extend(track.points.iter().map(|p| {
        element(
            "gx:coord",
            format!("{} {} {}", p.longitude, p.latitude, p.altitude),
        )
    }));
    node("gx:Track", children)
}

/// Create a `Placemark` for one track, named after its first timestamp.
///
pub(crate) fn from_track_to_placemark(track: &Track) -> Element {
    node(
        "Placemark",
        vec![
            element("name", &track.label),
            element("styleUrl", format!("#{}", style_id(track.quality))),
            from_track_to_gx(track),
        ],
    )
}

/// A named folder.
///
pub(crate) fn folder(name: &str, mut elements: Vec<Element>) -> Element {
    let mut children = vec![element("name", name)];
    children.append(&mut elements);
    node("Folder", children)
}
