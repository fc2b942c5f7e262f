//! Turn converted flights into a KML document.
//!
//! Layout of the document:
//!
//! - document name, camera and the `good`/`bad` styles,
//! - one `Folder` per flight, named after the flight,
//! - inside, one `Folder` per segment id,
//! - inside, one `Placemark` with a `gx:Track` per track.
//!
//! Tracks carry only a `Quality`, which one of the two styles it gets is decided here.
//!

mod create;

use std::collections::HashMap;

use kml::Kml::Document;
use kml::{Kml, KmlDocument, KmlVersion};
use tracing::{debug, trace};

use create::*;

use crate::config::KmlConfig;
use crate::flight::Flight;
use flighttracks_formats::Quality;

/// KML 2.2 namespace.
const KML_NS: &str = "http://www.opengis.net/kml/2.2";
/// Namespace for `gx:Track`.
const GX_NS: &str = "http://www.google.com/kml/ext/2.2";

/// Build the whole document for the given flights, in order.
///
#[tracing::instrument(skip_all)]
pub fn build_document(cfg: &KmlConfig, flights: &[Flight]) -> Kml {
    trace!("Building document for {} flights", flights.len());

    let mut elements = vec![
        Kml::Element(element("name", &cfg.name)),
        Kml::Element(element("open", u8::from(cfg.open))),
        make_camera(&cfg.camera),
    ];

    // Styles, one per quality
    //
    for (quality, def) in [(Quality::Actual, &cfg.good), (Quality::Estimated, &cfg.bad)] {
        let id = style_id(quality);
        let style = format!("{id}-style");
        elements.push(make_style(&style, def));
        elements.push(make_style_map(id, &style));
    }

    // Now the flights
    //
    for flight in flights {
        let segments = flight
            .segments
            .iter()
            .map(|(id, tracks)| {
                let placemarks = tracks.iter().map(from_track_to_placemark).collect();
                folder(&id.to_string(), placemarks)
            })
            .collect();
        debug!("{}: {} segments", flight.name, flight.segments.len());
        elements.push(Kml::Element(folder(&flight.name, segments)));
    }

    let doc = Document {
        attrs: HashMap::new(),
        elements,
    };

    Kml::KmlDocument(KmlDocument {
        version: KmlVersion::V22,
        attrs: [
            ("xmlns".to_string(), KML_NS.to_string()),
            ("xmlns:gx".to_string(), GX_NS.to_string()),
        ]
        .into(),
        elements: vec![doc],
    })
}

/// Render the document as a string.
///
pub fn render(cfg: &KmlConfig, flights: &[Flight]) -> String {
    build_document(cfg, flights).to_string()
}
