//! Configuration for `csv2kml`.
//!
//! Everything about how the document looks lives here, the conversion itself does not
//! need any of it except for the timezone.
//!

use flighttracks_common::IntoConfig;
use serde::{Deserialize, Serialize};

/// Project tag for the configuration directory
pub const TAG: &str = "flighttracks";

/// Current config version
const CVERSION: usize = 1;

/// Initial camera position.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Camera {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters, relative to ground
    pub altitude: f64,
    #[serde(default)]
    pub tilt: f64,
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub roll: f64,
}

/// Line and polygon colours (KML `aabbggrr`) and line width for one kind of track.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StyleDef {
    pub line: String,
    pub poly: String,
    pub width: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KmlConfig {
    /// Version in the file MUST match `CVERSION`
    pub version: usize,
    /// Document name
    pub name: String,
    /// Expand the document when opened
    #[serde(default)]
    pub open: bool,
    /// IANA timezone name
    pub timezone: String,
    pub camera: Camera,
    /// Style for measured positions
    pub good: StyleDef,
    /// Style for estimated positions
    pub bad: StyleDef,
}

impl IntoConfig for KmlConfig {
    const VERSION: usize = CVERSION;
    const FILENAME: &'static str = "csv2kml.hcl";
    const DEFAULT: &'static str = include_str!("csv2kml.hcl");

    fn version(&self) -> usize {
        self.version
    }
}
