//! Tracks, the renderable output of the segmentation.
//!

use jiff::Zoned;
use serde::Serialize;
use strum::EnumString;

use crate::Sample;

/// Whether a track is made of measured or computed positions.
///
/// This is only a marker, mapping it to a colour or style is left to the renderer.
///
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, strum::Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Quality {
    /// Measured positions
    #[default]
    Actual,
    /// Computed or inferred positions
    Estimated,
}

impl From<bool> for Quality {
    fn from(estimated: bool) -> Self {
        if estimated {
            Quality::Estimated
        } else {
            Quality::Actual
        }
    }
}

/// One point of a track, altitude in meters.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackPoint {
    pub time: Zoned,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl From<&Sample> for TrackPoint {
    fn from(s: &Sample) -> Self {
        TrackPoint {
            time: s.time.clone(),
            longitude: s.longitude,
            latitude: s.latitude,
            altitude: s.altitude,
        }
    }
}

impl TrackPoint {
    /// Timestamp with its UTC offset, e.g. `2015-07-26T07:36:51-07:00`.
    ///
    pub fn when(&self) -> String {
        rfc3339(&self.time)
    }
}

/// Render a zoned time as RFC 3339, keeping the local offset.
///
#[inline]
pub fn rfc3339(z: &Zoned) -> String {
    z.timestamp().display_with_offset(z.offset()).to_string()
}

/// A sealed polyline, all points share the same `quality` apart from the bridge points
/// at either end.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    /// Timestamp of the first point
    pub label: String,
    pub quality: Quality,
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(quality: Quality, points: Vec<TrackPoint>) -> Self {
        let label = points.first().map(TrackPoint::when).unwrap_or_default();
        Track {
            label,
            quality,
            points,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrackPoint> {
        self.points.last()
    }
}

/// A track with the segment id it was created under.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentTrack {
    pub segment: i64,
    pub track: Track,
}
