//! Common code and units.
//!

/// Conversion factor used by the recording instrument, do not replace with the exact
/// international foot.
///
pub const FEET_PER_METER: f64 = 3.281;

/// Number of fields in one position record.
///
pub const FIELDS: usize = 6;

/// Convert feet into meters
///
#[inline]
pub fn to_meters(a: f64) -> f64 {
    a / FEET_PER_METER
}
