//! Definition of the data formats used by `flighttracks`.
//!
//! The input side is the per-flight position CSV (see [`Sample`] and [`read_samples`]),
//! the output side is a list of [`Track`]s, each tagged with a [`Quality`] and the
//! segment id it was created under.  Going from one to the other is the job of the
//! [`Segmenter`].
//!
//! How a `Quality` ends up looking on screen is not our business, this is left to
//! whoever renders the tracks.
//!

// Re-export for convenience
//
pub use common::*;
pub use error::*;
pub use sample::*;
pub use segmenter::*;
pub use track::*;

mod common;
mod error;
mod sample;
mod segmenter;
mod track;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
