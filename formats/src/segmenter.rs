//! Split the ordered stream of samples of one flight into tracks.
//!
//! A new track is started whenever one of these happens:
//!
//! - we go from measured to estimated positions,
//! - we go from estimated back to measured positions,
//! - the segment id changes.
//!
//! Estimated tracks are drawn between the last known measured point and the point where
//! measurement resumes, so they get the last point of the previous track prepended and,
//! when measurement resumes, the first measured sample appended.  These bridge points are
//! duplicates, the same sample ends one track and begins the next.
//!
//! The last track is always flushed by [`Segmenter::finish`], and it gets the same bridge
//! prefix if the flight ends while estimated.
//!

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{InputError, Quality, Sample, SegmentTrack, Track, TrackPoint};

/// State machine for one flight.  Each flight owns its own instance.
///
#[derive(Debug, Default)]
pub struct Segmenter {
    /// Segment id of the pending track, `None` before the first sample
    segment: Option<i64>,
    /// Quality of the pending track
    quality: Quality,
    /// Points of the track being built
    pending: VecDeque<TrackPoint>,
    /// Last point of the last sealed track, used as bridge
    last_point: Option<TrackPoint>,
    /// Sealed tracks, in order
    tracks: Vec<SegmentTrack>,
}

impl Segmenter {
    pub fn new() -> Self {
        Segmenter::default()
    }

    /// Feed the next sample.
    ///
    pub fn push(&mut self, sample: Sample) {
        let point = TrackPoint::from(&sample);
        let quality = Quality::from(sample.estimated);

        let current = match self.segment {
            Some(current) => current,
            None => {
                trace!("first sample, segment {} {}", sample.segment, quality);
                self.segment = Some(sample.segment);
                self.quality = quality;
                self.pending.push_back(point);
                return;
            }
        };

        let flip = self.quality != quality;
        let new_segment = sample.segment != current;

        if flip && self.quality == Quality::Estimated {
            // Estimation ends on this sample
            self.pending.push_back(point.clone());
            self.bridge();
        }

        if flip || new_segment {
            self.seal(current);
            self.quality = quality;
            if new_segment {
                debug!("segment {} -> {}", current, sample.segment);
                self.segment = Some(sample.segment);
            }
        }
        self.pending.push_back(point);
    }

    /// Flush the pending track and return all of them.
    ///
    pub fn finish(mut self) -> Result<Vec<SegmentTrack>, InputError> {
        let segment = self.segment.ok_or(InputError::Empty)?;

        if self.quality == Quality::Estimated {
            self.bridge();
        }
        self.seal(segment);
        debug!("{} tracks", self.tracks.len());
        Ok(self.tracks)
    }

    fn bridge(&mut self) {
        if let Some(p) = &self.last_point {
            self.pending.push_front(p.clone());
        }
    }

    fn seal(&mut self, segment: i64) {
        let points: Vec<_> = std::mem::take(&mut self.pending).into();
        let track = Track::new(self.quality, points);
        trace!("sealing {} track {} ({} points)", track.quality, track.label, track.len());

        self.last_point = track.last().cloned();
        self.tracks.push(SegmentTrack { segment, track });
    }
}

/// Run the whole flight through a `Segmenter`.
///
#[tracing::instrument(skip(samples))]
pub fn segment<I>(samples: I) -> Result<Vec<SegmentTrack>, InputError>
where
    I: IntoIterator<Item = Sample>,
{
    let mut seg = Segmenter::new();
    samples.into_iter().for_each(|s| seg.push(s));
    seg.finish()
}

/// Group tracks by segment id, keeping the order in which ids first appear.
///
/// A segment id coming back later in the flight reuses its group.
///
pub fn group_by_segment(tracks: Vec<SegmentTrack>) -> Vec<(i64, Vec<Track>)> {
    let mut groups: Vec<(i64, Vec<Track>)> = vec![];
    for SegmentTrack { segment, track } in tracks {
        match groups.iter_mut().find(|(id, _)| *id == segment) {
            Some((_, list)) => list.push(track),
            None => groups.push((segment, vec![track])),
        }
    }
    groups
}
