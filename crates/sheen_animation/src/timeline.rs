//! Scroll-scrubbed camera timeline
//!
//! Maps the virtual scroll offset onto animated state through registered
//! [`Segment`]s, and hosts the [`OneShotPlayer`] for time-based sequences.
//! Properties owned by a running one-shot tween are never written by the
//! scrub executor.

use smallvec::SmallVec;

use sheen_core::ConfigurationError;

use crate::scheduler::{OneShotPlayer, PlaybackId};
use crate::segment::{Scrub, Segment, Sequence};
use crate::state::{AnimatedState, Property, Value};

/// Progress below this distance from its scroll-derived goal is settled
const SETTLE_EPSILON: f32 = 1e-4;

/// Smoothed scrub reaches ~99% of its goal after its configured seconds
const SMOOTHING_RATE: f32 = 4.6;

struct ScrubEntry {
    segment: Segment,
    /// Resolved start value per track
    from: SmallVec<[Value; 4]>,
    progress: f32,
}

impl ScrubEntry {
    fn targets(&self, property: Property) -> Option<usize> {
        self.segment
            .tracks()
            .iter()
            .position(|track| track.property == property)
    }

    fn value(&self, track: usize, progress: f32) -> Value {
        let to = self.segment.tracks()[track].to;
        if progress >= 1.0 {
            return to;
        }
        let eased = self.segment.easing().apply(progress);
        self.from[track].lerp(to, eased)
    }
}

/// Drives camera pose, rotation, blend stages and layer opacity
pub struct CameraTimelineController {
    entries: Vec<ScrubEntry>,
    properties: SmallVec<[Property; 16]>,
    player: OneShotPlayer,
    last_position: Option<f32>,
    force_resample: bool,
}

impl Default for CameraTimelineController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraTimelineController {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            properties: SmallVec::new(),
            player: OneShotPlayer::new(),
            last_position: None,
            force_resample: false,
        }
    }

    /// Register a scrubbed segment.
    ///
    /// Segments are ordered by registration. A track without an explicit
    /// `from` starts where the previous segment animating the same property
    /// ends, or at the property's current value in `state`.
    pub fn register(&mut self, segment: Segment, state: &AnimatedState) -> Result<(), ConfigurationError> {
        if let Scrub::Smoothed(seconds) = segment.scrub() {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(ConfigurationError::InvalidDuration(seconds));
            }
        }

        let from = segment
            .tracks()
            .iter()
            .map(|track| {
                track.from.unwrap_or_else(|| {
                    self.entries
                        .iter()
                        .rev()
                        .find_map(|entry| {
                            entry
                                .targets(track.property)
                                .map(|i| entry.segment.tracks()[i].to)
                        })
                        .unwrap_or_else(|| state.get(track.property))
                })
            })
            .collect();

        for track in segment.tracks() {
            if !self.properties.contains(&track.property) {
                self.properties.push(track.property);
            }
        }

        tracing::debug!(
            start = segment.range().start(),
            end = segment.range().end(),
            tracks = segment.tracks().len(),
            "segment registered"
        );
        self.entries.push(ScrubEntry {
            segment,
            from,
            progress: 0.0,
        });
        self.force_resample = true;
        Ok(())
    }

    pub fn segment_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop every scrubbed segment
    pub fn clear_segments(&mut self) {
        self.entries.clear();
        self.properties.clear();
        self.last_position = None;
    }

    /// Segment governing `property` at `position`: the last one whose range
    /// has started, else the first one animating the property
    fn governing(&self, property: Property, position: f32) -> Option<(usize, usize)> {
        let started = self.entries.iter().enumerate().rev().find_map(|(i, entry)| {
            if entry.segment.range().start() <= position {
                entry.targets(property).map(|track| (i, track))
            } else {
                None
            }
        });
        started.or_else(|| {
            self.entries
                .iter()
                .enumerate()
                .find_map(|(i, entry)| entry.targets(property).map(|track| (i, track)))
        })
    }

    /// Evaluate the scrubbed timeline at `position` without writing anything.
    ///
    /// Smoothing is ignored: the result is where the scrub settles.
    pub fn sample(&self, position: f32) -> SmallVec<[(Property, Value); 16]> {
        self.properties
            .iter()
            .filter_map(|&property| {
                let (entry, track) = self.governing(property, position)?;
                let entry = &self.entries[entry];
                let progress = entry.segment.range().progress(position);
                Some((property, entry.value(track, progress)))
            })
            .collect()
    }

    /// Value of one property at `position`, if any segment animates it
    pub fn sample_property(&self, property: Property, position: f32) -> Option<Value> {
        self.sample(position)
            .into_iter()
            .find(|(p, _)| *p == property)
            .map(|(_, value)| value)
    }

    /// Write the next resample even if the position is unchanged
    pub fn force_resample(&mut self) {
        self.force_resample = true;
    }

    /// Scrub to `position`. Returns whether any property was written.
    ///
    /// Does nothing when the position is unchanged, every smoothed segment
    /// has settled and no resample was forced.
    pub fn apply(&mut self, position: f32, dt: f32, state: &mut AnimatedState) -> bool {
        let mut settling = false;
        for entry in &mut self.entries {
            let goal = entry.segment.range().progress(position);
            match entry.segment.scrub() {
                Scrub::Direct => entry.progress = goal,
                Scrub::Smoothed(seconds) => {
                    let before = entry.progress;
                    let alpha = 1.0 - (-SMOOTHING_RATE * dt.max(0.0) / seconds).exp();
                    entry.progress += (goal - entry.progress) * alpha;
                    if (goal - entry.progress).abs() < SETTLE_EPSILON {
                        entry.progress = goal;
                    }
                    settling |= entry.progress != before;
                }
            }
        }

        let moved = self.last_position != Some(position);
        if !moved && !settling && !self.force_resample {
            return false;
        }
        let forced = std::mem::take(&mut self.force_resample);
        if forced {
            // a forced resample lands on the settled values
            for entry in &mut self.entries {
                entry.progress = entry.segment.range().progress(position);
            }
        }
        self.last_position = Some(position);

        let mut wrote = false;
        for &property in &self.properties {
            if self.player.owns(property) {
                continue;
            }
            if let Some((entry, track)) = self.governing(property, position) {
                let entry = &self.entries[entry];
                wrote |= state.set(property, entry.value(track, entry.progress));
            }
        }
        wrote
    }

    /// Start a one-shot sequence
    pub fn play(&mut self, sequence: &Sequence, state: &mut AnimatedState) -> PlaybackId {
        self.player.play(sequence, state)
    }

    /// Advance one-shot sequences; returns those that completed
    pub fn tick_one_shots(&mut self, dt: f32, state: &mut AnimatedState) -> SmallVec<[PlaybackId; 2]> {
        self.player.tick(dt, state)
    }

    pub fn is_playing(&self, id: PlaybackId) -> bool {
        self.player.is_playing(id)
    }

    pub fn cancel(&mut self, id: PlaybackId) {
        self.player.cancel(id);
    }

    pub fn cancel_all(&mut self) {
        self.player.cancel_all();
    }
}
