//! One-shot sequence player
//!
//! Plays [`Sequence`]s against frame `dt`. Each animated [`Property`] has at
//! most one owning tween; a tween that starts on an owned property cancels
//! the previous owner, so the last-started tween wins.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::segment::{Sequence, Tween};
use crate::state::{AnimatedState, Property, Value};

new_key_type! {
    pub struct PlaybackId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Waiting,
    Running,
    Finished,
    Cancelled,
}

struct ActiveTween {
    tween: Tween,
    from: Value,
    phase: Phase,
}

struct Playback {
    name: &'static str,
    elapsed: f32,
    duration: f32,
    tweens: SmallVec<[ActiveTween; 8]>,
}

/// Drives one-shot sequences and tracks property ownership
#[derive(Default)]
pub struct OneShotPlayer {
    playbacks: SlotMap<PlaybackId, Playback>,
    owners: FxHashMap<Property, (PlaybackId, usize)>,
}

impl OneShotPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sequence.
    ///
    /// Tweens with an explicit `from`, and tweens at offset 0, claim their
    /// property now; explicit `from` values are written immediately.
    pub fn play(&mut self, sequence: &Sequence, state: &mut AnimatedState) -> PlaybackId {
        let tweens = sequence
            .tweens()
            .iter()
            .map(|tween| ActiveTween {
                tween: *tween,
                from: tween.track.from.unwrap_or(tween.track.to),
                phase: Phase::Waiting,
            })
            .collect();
        let id = self.playbacks.insert(Playback {
            name: sequence.name(),
            elapsed: 0.0,
            duration: sequence.duration(),
            tweens,
        });

        for (index, tween) in sequence.tweens().iter().enumerate() {
            if tween.track.from.is_some() || tween.offset <= 0.0 {
                self.claim(id, index, state);
            }
        }
        tracing::debug!(sequence = sequence.name(), duration = sequence.duration(), "sequence started");
        id
    }

    /// Advance every playing sequence by `dt` seconds.
    ///
    /// Returns the sequences that completed during this call; each is
    /// reported exactly once and then dropped.
    pub fn tick(&mut self, dt: f32, state: &mut AnimatedState) -> SmallVec<[PlaybackId; 2]> {
        let dt = dt.max(0.0);
        let ids: SmallVec<[PlaybackId; 4]> = self.playbacks.keys().collect();
        let mut completed = SmallVec::new();

        for id in ids {
            let starting: SmallVec<[usize; 8]> = match self.playbacks.get_mut(id) {
                Some(playback) => {
                    playback.elapsed += dt;
                    let elapsed = playback.elapsed;
                    playback
                        .tweens
                        .iter()
                        .enumerate()
                        .filter(|(_, active)| {
                            active.phase == Phase::Waiting && elapsed >= active.tween.offset
                        })
                        .map(|(index, _)| index)
                        .collect()
                }
                None => continue,
            };
            for index in starting {
                self.claim(id, index, state);
            }

            let Some(playback) = self.playbacks.get_mut(id) else {
                continue;
            };
            let elapsed = playback.elapsed;
            for (index, active) in playback.tweens.iter_mut().enumerate() {
                if active.phase != Phase::Running {
                    continue;
                }
                let tween = &active.tween;
                let local = ((elapsed - tween.offset) / tween.duration).clamp(0.0, 1.0);
                let value = if local >= 1.0 {
                    tween.track.to
                } else {
                    active.from.lerp(tween.track.to, tween.easing.apply(local))
                };
                state.set(tween.track.property, value);
                if local >= 1.0 {
                    active.phase = Phase::Finished;
                    if self.owners.get(&tween.track.property) == Some(&(id, index)) {
                        self.owners.remove(&tween.track.property);
                    }
                }
            }

            if playback.elapsed >= playback.duration
                && playback.tweens.iter().all(|t| t.phase != Phase::Running)
            {
                tracing::debug!(sequence = playback.name, "sequence complete");
                self.release(id);
                self.playbacks.remove(id);
                completed.push(id);
            }
        }
        completed
    }

    pub fn is_playing(&self, id: PlaybackId) -> bool {
        self.playbacks.contains_key(id)
    }

    pub fn is_idle(&self) -> bool {
        self.playbacks.is_empty()
    }

    /// Whether a running tween currently owns `property`
    pub fn owns(&self, property: Property) -> bool {
        self.owners.contains_key(&property)
    }

    /// Stop a sequence where it is; completion is never reported
    pub fn cancel(&mut self, id: PlaybackId) {
        if self.playbacks.remove(id).is_some() {
            self.release(id);
        }
    }

    pub fn cancel_all(&mut self) {
        self.playbacks.clear();
        self.owners.clear();
    }

    /// Start tween `index` of playback `id`, taking ownership of its property
    fn claim(&mut self, id: PlaybackId, index: usize, state: &mut AnimatedState) {
        let Some(active) = self.playbacks.get_mut(id).and_then(|p| p.tweens.get_mut(index)) else {
            return;
        };
        if active.phase != Phase::Waiting {
            return;
        }
        let property = active.tween.track.property;
        active.phase = Phase::Running;
        match active.tween.track.from {
            Some(from) => {
                active.from = from;
                state.set(property, from);
            }
            None => active.from = state.get(property),
        }

        if let Some((prev_id, prev_index)) = self.owners.insert(property, (id, index)) {
            if (prev_id, prev_index) != (id, index) {
                if let Some(prev) = self
                    .playbacks
                    .get_mut(prev_id)
                    .and_then(|p| p.tweens.get_mut(prev_index))
                {
                    prev.phase = Phase::Cancelled;
                    tracing::debug!(?property, "tween superseded");
                }
            }
        }
    }

    fn release(&mut self, id: PlaybackId) {
        self.owners.retain(|_, (owner, _)| *owner != id);
    }
}
