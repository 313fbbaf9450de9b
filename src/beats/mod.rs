//! Ordered beat set and the rotation that decides which beat fires next.
//!
//! Rotation is a two-state machine evaluated once per tick, after every beat
//! has advanced:
//!
//! ```text
//!   NoneCurrent ──(set non-empty)──> CurrentActive(0)
//!   CurrentActive(i) ──(next idle, room, current far enough)──> CurrentActive(i + 1 mod n)
//! ```
//!
//! "Room" means fewer than `frequency` beats are mid-flight; "far enough"
//! means the current wave has covered more than `1 / frequency` of its
//! course. At most `frequency` waves are ever in flight and launches are
//! evenly spaced.

pub mod beat;

pub use beat::Beat;

use tracing::debug;

use crate::{
    error::{SimError, SimResult},
    ids::IdGenerator,
};

/// Rotation state of a [`BeatSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    NoneCurrent,
    CurrentActive { index: usize },
}

pub struct BeatSet {
    beats: Vec<Beat>,
    current: Option<usize>,
    limit: usize,
    frequency: usize,
}

impl BeatSet {
    pub fn new(limit: usize, frequency: usize) -> Self {
        Self {
            beats: Vec::with_capacity(limit),
            current: None,
            limit,
            frequency: frequency.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.beats.len() >= self.limit
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Maximum number of waves in flight at once.
    pub fn frequency(&self) -> usize {
        self.frequency
    }

    pub fn get(&self, index: usize) -> Option<&Beat> {
        self.beats.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beat> {
        self.beats.iter()
    }

    pub fn rotation(&self) -> Rotation {
        match self.current {
            Some(index) => Rotation::CurrentActive { index },
            None => Rotation::NoneCurrent,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Beat> {
        self.current.and_then(|index| self.beats.get(index))
    }

    pub fn active_count(&self) -> usize {
        self.beats.iter().filter(|beat| beat.is_active()).count()
    }

    /// Append a beat at the end of the rotation.
    pub fn push(&mut self, mut beat: Beat) -> SimResult<usize> {
        if self.is_full() {
            return Err(SimError::BeatLimitExceeded { limit: self.limit });
        }
        let index = self.beats.len();
        beat.set_sequence_index(index);
        self.beats.push(beat);
        Ok(index)
    }

    /// Remove the beat at `index` and re-pack the ones after it.
    ///
    /// Removing the current beat drops the rotation back to `NoneCurrent`.
    pub fn remove(&mut self, index: usize) -> SimResult<Beat> {
        if index >= self.beats.len() {
            return Err(SimError::UnknownBeatIndex {
                index,
                len: self.beats.len(),
            });
        }

        let removed = self.beats.remove(index);
        self.current = match self.current {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        self.repack();
        Ok(removed)
    }

    /// Drop every beat and clear the rotation.
    pub fn clear(&mut self) {
        self.beats.clear();
        self.current = None;
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> SimResult<&mut Beat> {
        let len = self.beats.len();
        self.beats
            .get_mut(index)
            .ok_or(SimError::UnknownBeatIndex { index, len })
    }

    pub(crate) fn beats_mut(&mut self) -> &mut [Beat] {
        &mut self.beats
    }

    /// Evaluate the rotation. Returns the index of a beat launched this tick.
    pub(crate) fn rotate(&mut self, ids: &mut IdGenerator) -> Option<usize> {
        if self.beats.is_empty() {
            return None;
        }

        let launch = match self.current {
            None => 0,
            Some(current) => {
                let next = (current + 1) % self.beats.len();
                let in_flight = self.active_count();
                let spacing = 1.0 / self.frequency as f64;

                if self.beats[next].is_active()
                    || in_flight >= self.frequency
                    || self.beats[current].strength() <= spacing
                {
                    return None;
                }
                next
            }
        };

        let generation = ids.next_id();
        let beat = &mut self.beats[launch];
        beat.activate(generation);
        debug!(
            index = launch,
            generation,
            key = beat.key(),
            mode = beat.mode(),
            "beat launched"
        );

        self.current = Some(launch);
        Some(launch)
    }

    fn repack(&mut self) {
        for (index, beat) in self.beats.iter_mut().enumerate() {
            beat.set_sequence_index(index);
        }
    }
}
