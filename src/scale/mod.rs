/*
Scale Table
===========

Every beat plays its nodes through a scale: an ordered run of ten
frequencies bound to a (key, mode) pair. The table is fixed data, built once
and never mutated while a session runs.

Only the key of A is written out by hand. The other keys are *derived* by
multiplying every frequency of the A scale by a harmonic ratio:

    d = a * 4/3    (perfect fourth)
    e = a * 3/2    (perfect fifth)

The multiplication happens in f64, one frequency at a time, so a derived
scale is bit-identical for a given base scale and ratio.

Note assignment
---------------

A node does not own a pitch, it owns a *position in the scale*:

    note_index = (seed * (row * columns + column)) mod scale_len

The same seed over the same grid always yields the same note field, which is
what makes a shared pattern replay identically. The modulus leaves some
linearity in the result: indices step in a repeating pattern across each row.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{SimError, SimResult},
    geometry::GridCoord,
};

/// Number of frequencies in every scale.
pub const SCALE_LEN: usize = 10;

// Frequencies in Hz, A3 upward.
const A_MINOR: [f64; SCALE_LEN] = [
    220.0, 246.9, 261.6, 293.7, 329.6, 349.2, 415.3, 440.0, 493.9, 523.3,
];
const A_MAJOR: [f64; SCALE_LEN] = [
    220.0, 246.9, 277.2, 293.7, 329.6, 370.0, 415.3, 440.0, 493.9, 554.4,
];

/// Display colour of a scale, in HSL.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Ten frequencies bound to a key and mode.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    key: String,
    mode: String,
    frequencies: [f64; SCALE_LEN],
    color: Hsl,
}

impl Scale {
    pub fn new(
        key: impl Into<String>,
        mode: impl Into<String>,
        frequencies: [f64; SCALE_LEN],
        color: Hsl,
    ) -> Self {
        Self {
            key: key.into(),
            mode: mode.into(),
            frequencies,
            color,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn frequencies(&self) -> &[f64; SCALE_LEN] {
        &self.frequencies
    }

    pub fn color(&self) -> Hsl {
        self.color
    }

    /// Frequency for a note index; indices wrap around the scale.
    pub fn frequency(&self, note_index: usize) -> f64 {
        self.frequencies[note_index % SCALE_LEN]
    }

    pub fn len(&self) -> usize {
        SCALE_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Scale a base scale by a harmonic ratio, one frequency at a time.
pub fn generate_scale_from(base: &[f64; SCALE_LEN], ratio: f64) -> [f64; SCALE_LEN] {
    let mut out = [0.0; SCALE_LEN];
    for (o, &freq) in out.iter_mut().zip(base) {
        *o = freq * ratio;
    }
    out
}

/// Seeded note assignment for a grid cell.
///
/// Pure in all of its arguments. Computed in `u64` so no seed/grid
/// combination can overflow.
pub fn note_index(seed: u32, coord: GridCoord, columns: u32, scale_len: usize) -> usize {
    let cell = coord.to_index(columns) as u64;
    ((seed as u64 * cell) % scale_len.max(1) as u64) as usize
}

/// Immutable lookup from (key, mode) to [`Scale`].
#[derive(Debug, Clone, Default)]
pub struct ScaleTable {
    scales: Vec<Scale>,
}

impl ScaleTable {
    /// An empty table.
    pub fn new() -> Self {
        Self { scales: Vec::new() }
    }

    /// Keys a, d and e in minor and major.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert(Scale::new("a", "min", A_MINOR, Hsl::new(180, 90, 50)));
        table.insert(Scale::new("a", "maj", A_MAJOR, Hsl::new(160, 90, 50)));

        for (key, ratio, min_hue, maj_hue) in [("d", 4.0 / 3.0, 140, 120), ("e", 3.0 / 2.0, 100, 80)] {
            table.insert(Scale::new(
                key,
                "min",
                generate_scale_from(&A_MINOR, ratio),
                Hsl::new(min_hue, 90, 50),
            ));
            table.insert(Scale::new(
                key,
                "maj",
                generate_scale_from(&A_MAJOR, ratio),
                Hsl::new(maj_hue, 90, 50),
            ));
        }

        table
    }

    /// Add a scale, replacing any existing entry for the same key and mode.
    pub fn insert(&mut self, scale: Scale) {
        match self
            .scales
            .iter_mut()
            .find(|s| s.key == scale.key && s.mode == scale.mode)
        {
            Some(existing) => *existing = scale,
            None => self.scales.push(scale),
        }
    }

    /// Add a scale derived from an existing one by a frequency ratio.
    pub fn derive(
        &mut self,
        key: &str,
        from_key: &str,
        mode: &str,
        ratio: f64,
        color: Hsl,
    ) -> SimResult<()> {
        let base = *self.resolve(from_key, mode)?.frequencies();
        self.insert(Scale::new(key, mode, generate_scale_from(&base, ratio), color));
        Ok(())
    }

    /// Look up a scale, failing with `InvalidScaleReference`.
    pub fn resolve(&self, key: &str, mode: &str) -> SimResult<&Scale> {
        self.get(key, mode)
            .ok_or_else(|| SimError::InvalidScaleReference {
                key: key.to_string(),
                mode: mode.to_string(),
            })
    }

    pub fn get(&self, key: &str, mode: &str) -> Option<&Scale> {
        self.scales.iter().find(|s| s.key == key && s.mode == mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scale> {
        self.scales.iter()
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}
