//! Save/restore tuple and its share-link query encoding.
//!
//! A saved session is `(seed, beats, active nodes)`. Transient state (node
//! strength, displacement, wave progress) is never part of it. The query form
//! matches the classic share link:
//!
//! ```text
//! seed=8643&beats=a-min+d-maj&nodes=30+43+44
//! ```

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A beat's scale reference, as saved.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeatSpec {
    pub key: String,
    pub mode: String,
}

impl BeatSpec {
    pub fn new(key: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode: mode.into(),
        }
    }
}

impl fmt::Display for BeatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key, self.mode)
    }
}

impl FromStr for BeatSpec {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.split_once('-') {
            Some((key, mode)) if !key.is_empty() && !mode.is_empty() => Ok(Self::new(key, mode)),
            _ => Err(SimError::MalformedState(format!(
                "beat `{s}` is not of the form key-mode"
            ))),
        }
    }
}

/// Everything needed to replay a session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedState {
    pub seed: u32,
    /// Beats in rotation order
    pub beats: Vec<BeatSpec>,
    /// Row-major indices of active nodes
    pub nodes: Vec<usize>,
}

impl SavedState {
    pub fn new(seed: u32, beats: Vec<BeatSpec>, nodes: Vec<usize>) -> Self {
        Self { seed, beats, nodes }
    }

    /// Render as a URL query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        let beats: Vec<String> = self.beats.iter().map(ToString::to_string).collect();
        let nodes: Vec<String> = self.nodes.iter().map(ToString::to_string).collect();
        format!(
            "seed={}&beats={}&nodes={}",
            self.seed,
            beats.join("+"),
            nodes.join("+")
        )
    }
}

impl fmt::Display for SavedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl FromStr for SavedState {
    type Err = SimError;

    /// Parse a query string. A leading `?` is allowed and unknown parameters
    /// are ignored; the seed is required.
    fn from_str(s: &str) -> SimResult<Self> {
        let query = s.trim().trim_start_matches('?');
        let mut seed = None;
        let mut beats = Vec::new();
        let mut nodes = Vec::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let items = value.split('+').filter(|v| !v.is_empty());

            match name {
                "seed" => {
                    let parsed = value.parse::<u32>().map_err(|_| {
                        SimError::MalformedState(format!("seed `{value}` is not a number"))
                    })?;
                    seed = Some(parsed);
                }
                "beats" => {
                    beats = items.map(str::parse::<BeatSpec>).collect::<SimResult<Vec<BeatSpec>>>()?;
                }
                "nodes" => {
                    nodes = items
                        .map(|v| {
                            v.parse::<usize>().map_err(|_| {
                                SimError::MalformedState(format!("node index `{v}` is not a number"))
                            })
                        })
                        .collect::<SimResult<Vec<usize>>>()?;
                }
                _ => {}
            }
        }

        let seed = seed.ok_or_else(|| SimError::MalformedState("missing seed".into()))?;
        Ok(Self { seed, beats, nodes })
    }
}
