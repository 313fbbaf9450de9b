pub mod beats; // Wave emitters and rotation
pub mod engine; // Tick loop, config, delayed effects
pub mod error;
pub mod geometry;
pub mod grid; // Node lattice and displacement
pub mod ids;
pub mod io; // Input, playback, render and save/restore boundaries
pub mod scale; // Frequencies and seeded note assignment
pub mod synth; // Reference audio collaborator

pub use engine::{SimConfig, Simulation, TickReport};
pub use error::{SimError, SimResult};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
