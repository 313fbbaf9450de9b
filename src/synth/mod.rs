// Purpose: reference audio collaborator - turns playback events into pings
// Runs on the audio thread; reads events, never touches the simulation

pub mod envelope;
pub mod poly;
pub mod voice;

pub use poly::PingSynth;
pub use voice::PingVoice;
