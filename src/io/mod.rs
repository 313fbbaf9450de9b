// Purpose - boundaries to the collaborators around the simulation

pub mod input;
pub mod playback;
pub mod render;
pub mod state;
