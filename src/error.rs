use thiserror::Error;

use crate::grid::NodeId;

/// Every way a command against a [`Simulation`](crate::Simulation) can be
/// rejected. None of these are fatal: the simulation state is left as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A beat asked for a key/mode pair the scale table does not hold.
    #[error("unknown scale `{key}-{mode}`")]
    InvalidScaleReference { key: String, mode: String },

    /// The beat set is already at its configured capacity.
    #[error("beat limit of {limit} reached")]
    BeatLimitExceeded { limit: usize },

    /// A command referenced a node id this grid never issued.
    #[error("unknown node id {0}")]
    UnknownNodeId(NodeId),

    /// A command referenced a row-major node index outside the grid.
    #[error("unknown node index {0}")]
    UnknownNodeIndex(usize),

    /// A command referenced a beat position outside the beat set.
    #[error("unknown beat index {index} (beat set holds {len})")]
    UnknownBeatIndex { index: usize, len: usize },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A saved-state string could not be parsed.
    #[error("malformed saved state: {0}")]
    MalformedState(String),
}

pub type SimResult<T> = Result<T, SimError>;
