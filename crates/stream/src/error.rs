use crate::controller::StreamState;

/// Authoring mistakes caught before a session starts. Never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("segment template catalog is empty")]
    EmptyCatalog,
    #[error("segment length must be positive, got {0}")]
    NonPositiveSegmentLength(f32),
    #[error("segment length {0} is too small to move the frontier")]
    SegmentLengthTooSmall(f32),
    #[error("segments_to_keep must be at least 1")]
    ZeroRetention,
    #[error("pre-generation distance must not be negative, got {0}")]
    NegativePreGeneration(f32),
    #[error("{0} must be a finite number")]
    NonFiniteValue(&'static str),
    #[error("spawn anchor is not assigned")]
    MissingSpawnAnchor,
    #[error("player template is not assigned")]
    MissingPlayerTemplate,
}

/// Errors surfaced by [`crate::StreamController`] lifecycle calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    #[error("invalid level configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("world factory failed to spawn the player anchor")]
    PlayerSpawnFailed,
    #[error("cannot {operation} while controller is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: StreamState,
    },
}

/// Errors from reading a level file off disk.
#[derive(Debug, thiserror::Error)]
pub enum LevelFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown template name: {0}")]
    UnknownTemplate(String),
}
