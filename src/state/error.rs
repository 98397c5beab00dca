use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to create state directory '{0}'")]
    StateDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read state file '{0}'")]
    StateRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write state file '{0}'")]
    StateWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode run state from '{0}'")]
    StateDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode run state for '{0}'")]
    StateEncode(String, #[source] Box<bincode::error::EncodeError>),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
