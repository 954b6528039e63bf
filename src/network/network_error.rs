use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the command being executed. Travels back as a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RemoteExecutionError {
    #[error("unknown engine '{0}'")]
    UnknownEngine(String),

    #[error("engine '{engine}' failed: {message}")]
    Engine { engine: String, message: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// Request bytes that are not a command.
    #[error("cannot decode request: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    RemoteExecution(#[from] RemoteExecutionError),

    #[error("cannot encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("connection closed before a reply arrived")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
