use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::{
    bytes::Bytes,
    codec::{LengthDelimitedCodec, length_delimited},
};

use crate::network::TransportError;

/// Error as seen by the client: what failed and on which host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    pub message: String,
    pub host: String,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (host: {})", self.message, self.host)
        }
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "lowercase")]
pub enum Reply {
    Ok(Value),
    Err(RemoteError),
}

impl Reply {
    pub fn encode(&self) -> Result<Bytes, TransportError> {
        serde_json::to_vec(self).map(Bytes::from).map_err(TransportError::Encode)
    }

    /// Error reply, falling back to the bare message when the envelope cannot be encoded.
    pub fn encode_error(error: RemoteError) -> Bytes {
        let message = error.message.clone();
        match Reply::Err(error).encode() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(error = %err, "error reply could not be encoded, sending plain text");
                Bytes::from(message.into_bytes())
            },
        }
    }

    /// Reads a reply frame. Anything that is not an envelope is taken as a plain-text error.
    pub fn decode(frame: &[u8]) -> Result<Value, RemoteError> {
        match serde_json::from_slice::<Reply>(frame) {
            Ok(Reply::Ok(value)) => Ok(value),
            Ok(Reply::Err(error)) => Err(error),
            Err(_) => Err(RemoteError { message: String::from_utf8_lossy(frame).into_owned(), host: String::new() }),
        }
    }
}

/// Length-prefixed frames: a 4 byte big-endian length, then the payload.
pub fn frame_codec(max_frame_length: usize) -> LengthDelimitedCodec {
    length_delimited::Builder::new().max_frame_length(max_frame_length).new_codec()
}
