use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_util::{bytes::Bytes, codec::Framed};

use crate::{
    config::NetworkConfig,
    network::{frame_codec, Command, RemoteError, Reply, TransportError},
};

/// Client side of the command protocol: one connection per request.
#[derive(Debug, Clone)]
pub struct NetworkOut {
    max_frame_length: usize,
}

impl NetworkOut {
    pub fn new(config: &NetworkConfig) -> Self {
        Self { max_frame_length: config.max_frame_length }
    }

    /// Sends `command` to `addr` and waits for its reply.
    /// The outer error is a transport failure; the inner one was raised by the remote host.
    pub async fn send(&self, addr: &str, command: &Command) -> Result<Result<Value, RemoteError>, TransportError> {
        let socket = TcpStream::connect(addr).await?;
        let mut framed = Framed::new(socket, frame_codec(self.max_frame_length));

        let payload = serde_json::to_vec(command).map_err(TransportError::Encode)?;
        framed.send(Bytes::from(payload)).await?;

        match framed.next().await {
            Some(frame) => {
                let reply = Reply::decode(&frame?);
                if let Err(err) = &reply {
                    tracing::debug!(%addr, error = %err, "remote host reported an error");
                }
                Ok(reply)
            },
            None => Err(TransportError::Closed),
        }
    }
}
