use std::{
    future::Future,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;

use crate::{
    config::NetworkConfig,
    network::{frame_codec, Command, EngineRegistry, NetworkObject, RemoteError, Reply, TransportError},
};

/// Counters kept by a listener. Readable while it serves.
#[derive(Debug, Default)]
pub struct ListenerStats {
    requests: AtomicU64,
    replies: AtomicU64,
    decode_failures: AtomicU64,
    execution_failures: AtomicU64,
}

impl ListenerStats {
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn replies(&self) -> u64 {
        self.replies.load(Ordering::Relaxed)
    }

    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    pub fn execution_failures(&self) -> u64 {
        self.execution_failures.load(Ordering::Relaxed)
    }
}

/// Request/reply listener: one connection at a time, one request at a time.
/// A connection idle for longer than the configured timeout is closed so the
/// next peer can be served. The socket closes when the listener is dropped.
pub struct NetworkIn {
    listener: TcpListener,
    engines: EngineRegistry,
    host: String,
    max_frame_length: usize,
    idle_timeout: Duration,
    stats: Arc<ListenerStats>,
}

impl NetworkIn {
    pub async fn bind(config: &NetworkConfig, engines: EngineRegistry) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        tracing::info!(address = %listener.local_addr()?, ?engines, "command listener bound");
        Ok(Self {
            listener,
            engines,
            host: config.address.clone(),
            max_frame_length: config.max_frame_length,
            idle_timeout: config.idle_timeout(),
            stats: Arc::new(ListenerStats::default()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn stats(&self) -> Arc<ListenerStats> {
        self.stats.clone()
    }

    /// Serves connections until `shutdown` resolves, then drops the listener.
    pub async fn serve_until<S>(self, shutdown: S) -> Result<(), TransportError>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let socket = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        tracing::debug!(%peer, "connection accepted");
                        socket
                    },
                    Err(err) => {
                        tracing::warn!(error = ?err, "accept failed");
                        continue;
                    },
                },
            };

            tokio::select! {
                _ = &mut shutdown => break,
                served = self.serve_connection(socket) => {
                    if let Err(err) = served {
                        tracing::debug!(error = ?err, "command connection closed");
                    }
                },
            }
        }
        tracing::info!(requests = self.stats.requests(), replies = self.stats.replies(), "command listener stopped");
        Ok(())
    }

    async fn serve_connection(&self, socket: TcpStream) -> Result<(), TransportError> {
        let mut framed = Framed::new(socket, frame_codec(self.max_frame_length));

        loop {
            let frame = match tokio::time::timeout(self.idle_timeout, framed.next()).await {
                Ok(Some(frame)) => frame?,
                Ok(None) => break,
                Err(_) => {
                    tracing::debug!(idle_ms = self.idle_timeout.as_millis() as u64, "idle connection closed");
                    break;
                },
            };
            self.stats.requests.fetch_add(1, Ordering::Relaxed);

            let command: Command = match serde_json::from_slice(&frame) {
                Ok(command) => command,
                Err(err) => {
                    self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(error = %TransportError::Decode(err), len = frame.len(), "request dropped");
                    continue;
                },
            };

            let reply = match command.execute(&self.engines).map(Reply::Ok) {
                Ok(reply) => reply.encode().unwrap_or_else(|err| Reply::encode_error(self.remote_error(&err))),
                Err(err) => {
                    self.stats.execution_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(error = %err, "command failed");
                    Reply::encode_error(self.remote_error(&err))
                },
            };

            framed.send(reply).await?;
            self.stats.replies.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn remote_error(&self, err: &dyn std::error::Error) -> RemoteError {
        RemoteError {
            message: format!(
                "The request command could not be executed on the remote server (host: {}). {}",
                self.host, err
            ),
            host: self.host.clone(),
        }
    }
}
