//! Capability traits between the link actor and the platform radio.
//!
//! The actor only ever sees these traits, so tests drive it with in-memory
//! duplex links instead of a real adapter.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Failures surfaced by the link layer. None is fatal to the process; the
/// operator re-triggers after the actor has resolved back to
/// `Disconnected`/`Lost`.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Bluetooth is not available on this platform: {0}")]
    PlatformUnsupported(String),
    #[error("Bluetooth is disabled; enable the adapter and retry")]
    RadioDisabled,
    #[error("device '{0}' is not in the bonded device list")]
    PeerNotFound(String),
    #[error("could not create RFCOMM socket: {0}")]
    SocketCreateFailed(String),
    #[error("connection failed: {0}")]
    ConnectFailed(String),
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
}

/// A bonded peer resolved by name at connect time; never persisted beyond
/// the attempt.
#[derive(Debug, Clone)]
pub struct Peer {
    pub name: String,
    pub address: String,
}

/// Write half of an established link.
#[async_trait]
pub trait LinkWriter: Send {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError>;
    async fn shutdown(&mut self);
}

/// Read half of an established link. `Ok(0)` signals end of stream.
#[async_trait]
pub trait ByteSource: Send {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;
}

/// Both halves of a freshly established link.
pub struct LinkPair {
    pub writer: Box<dyn LinkWriter>,
    pub source: Box<dyn ByteSource>,
}

/// Platform radio capability: resolve the bonded peer by name, then open a
/// serial stream to it.
#[async_trait]
pub trait Connector: Send {
    async fn resolve(&self, device_name: &str) -> Result<Peer, LinkError>;
    async fn open(&self, peer: &Peer) -> Result<LinkPair, LinkError>;
}

/// [`LinkWriter`] over any tokio write half.
pub struct IoLinkWriter<W> {
    inner: W,
}

impl<W> IoLinkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> LinkWriter for IoLinkWriter<W> {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.inner
            .write_all(bytes)
            .await
            .map_err(|e| LinkError::SendFailed(e.to_string()))?;
        self.inner
            .flush()
            .await
            .map_err(|e| LinkError::SendFailed(e.to_string()))
    }

    async fn shutdown(&mut self) {
        let _ = self.inner.shutdown().await;
    }
}

/// [`ByteSource`] over any tokio read half.
pub struct IoByteSource<R> {
    inner: R,
}

impl<R> IoByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ByteSource for IoByteSource<R> {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.inner
            .read(buf)
            .await
            .map_err(|e| LinkError::ReadFailed(e.to_string()))
    }
}
