//! The connection capability and its frame-dispatch companion.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportResult;

/// A single open, protocol-framed connection.
///
/// Implementations must tolerate exactly one concurrent writer ([`write`])
/// and one concurrent reader ([`listen`]) without external locking; more
/// than one of each is not part of the contract.
///
/// [`write`]: Connection::write
/// [`listen`]: Connection::listen
#[async_trait]
pub trait Connection: Send + Sync {
    /// Sends one already-encoded message as a single frame.
    async fn write(&self, payload: Bytes) -> TransportResult<()>;

    /// Runs the receive loop, dispatching inbound frames until the
    /// connection closes.
    ///
    /// Blocks the calling task until the peer closes the connection or the
    /// stream ends (returns `Ok`), a fatal read error occurs (returns that
    /// error), or [`close`] is invoked from another task, which must
    /// deterministically unblock a pending `listen`. Not reentrant: it is
    /// not meant to be called concurrently with itself.
    ///
    /// [`close`]: Connection::close
    async fn listen(&self) -> TransportResult<()>;

    /// Closes the connection, releasing the underlying network resource.
    ///
    /// Idempotent: calls after the first are a no-op success.
    async fn close(&self) -> TransportResult<()>;
}

impl std::fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Connection")
    }
}

/// Receives inbound frames from a connection's read loop.
///
/// An error returned from [`on_frame`] is fatal to the read loop and becomes
/// the outcome of [`Connection::listen`].
///
/// [`on_frame`]: ReadHandler::on_frame
#[async_trait]
pub trait ReadHandler: Send + Sync {
    /// Called with the payload of each inbound data frame.
    async fn on_frame(&self, payload: Bytes) -> TransportResult<()>;
}
