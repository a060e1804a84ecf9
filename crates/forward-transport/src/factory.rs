//! The pluggable connection-construction capability.

use async_trait::async_trait;

use crate::connection::Connection;
use crate::error::TransportResult;

/// Produces one freshly opened, protocol-framed [`Connection`] per call.
///
/// The capability is fully swappable: a client must accept any supplied
/// implementation (alternate transports, test doubles) and only construct
/// its default variant lazily when none was supplied. Errors surface
/// verbatim; no retry or classification happens inside a factory.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// Opens a new connection to the configured endpoint.
    ///
    /// The returned connection is a live network resource; the caller is
    /// responsible for eventually closing it.
    async fn new_connection(&self) -> TransportResult<Box<dyn Connection>>;
}
