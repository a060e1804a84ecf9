//! Connection options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use forward_transport::{ReadHandler, TransportError, TransportResult};

/// Default bound on a single frame, inbound or outbound.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Controls how a raw WebSocket stream is wrapped into a
/// [`Connection`](forward_transport::Connection).
///
/// An immutable bundle: built once, cloned into the connection at wrapping
/// time, never mutated afterwards.
#[derive(Clone)]
pub struct ConnectionOptions {
    /// Frames larger than this are rejected on both the read and write path.
    /// `None` disables the check.
    pub max_frame_size: Option<usize>,

    /// Bound on the dial handshake.
    pub connect_timeout: Duration,

    /// Bound on the close handshake.
    pub close_timeout: Duration,

    /// Dispatch target for inbound data frames. With no handler configured,
    /// frames are dropped at trace level.
    pub read_handler: Option<Arc<dyn ReadHandler>>,
}

impl ConnectionOptions {
    /// Creates options with default limits and no read handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-frame size limit.
    #[must_use]
    pub fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = Some(size);
        self
    }

    /// Sets the dial handshake timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the close handshake timeout.
    #[must_use]
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Sets the inbound frame handler.
    #[must_use]
    pub fn with_read_handler(mut self, handler: Arc<dyn ReadHandler>) -> Self {
        self.read_handler = Some(handler);
        self
    }

    /// Rejects option combinations no connection can honor.
    pub fn validate(&self) -> TransportResult<()> {
        if self.max_frame_size == Some(0) {
            return Err(TransportError::ConfigurationError(
                "max_frame_size must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(TransportError::ConfigurationError(
                "connect_timeout must be greater than zero".to_string(),
            ));
        }
        if self.close_timeout.is_zero() {
            return Err(TransportError::ConfigurationError(
                "close_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            max_frame_size: Some(DEFAULT_MAX_FRAME_SIZE),
            connect_timeout: Duration::from_secs(10),
            close_timeout: Duration::from_secs(5),
            read_handler: None,
        }
    }
}

// Manual Debug since the read handler is opaque
impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("max_frame_size", &self.max_frame_size)
            .field("connect_timeout", &self.connect_timeout)
            .field("close_timeout", &self.close_timeout)
            .field("read_handler", &self.read_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = ConnectionOptions::default();
        assert_eq!(options.max_frame_size, Some(DEFAULT_MAX_FRAME_SIZE));
        assert!(options.read_handler.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        let options = ConnectionOptions::new().with_max_frame_size(0);
        assert!(matches!(
            options.validate(),
            Err(TransportError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let options = ConnectionOptions::new().with_connect_timeout(Duration::ZERO);
        assert!(options.validate().is_err());

        let options = ConnectionOptions::new().with_close_timeout(Duration::ZERO);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let options = ConnectionOptions::new()
            .with_max_frame_size(1024)
            .with_connect_timeout(Duration::from_secs(2))
            .with_close_timeout(Duration::from_secs(1));

        assert_eq!(options.max_frame_size, Some(1024));
        assert_eq!(options.connect_timeout, Duration::from_secs(2));
        assert_eq!(options.close_timeout, Duration::from_secs(1));
    }
}
