//! Immutable endpoint value for the remote server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// WebSocket URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain-text WebSocket.
    Ws,
    /// TLS-secured WebSocket.
    Wss,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ws => write!(f, "ws"),
            Self::Wss => write!(f, "wss"),
        }
    }
}

/// Identifies the remote endpoint a client dials.
///
/// An immutable value; `Display` renders the dialable URL
/// (`{scheme}://{host}:{port}{path}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl ServerAddress {
    /// Creates a plain `ws` address with path `/`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: Scheme::Ws,
            host: host.into(),
            port,
            path: "/".to_string(),
        }
    }

    /// Switches the scheme to `wss`.
    #[must_use]
    pub fn with_tls(mut self) -> Self {
        self.scheme = Scheme::Wss;
        self
    }

    /// Sets the request path; a leading `/` is added when missing.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// The URL scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The remote host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The remote port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for ServerAddress {
    // The Fluent Forward default port
    fn default() -> Self {
        Self::new("127.0.0.1", 24224)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let addr = ServerAddress::default();
        assert_eq!(addr.to_string(), "ws://127.0.0.1:24224/");
    }

    #[test]
    fn test_tls_and_path() {
        let addr = ServerAddress::new("logs.example.com", 443)
            .with_tls()
            .with_path("forward");
        assert_eq!(addr.scheme(), Scheme::Wss);
        assert_eq!(addr.to_string(), "wss://logs.example.com:443/forward");
    }

    #[test]
    fn test_path_keeps_leading_slash() {
        let addr = ServerAddress::new("host", 8080).with_path("/already");
        assert_eq!(addr.path(), "/already");
    }
}
