//! # Forward WebSocket
//!
//! Client-side connection manager for a single persistent Fluent Forward
//! event stream carried over a WebSocket.
//!
//! The crate owns the connection lifecycle (connect, disconnect, reconnect),
//! MessagePack serialization of outbound messages, and the blocking receive
//! loop. The wire transport itself is reached through the capabilities in
//! [`forward-transport`](forward_transport): the client consumes an opaque
//! [`Connection`] produced by a pluggable [`ConnectionFactory`], so both can
//! be substituted for testing or alternate transports.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forward_websocket::{AuthInfo, ServerAddress, WsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = AuthInfo::new("Bearer my-token");
//! let client = WsClient::builder()
//!     .address(ServerAddress::new("logs.example.com", 24224).with_tls())
//!     .auth(auth.clone())
//!     .build();
//!
//! client.connect().await?;
//! client.send_message(&("tag.name", 1441588984, "log line")).await?;
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! forward-websocket/
//! ├── auth.rs       # Shared bearer-credential holder
//! ├── address.rs    # Immutable endpoint value
//! ├── config.rs     # Connection options (limits, timeouts, read handler)
//! ├── connection.rs # tungstenite-backed Connection implementation
//! ├── factory.rs    # Default dial-based ConnectionFactory
//! └── client.rs     # Session and lifecycle client
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod address;
pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod factory;

// Re-export main types for convenience
pub use address::{Scheme, ServerAddress};
pub use auth::AuthInfo;
pub use client::{Session, WsClient, WsClientBuilder};
pub use config::ConnectionOptions;
pub use connection::WsConnection;
pub use factory::DefaultConnectionFactory;

// Re-export boundary contracts for convenience
pub use forward_transport::{
    Connection, ConnectionFactory, ReadHandler, TransportError, TransportResult,
};
