//! # Forward Transport
//!
//! Boundary contracts for Fluent Forward transport implementations.
//! This crate defines the capabilities a client-side connection manager
//! consumes without knowing anything about the wire protocol behind them:
//!
//! - **Traits**: [`Connection`], [`ConnectionFactory`], [`ReadHandler`]
//! - **Errors**: [`TransportError`], [`TransportResult`]
//!
//! Transport implementations depend on this crate and implement the
//! [`Connection`] trait; callers that need to substitute how connections are
//! produced (alternate transports, test doubles) implement
//! [`ConnectionFactory`].

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

mod connection;
mod error;
mod factory;

pub use connection::{Connection, ReadHandler};
pub use error::{TransportError, TransportResult};
pub use factory::ConnectionFactory;
