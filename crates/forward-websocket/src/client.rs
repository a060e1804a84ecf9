//! Session and lifecycle client.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info, warn};

use forward_transport::{Connection, ConnectionFactory, TransportError, TransportResult};

use crate::address::ServerAddress;
use crate::auth::AuthInfo;
use crate::config::ConnectionOptions;
use crate::factory::DefaultConnectionFactory;

/// The live pairing of a target address with one open connection.
///
/// Owned exclusively by the client that created it and replaced wholesale on
/// reconnect, never mutated field by field.
#[derive(Clone)]
pub struct Session {
    address: ServerAddress,
    connection: Arc<dyn Connection>,
}

impl Session {
    /// The address this session was established against.
    pub fn address(&self) -> &ServerAddress {
        &self.address
    }

    /// The session's connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Manages the lifetime of a single WebSocket connection.
///
/// The client is either disconnected (no session) or connected (one
/// session); no intermediate state is observable. Lifecycle methods
/// (`connect`, `disconnect`, `reconnect`) are meant to be driven from one
/// controlling task; [`send_message`](Self::send_message) and
/// [`listen`](Self::listen) may run concurrently with each other from
/// separate tasks, which is the one concurrency contract the underlying
/// connection upholds.
pub struct WsClient {
    address: ServerAddress,
    auth: Option<AuthInfo>,
    options: ConnectionOptions,
    factory: OnceLock<Arc<dyn ConnectionFactory>>,
    // Session transitions only; never held across an await
    session: Mutex<Option<Session>>,
}

impl WsClient {
    /// Starts building a client.
    pub fn builder() -> WsClientBuilder {
        WsClientBuilder::default()
    }

    /// Establishes a session by opening a WebSocket connection.
    ///
    /// The connection factory is resolved on first use: when none was
    /// supplied, the default variant is constructed, bound to this client's
    /// address and credential handle. If an [`AuthInfo`] holds a non-empty
    /// token, the default factory passes it via the `Authorization` header
    /// during the opening handshake.
    ///
    /// On failure no session is stored and the factory's error propagates
    /// unchanged. Calling while already connected replaces the session
    /// without closing the old connection; callers wanting to cycle a
    /// connection should use [`reconnect`](Self::reconnect).
    pub async fn connect(&self) -> TransportResult<()> {
        let factory = Arc::clone(self.factory.get_or_init(|| {
            Arc::new(DefaultConnectionFactory::new(
                self.address.clone(),
                self.auth.clone(),
                self.options.clone(),
            ))
        }));

        let connection = factory.new_connection().await?;
        let session = Session {
            address: self.address.clone(),
            connection: Arc::from(connection),
        };

        let replaced = self
            .session
            .lock()
            .expect("session lock poisoned")
            .replace(session);
        if replaced.is_some() {
            warn!(address = %self.address, "connect replaced a live session without closing it");
        }

        info!(address = %self.address, "session established");
        Ok(())
    }

    /// Ends the current session and closes its connection.
    ///
    /// With no session this is a no-op success. The session is cleared
    /// unconditionally - even when the close reports an error - so the
    /// client never keeps a reference to a connection that may be unusable;
    /// the close error, if any, is still returned.
    pub async fn disconnect(&self) -> TransportResult<()> {
        let session = self.session.lock().expect("session lock poisoned").take();
        let Some(session) = session else {
            return Ok(());
        };

        let result = session.connection.close().await;
        match &result {
            Ok(()) => debug!(address = %session.address, "session closed"),
            Err(e) => warn!(address = %session.address, error = %e, "session cleared after failed close"),
        }
        result
    }

    /// Ends the current session and establishes a new one.
    ///
    /// If the disconnect fails, its error is returned and no new connection
    /// attempt is made; the old session is already cleared at that point.
    pub async fn reconnect(&self) -> TransportResult<()> {
        self.disconnect().await?;
        self.connect().await
    }

    /// Serializes a message as MessagePack and sends it as one frame.
    ///
    /// Fails with [`TransportError::NoActiveSession`] when disconnected,
    /// without touching the network.
    pub async fn send_message<M>(&self, message: &M) -> TransportResult<()>
    where
        M: Serialize + ?Sized,
    {
        let connection = self.current_connection()?;
        let payload = rmp_serde::to_vec(message)
            .map_err(|e| TransportError::SerializationFailed(e.to_string()))?;
        connection.write(Bytes::from(payload)).await
    }

    /// Runs the receive loop on the current session's connection.
    ///
    /// Blocks until the connection closes or a fatal read error occurs; see
    /// [`Connection::listen`] for the contract. Fails with
    /// [`TransportError::NoActiveSession`] when disconnected. Meant to run
    /// on a dedicated task for the lifetime of a session, concurrently with
    /// [`send_message`](Self::send_message) calls from other tasks.
    pub async fn listen(&self) -> TransportResult<()> {
        let connection = self.current_connection()?;
        connection.listen().await
    }

    /// Returns `true` while a session is established.
    pub fn is_connected(&self) -> bool {
        self.session
            .lock()
            .expect("session lock poisoned")
            .is_some()
    }

    /// The address of the current session, if any.
    pub fn session_address(&self) -> Option<ServerAddress> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.address.clone())
    }

    fn current_connection(&self) -> TransportResult<Arc<dyn Connection>> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| Arc::clone(&s.connection))
            .ok_or(TransportError::NoActiveSession)
    }
}

impl fmt::Debug for WsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsClient")
            .field("address", &self.address)
            .field("options", &self.options)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Builder for [`WsClient`].
#[derive(Default)]
pub struct WsClientBuilder {
    address: ServerAddress,
    auth: Option<AuthInfo>,
    options: ConnectionOptions,
    factory: Option<Arc<dyn ConnectionFactory>>,
}

impl WsClientBuilder {
    /// Sets the endpoint to dial.
    #[must_use]
    pub fn address(mut self, address: ServerAddress) -> Self {
        self.address = address;
        self
    }

    /// Attaches a shared credential handle.
    #[must_use]
    pub fn auth(mut self, auth: AuthInfo) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the connection options.
    #[must_use]
    pub fn options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the connection factory. When absent, the default
    /// dial-based factory is constructed lazily on the first connect.
    #[must_use]
    pub fn factory(mut self, factory: Arc<dyn ConnectionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Builds the client in the disconnected state.
    pub fn build(self) -> WsClient {
        let factory = OnceLock::new();
        if let Some(supplied) = self.factory {
            let _ = factory.set(supplied);
        }
        WsClient {
            address: self.address,
            auth: self.auth,
            options: self.options,
            factory,
            session: Mutex::new(None),
        }
    }
}

impl fmt::Debug for WsClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsClientBuilder")
            .field("address", &self.address)
            .field("options", &self.options)
            .field("factory", &self.factory.is_some())
            .finish_non_exhaustive()
    }
}
