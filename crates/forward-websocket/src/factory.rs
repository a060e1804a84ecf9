//! Default dial-based connection factory.

use async_trait::async_trait;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tracing::debug;

use forward_transport::{Connection, ConnectionFactory, TransportError, TransportResult};

use crate::address::ServerAddress;
use crate::auth::AuthInfo;
use crate::config::ConnectionOptions;
use crate::connection::WsConnection;

/// The [`ConnectionFactory`] a client falls back to when none is supplied.
///
/// Dials the configured address with `connect_async`. When an [`AuthInfo`]
/// is attached and its token is non-empty, the token is sent as the
/// `Authorization` header on the opening handshake - once per connection
/// attempt, never per message. Dial failures surface verbatim as
/// [`TransportError::ConnectionFailed`] with no classification: an
/// authentication rejection looks the same as an unreachable host.
#[derive(Debug, Clone)]
pub struct DefaultConnectionFactory {
    address: ServerAddress,
    auth: Option<AuthInfo>,
    options: ConnectionOptions,
}

impl DefaultConnectionFactory {
    /// Creates a factory bound to an address, an optional credential
    /// handle, and the options new connections are wrapped with.
    pub fn new(
        address: ServerAddress,
        auth: Option<AuthInfo>,
        options: ConnectionOptions,
    ) -> Self {
        Self {
            address,
            auth,
            options,
        }
    }
}

#[async_trait]
impl ConnectionFactory for DefaultConnectionFactory {
    async fn new_connection(&self) -> TransportResult<Box<dyn Connection>> {
        let mut request = self
            .address
            .to_string()
            .into_client_request()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        if let Some(auth) = &self.auth {
            let token = auth.token();
            if !token.is_empty() {
                let value = HeaderValue::from_str(&token).map_err(|e| {
                    TransportError::ConfigurationError(format!(
                        "credential is not a valid header value: {e}"
                    ))
                })?;
                request.headers_mut().insert(AUTHORIZATION, value);
            }
        }

        debug!(address = %self.address, "dialing websocket endpoint");
        let (stream, _response) =
            tokio::time::timeout(self.options.connect_timeout, connect_async(request))
                .await
                .map_err(|_| {
                    TransportError::ConnectionFailed(format!(
                        "handshake timed out after {:?}",
                        self.options.connect_timeout
                    ))
                })?
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let connection = WsConnection::wrap(stream, self.options.clone())?;
        Ok(Box::new(connection))
    }
}
