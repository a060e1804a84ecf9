//! tungstenite-backed connection implementation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, broadcast};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use forward_transport::{Connection, TransportError, TransportResult};

use crate::config::ConnectionOptions;

/// The raw client-side WebSocket stream a connection wraps.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// A [`Connection`] over a client WebSocket stream.
///
/// The stream is split into independent write and read halves behind their
/// own locks, so one concurrent writer and one concurrent reader are safe
/// without external coordination. [`close`](Connection::close) broadcasts a
/// shutdown signal the read loop selects on, which deterministically
/// unblocks a pending [`listen`](Connection::listen) even when the peer
/// never answers the close handshake.
pub struct WsConnection {
    writer: Mutex<WsSink>,
    reader: Mutex<WsSource>,
    options: ConnectionOptions,
    shutdown_tx: broadcast::Sender<()>,
    closed: AtomicBool,
}

impl WsConnection {
    /// Wraps an open stream with the supplied options.
    ///
    /// This is the protocol-framing step of connection establishment;
    /// invalid options surface here as
    /// [`TransportError::ConfigurationError`].
    pub fn wrap(stream: WsStream, options: ConnectionOptions) -> TransportResult<Self> {
        options.validate()?;
        let (writer, reader) = stream.split();
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
            options,
            shutdown_tx,
            closed: AtomicBool::new(false),
        })
    }

    fn check_frame_size(&self, len: usize, on_receive: bool) -> TransportResult<()> {
        if let Some(max) = self.options.max_frame_size
            && len > max
        {
            let message = format!("frame size {len} exceeds limit {max}");
            return Err(if on_receive {
                TransportError::ReceiveFailed(message)
            } else {
                TransportError::SendFailed(message)
            });
        }
        Ok(())
    }

    async fn dispatch(&self, payload: Bytes) -> TransportResult<()> {
        self.check_frame_size(payload.len(), true)?;
        match &self.options.read_handler {
            Some(handler) => handler.on_frame(payload).await,
            None => {
                trace!(len = payload.len(), "dropping inbound frame: no read handler");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn write(&self, payload: Bytes) -> TransportResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionLost("connection closed".into()));
        }
        self.check_frame_size(payload.len(), false)?;

        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Binary(payload))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn listen(&self) -> TransportResult<()> {
        // Subscribe before checking the flag: a close that lands in between
        // is then seen either by the flag or by the broadcast
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionLost("connection closed".into()));
        }
        // Single consumer of the read half for the lifetime of the loop
        let mut reader = self.reader.lock().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("read loop stopped by close");
                    return Ok(());
                }

                frame = reader.next() => match frame {
                    Some(Ok(Message::Binary(payload))) => self.dispatch(payload).await?,
                    Some(Ok(Message::Text(text))) => self.dispatch(text.into()).await?,
                    Some(Ok(Message::Ping(payload))) => {
                        let mut writer = self.writer.lock().await;
                        if let Err(e) = writer.send(Message::Pong(payload)).await {
                            warn!(error = %e, "failed to answer ping");
                        }
                    }
                    Some(Ok(Message::Pong(_))) => trace!("pong received"),
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "close frame received");
                        return Ok(());
                    }
                    Some(Ok(_)) => trace!("ignoring non-data frame"),
                    Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
                    None => {
                        debug!("stream ended");
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn close(&self) -> TransportResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Unblock a pending listen before touching the socket
        let _ = self.shutdown_tx.send(());

        let close_timeout = self.options.close_timeout;
        let mut writer = self.writer.lock().await;
        match tokio::time::timeout(close_timeout, writer.close()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TransportError::CloseFailed(e.to_string())),
            Err(_) => Err(TransportError::CloseFailed(format!(
                "close handshake timed out after {close_timeout:?}"
            ))),
        }
    }
}

impl fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsConnection")
            .field("options", &self.options)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
