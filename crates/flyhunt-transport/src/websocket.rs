//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! Each accepted socket is split: the read half is owned by whoever
//! calls [`Connection::recv`], while the write half is drained by a
//! dedicated writer task fed from an unbounded channel. That is what
//! makes [`Connection::send`] synchronous and non-blocking.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message;

use flyhunt_protocol::ClientId;

use crate::{Connection, Transport, TransportError};

/// Counter for assigning connection ids.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    /// The address the listener is actually bound to.
    ///
    /// Binding to port 0 lets the OS pick; this is how callers find out
    /// what it picked.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            TransportError::AcceptFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let id = ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        let (sink, stream) = ws.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(id, sink, outbound_rx));

        Ok(WebSocketConnection {
            id,
            outbound,
            inbound: Mutex::new(stream),
        })
    }
}

/// Drains the outbound queue into the socket until either side is gone.
async fn write_loop(
    id: ClientId,
    mut sink: SplitSink<WsStream, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    use futures_util::SinkExt;

    while let Some(msg) = rx.recv().await {
        if let Err(e) = sink.send(msg).await {
            tracing::debug!(%id, error = %e, "outbound write failed");
            break;
        }
    }
    let _ = sink.close().await;
    tracing::debug!(%id, "writer task stopped");
}

/// A single WebSocket connection.
pub struct WebSocketConnection {
    id: ClientId,
    outbound: mpsc::UnboundedSender<Message>,
    inbound: Mutex<SplitStream<WsStream>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.outbound
            .send(Message::Binary(data.to_vec().into()))
            .map_err(|_| TransportError::ConnectionClosed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut stream = self.inbound.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    fn close(&self) {
        let _ = self.outbound.send(Message::Close(None));
    }

    fn id(&self) -> ClientId {
        self.id
    }
}
