//! `Server` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → lobby. One lobby
//! mutex serializes all room mutation (request handling and the reaper
//! alike); everything else is per-connection plumbing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;

use flyhunt_protocol::{ClientId, JsonCodec};
use flyhunt_room::{Lobby, ReaperConfig, reaper};
use flyhunt_transport::{Transport, WebSocketConnection, WebSocketTransport};

use crate::ServerError;
use crate::handler::handle_connection;
use crate::health;

/// Shared state handed to every connection task.
pub(crate) struct ServerState {
    /// The single-writer lobby. Request handlers and the reaper take
    /// this lock; each event runs to completion under it.
    pub(crate) lobby: Arc<Mutex<Lobby>>,

    /// Live connections by id, for delivering outbound instructions.
    /// Sends are queued writes, so holding this lock is cheap.
    pub(crate) peers: Mutex<HashMap<ClientId, Arc<WebSocketConnection>>>,

    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a relay server.
///
/// # Example
///
/// ```rust,no_run
/// use flyhunt::ServerBuilder;
///
/// # async fn run() -> Result<(), flyhunt::ServerError> {
/// let server = ServerBuilder::new().bind("0.0.0.0:3001").build().await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    health_addr: Option<String>,
    reaper: ReaperConfig,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            health_addr: None,
            reaper: ReaperConfig::default(),
        }
    }

    /// Sets the WebSocket listen address.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Enables the HTTP liveness probe on its own address.
    pub fn health_bind(mut self, addr: &str) -> Self {
        self.health_addr = Some(addr.to_string());
        self
    }

    /// Overrides the reaper's sweep cadence and room TTL.
    pub fn reaper(mut self, config: ReaperConfig) -> Self {
        self.reaper = config;
        self
    }

    /// Binds the listeners and assembles the server.
    pub async fn build(self) -> Result<Server, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let health = match &self.health_addr {
            Some(addr) => Some(
                TcpListener::bind(addr.as_str())
                    .await
                    .map_err(ServerError::Health)?,
            ),
            None => None,
        };

        let state = Arc::new(ServerState {
            lobby: Arc::new(Mutex::new(Lobby::new())),
            peers: Mutex::new(HashMap::new()),
            codec: JsonCodec,
        });

        Ok(Server {
            transport,
            health,
            reaper: self.reaper,
            state,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server {
    transport: WebSocketTransport,
    health: Option<TcpListener>,
    reaper: ReaperConfig,
    state: Arc<ServerState>,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// The address the WebSocket listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The address of the health probe, when enabled.
    pub fn health_addr(&self) -> Option<std::net::SocketAddr> {
        self.health.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Runs the server: spawns the reaper (and health probe), then
    /// accepts connections until the process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        reaper::spawn(self.reaper.clone(), Arc::clone(&self.state.lobby));

        if let Some(listener) = self.health.take() {
            tokio::spawn(health::serve(listener, Arc::clone(&self.state.lobby)));
        }

        tracing::info!("Flyhunt relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
