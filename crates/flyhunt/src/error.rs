//! Unified error type for the relay server.

use flyhunt_transport::TransportError;

/// Errors that can stop the server from building or running.
///
/// Per-connection trouble (bad frames, dropped sockets) never surfaces
/// here — it is logged and absorbed so one misbehaving client can't
/// take the process down.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The health probe listener could not be set up.
    #[error("health probe: {0}")]
    Health(#[source] std::io::Error),
}
