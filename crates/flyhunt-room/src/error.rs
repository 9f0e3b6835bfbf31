//! Error types for the room layer.

/// Join failures reported back to the requester as a `join-error`
/// event. These are the only errors the protocol ever surfaces; the
/// display strings below ARE the wire messages the client shows.
///
/// Everything else that could go wrong — events for rooms that don't
/// exist, gameplay reports outside a running game — is dropped
/// silently, because the protocol has no bad-request signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// No live room has this code.
    #[error("Room not found")]
    RoomNotFound,

    /// The room exists but is not accepting joins (status ≠ waiting).
    #[error("Game already in progress")]
    GameInProgress,

    /// Both seats are taken.
    #[error("Room is full")]
    RoomFull,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_error_messages_match_the_wire_contract() {
        assert_eq!(JoinError::RoomNotFound.to_string(), "Room not found");
        assert_eq!(
            JoinError::GameInProgress.to_string(),
            "Game already in progress"
        );
        assert_eq!(JoinError::RoomFull.to_string(), "Room is full");
    }
}
