use tandem_core::RoomId;
use thiserror::Error;

/// Failure reported by the media/connectivity layer behind [`MediaSession`].
///
/// [`MediaSession`]: crate::MediaSession
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MediaError(pub String);

/// Errors raised by the negotiation state machine. Protocol errors carry the
/// room, state, and event context needed to reconstruct the race that caused
/// them.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The room already had two members.
    #[error("room {room} is full")]
    RoomFull { room: RoomId },

    /// A second offer or answer arrived after a remote description was
    /// already applied. Overwriting it would desynchronize the two sides, so
    /// the duplicate is rejected.
    #[error("duplicate {kind} in room {room} (state {state})")]
    DuplicateDescription {
        room: RoomId,
        kind: &'static str,
        state: &'static str,
    },

    /// An event arrived that the current state has no transition for.
    #[error("unexpected {event} in room {room} (state {state}, role {role})")]
    OutOfOrderEvent {
        room: RoomId,
        event: &'static str,
        state: &'static str,
        role: &'static str,
    },
}
