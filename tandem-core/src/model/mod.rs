mod peer;
mod room;
mod signaling;

pub use peer::{PeerId, Role};
pub use room::RoomId;
pub use signaling::{CandidatePayload, ClientMessage, ServerMessage};
