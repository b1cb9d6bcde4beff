pub mod model;

pub use model::{CandidatePayload, ClientMessage, PeerId, Role, RoomId, ServerMessage};
