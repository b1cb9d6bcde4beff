pub mod config;
pub mod http;
pub mod room;
pub mod signaling;

pub use http::{AppState, router};
pub use room::{JoinOutcome, RoomMembers, RoomRegistry};
pub use signaling::{Relay, SignalingOutput, SignalingService, ws_handler};
