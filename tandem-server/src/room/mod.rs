mod members;
mod registry;

pub use members::RoomMembers;
pub use registry::{JoinOutcome, RoomRegistry};
