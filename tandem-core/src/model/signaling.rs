use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// One connectivity candidate as relayed between peers. The candidate body is
/// opaque to the server; `label` is the media-line index the candidate
/// belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidatePayload {
    pub label: Option<u16>,
    pub candidate: String,
}

/// Messages a participant sends to the rendezvous server. Session
/// descriptions and candidates are relayed verbatim; the server never parses
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        room: RoomId,
    },
    Leave {
        room: RoomId,
    },
    /// Responder telling the initiator its media pipeline is ready.
    StartCall {
        room: RoomId,
    },
    Offer {
        room: RoomId,
        sdp: String,
    },
    Answer {
        room: RoomId,
        sdp: String,
    },
    Candidate {
        room: RoomId,
        label: Option<u16>,
        candidate: String,
    },
}

impl ClientMessage {
    pub fn room(&self) -> &RoomId {
        match self {
            ClientMessage::Join { room }
            | ClientMessage::Leave { room }
            | ClientMessage::StartCall { room }
            | ClientMessage::Offer { room, .. }
            | ClientMessage::Answer { room, .. }
            | ClientMessage::Candidate { room, .. } => room,
        }
    }
}

/// Messages the rendezvous server sends to a participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ServerMessage {
    RoomCreated { room: RoomId },
    RoomJoined { room: RoomId },
    FullRoom { room: RoomId },
    UserLeft,
    StartCall,
    Offer { sdp: String },
    Answer { sdp: String },
    Candidate { label: Option<u16>, candidate: String },
}
