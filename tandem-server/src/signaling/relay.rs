use crate::room::{JoinOutcome, RoomRegistry};
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use tandem_core::{ClientMessage, PeerId, RoomId, ServerMessage};
use tracing::{debug, info, warn};

/// Admission control plus store-and-forward between the two members of a
/// room. Negotiation payloads pass through verbatim; the relay only decides
/// who receives them.
pub struct Relay {
    registry: Arc<RoomRegistry>,
    output: Arc<dyn SignalingOutput>,
}

impl Relay {
    pub fn new(registry: Arc<RoomRegistry>, output: Arc<dyn SignalingOutput>) -> Self {
        Self { registry, output }
    }

    /// Entry point for everything a connected participant sends. Malformed
    /// input is logged and dropped; one participant's garbage never takes
    /// down a room.
    pub async fn handle_message(&self, sender: PeerId, msg: ClientMessage) {
        if msg.room().is_empty() {
            warn!(%sender, ?msg, "dropping message with empty room id");
            return;
        }

        match msg {
            ClientMessage::Join { room } => self.handle_join(sender, room).await,
            ClientMessage::Leave { room } => self.handle_leave(sender, room).await,
            ClientMessage::StartCall { room } => {
                self.forward(sender, room, ServerMessage::StartCall).await;
            }
            ClientMessage::Offer { room, sdp } => {
                self.forward(sender, room, ServerMessage::Offer { sdp }).await;
            }
            ClientMessage::Answer { room, sdp } => {
                self.forward(sender, room, ServerMessage::Answer { sdp })
                    .await;
            }
            ClientMessage::Candidate {
                room,
                label,
                candidate,
            } => {
                self.forward(sender, room, ServerMessage::Candidate { label, candidate })
                    .await;
            }
        }
    }

    /// A dropped connection invalidates any in-flight negotiation: remove the
    /// participant at once and tell the survivor to stop waiting.
    pub async fn handle_disconnect(&self, peer: PeerId) {
        if let Some((room, remaining)) = self.registry.disconnect(&peer) {
            info!(%room, %peer, "peer disconnected mid-session");
            if let Some(remaining) = remaining {
                self.output.send(remaining, ServerMessage::UserLeft).await;
            }
        }
    }

    async fn handle_join(&self, sender: PeerId, room: RoomId) {
        if let Some(current) = self.registry.room_of(&sender) {
            warn!(%sender, %current, attempted = %room, "join while already in a room, dropping");
            return;
        }

        let outcome = self.registry.join(&room, sender.clone());
        let reply = match outcome {
            JoinOutcome::Created => ServerMessage::RoomCreated { room },
            JoinOutcome::Joined => ServerMessage::RoomJoined { room },
            JoinOutcome::Full => ServerMessage::FullRoom { room },
        };
        self.output.send(sender, reply).await;
    }

    async fn handle_leave(&self, sender: PeerId, room: RoomId) {
        match self.registry.leave(&room, &sender) {
            Some(remaining) => {
                info!(%room, %sender, "peer left, notifying remaining member");
                self.output.send(remaining, ServerMessage::UserLeft).await;
            }
            None => debug!(%room, %sender, "leave with no one to notify"),
        }
    }

    async fn forward(&self, sender: PeerId, room: RoomId, msg: ServerMessage) {
        if !self.registry.is_member(&room, &sender) {
            warn!(%room, %sender, ?msg, "relay request from non-member, dropping");
            return;
        }

        match self.registry.peer_of(&room, &sender) {
            Some(recipient) => self.output.send(recipient, msg).await,
            // The sender may not yet know its peer is gone. Not an error.
            None => debug!(%room, %sender, "no peer in room, dropping relayed message"),
        }
    }
}
