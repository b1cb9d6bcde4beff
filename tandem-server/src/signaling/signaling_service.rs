use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{PeerId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Holds the outbound half of every live WebSocket. Sends are fire-and-forget
/// through per-connection queues; the relay never waits on a slow client.
#[derive(Clone, Default)]
pub struct SignalingService {
    peers: Arc<DashMap<PeerId, mpsc::UnboundedSender<Message>>>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_peer(&self, peer: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(peer, tx);
    }

    pub fn remove_peer(&self, peer: &PeerId) {
        self.peers.remove(peer);
    }

    fn send_signal(&self, peer: PeerId, msg: ServerMessage) {
        if let Some(tx) = self.peers.get(&peer) {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if let Err(e) = tx.send(Message::Text(json.into())) {
                        error!(%peer, "failed to queue WS message: {:?}", e);
                    }
                }
                Err(e) => error!("failed to serialize server message: {}", e),
            }
        } else {
            warn!(%peer, "attempted to signal a disconnected peer");
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, peer: PeerId, msg: ServerMessage) {
        self.send_signal(peer, msg);
    }
}
