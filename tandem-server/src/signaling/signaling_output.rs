use async_trait::async_trait;
use tandem_core::{PeerId, ServerMessage};

/// Delivery side of the message channel. The relay addresses participants by
/// id and never learns how the message reaches them; the WebSocket service
/// implements this in production and tests substitute a capturing mock.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send(&self, peer: PeerId, msg: ServerMessage);
}
