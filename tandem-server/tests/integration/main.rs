mod admission_tests;
mod scenario_tests;
mod utils;

use std::sync::Arc;
use tandem_core::{PeerId, ServerMessage};
use tandem_server::{Relay, RoomRegistry};
use tokio::sync::mpsc;
use tracing::Level;

use utils::MockSignalingOutput;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_relay() -> (
    Relay,
    Arc<RoomRegistry>,
    MockSignalingOutput,
    mpsc::UnboundedReceiver<(PeerId, ServerMessage)>,
) {
    let registry = Arc::new(RoomRegistry::new());
    let (output, signal_rx) = MockSignalingOutput::new();
    let relay = Relay::new(Arc::clone(&registry), Arc::new(output.clone()));

    (relay, registry, output, signal_rx)
}
