
pub use mock_signaling::MockSignalingOutput;
