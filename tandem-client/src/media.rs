use crate::error::MediaError;
use async_trait::async_trait;
use tandem_core::CandidatePayload;

/// Boundary to the media and connectivity layer (capture devices plus the
/// runtime's RTC implementation). The negotiator only ever talks to it
/// through [`Driver`] effects, so tests substitute a scripted mock.
///
/// `create_offer` and `create_answer` are expected to set the local
/// description on the underlying connection before returning the SDP, the
/// way browser and native RTC stacks do.
///
/// [`Driver`]: crate::Driver
#[async_trait]
pub trait MediaSession: Send + Sync {
    /// Acquire local audio+video capture. Failure is terminal for the
    /// session; the driver never retries it.
    async fn acquire(&self) -> Result<(), MediaError>;

    async fn create_offer(&self) -> Result<String, MediaError>;

    async fn create_answer(&self) -> Result<String, MediaError>;

    async fn set_remote_description(&self, sdp: String) -> Result<(), MediaError>;

    async fn add_remote_candidate(&self, candidate: CandidatePayload) -> Result<(), MediaError>;

    async fn close(&self);
}
