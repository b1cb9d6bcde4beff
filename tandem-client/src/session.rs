use tandem_core::CandidatePayload;

/// One participant's local view of the negotiation: the two session
/// descriptions and the candidates that arrived before the remote description
/// was known.
///
/// Owned exclusively by one negotiator; the peer's view is only ever reached
/// through the relay.
#[derive(Debug, Default)]
pub struct NegotiationSession {
    local_description: Option<String>,
    remote_description: Option<String>,
    pending_remote_candidates: Vec<CandidatePayload>,
}

impl NegotiationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_local_description(&self) -> bool {
        self.local_description.is_some()
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_description.is_some()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_remote_candidates.len()
    }

    pub fn set_local_description(&mut self, sdp: String) {
        self.local_description = Some(sdp);
    }

    /// Records the remote description and drains the candidate buffer in
    /// arrival order, never reordered or deduplicated. Returns `None` if a
    /// remote description was already present — callers treat that as a
    /// duplicate and reject it.
    pub fn accept_remote_description(&mut self, sdp: String) -> Option<Vec<CandidatePayload>> {
        if self.remote_description.is_some() {
            return None;
        }
        self.remote_description = Some(sdp);
        Some(std::mem::take(&mut self.pending_remote_candidates))
    }

    /// A remote candidate either applies immediately (remote description
    /// known) or joins the buffer to be flushed later.
    pub fn remote_candidate(&mut self, candidate: CandidatePayload) -> Option<CandidatePayload> {
        if self.remote_description.is_some() {
            Some(candidate)
        } else {
            self.pending_remote_candidates.push(candidate);
            None
        }
    }
}
