use crate::error::NegotiationError;
use crate::session::NegotiationSession;
use tandem_core::{CandidatePayload, ClientMessage, Role, RoomId};
use tracing::{debug, error};

/// Where the negotiation stands for this participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiatorState {
    /// Not yet admitted to a room.
    Idle,
    /// Admitted, acquiring media, waiting for the other side.
    AwaitingPeer,
    /// Initiator side: offer requested or sent, waiting for the answer.
    Offering,
    /// Responder side: remote offer applied, producing the answer.
    Answering,
    /// Both descriptions in place; the connectivity layer takes it from here.
    Connected,
    /// Terminal. Rejoining means starting the whole flow over.
    Closed,
}

impl NegotiatorState {
    pub fn name(&self) -> &'static str {
        match self {
            NegotiatorState::Idle => "idle",
            NegotiatorState::AwaitingPeer => "awaiting_peer",
            NegotiatorState::Offering => "offering",
            NegotiatorState::Answering => "answering",
            NegotiatorState::Connected => "connected",
            NegotiatorState::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionKind {
    Offer,
    Answer,
}

/// External stimulus for the state machine: relay messages, media-layer
/// completions, and local user actions, all funneled through one type so
/// they are processed strictly in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// Admission succeeded; `role` comes from whether we created the room.
    JoinAccepted { role: Role },
    RoomFull,
    /// Local audio+video capture is up.
    MediaReady,
    MediaFailed { cause: String },
    /// The responder signalled readiness (initiator only).
    StartReceived,
    OfferReceived { sdp: String },
    AnswerReceived { sdp: String },
    /// Completion of a `CreateOffer` or `CreateAnswer` effect.
    LocalDescriptionReady { sdp: String },
    CandidateReceived(CandidatePayload),
    /// The connectivity layer discovered a local candidate.
    CandidateDiscovered(CandidatePayload),
    HangUp,
    PeerLeft,
}

impl PeerEvent {
    fn name(&self) -> &'static str {
        match self {
            PeerEvent::JoinAccepted { .. } => "join_accepted",
            PeerEvent::RoomFull => "room_full",
            PeerEvent::MediaReady => "media_ready",
            PeerEvent::MediaFailed { .. } => "media_failed",
            PeerEvent::StartReceived => "start_received",
            PeerEvent::OfferReceived { .. } => "offer_received",
            PeerEvent::AnswerReceived { .. } => "answer_received",
            PeerEvent::LocalDescriptionReady { .. } => "local_description_ready",
            PeerEvent::CandidateReceived(_) => "candidate_received",
            PeerEvent::CandidateDiscovered(_) => "candidate_discovered",
            PeerEvent::HangUp => "hang_up",
            PeerEvent::PeerLeft => "peer_left",
        }
    }
}

/// What the caller must do as a result of a transition: messages to hand to
/// the relay and operations to run against the media layer. Media operations
/// complete asynchronously and re-enter as [`PeerEvent`]s, so the ordering
/// guarantees hold however long they take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Send(ClientMessage),
    AcquireMedia,
    CreateOffer,
    CreateAnswer,
    ApplyRemoteDescription { kind: DescriptionKind, sdp: String },
    ApplyCandidate(CandidatePayload),
    CloseMedia,
}

/// The per-participant negotiation state machine. Pure: it owns no transport
/// or media handles, only state, which makes every ordering property
/// testable without a live connection.
pub struct Negotiator {
    room: RoomId,
    role: Option<Role>,
    state: NegotiatorState,
    session: NegotiationSession,
}

impl Negotiator {
    pub fn new(room: RoomId) -> Self {
        Self {
            room,
            role: None,
            state: NegotiatorState::Idle,
            session: NegotiationSession::new(),
        }
    }

    pub fn state(&self) -> NegotiatorState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn session(&self) -> &NegotiationSession {
        &self.session
    }

    /// Advances the machine by one event. `Err` means the event was rejected
    /// (and, for media failure and full room, that the session is now
    /// closed); the state is never left half-transitioned.
    pub fn handle(&mut self, event: PeerEvent) -> Result<Vec<Effect>, NegotiationError> {
        use NegotiatorState::*;

        match (self.state, event) {
            (Idle, PeerEvent::JoinAccepted { role }) => {
                self.role = Some(role);
                self.state = AwaitingPeer;
                Ok(vec![Effect::AcquireMedia])
            }

            (Idle, PeerEvent::RoomFull) => {
                self.state = Closed;
                Err(NegotiationError::RoomFull {
                    room: self.room.clone(),
                })
            }

            // Terminal, no retry loop. Leaving the room tells the peer right
            // away instead of making it wait for a transport-level
            // disconnect.
            (_, PeerEvent::MediaFailed { cause }) => {
                let admitted = !matches!(self.state, Idle | Closed);
                error!(
                    room = %self.room,
                    state = self.state.name(),
                    %cause,
                    "media unavailable, closing session"
                );
                self.state = Closed;
                if admitted {
                    Ok(vec![
                        Effect::Send(ClientMessage::Leave {
                            room: self.room.clone(),
                        }),
                        Effect::CloseMedia,
                    ])
                } else {
                    Ok(vec![])
                }
            }

            (AwaitingPeer, PeerEvent::MediaReady) => match self.role {
                // Responder-ready triggers the initiator's offer; this
                // direction is the glare-avoidance convention.
                Some(Role::Responder) => Ok(vec![Effect::Send(ClientMessage::StartCall {
                    room: self.room.clone(),
                })]),
                _ => Ok(vec![]),
            },

            (AwaitingPeer, PeerEvent::StartReceived) if self.role == Some(Role::Initiator) => {
                self.state = Offering;
                Ok(vec![Effect::CreateOffer])
            }

            (Offering, PeerEvent::LocalDescriptionReady { sdp }) => {
                self.session.set_local_description(sdp.clone());
                Ok(vec![Effect::Send(ClientMessage::Offer {
                    room: self.room.clone(),
                    sdp,
                })])
            }

            (AwaitingPeer, PeerEvent::OfferReceived { sdp })
                if self.role == Some(Role::Responder) =>
            {
                let flushed = self
                    .session
                    .accept_remote_description(sdp.clone())
                    .ok_or_else(|| self.duplicate("offer"))?;

                self.state = Answering;

                let mut effects = vec![Effect::ApplyRemoteDescription {
                    kind: DescriptionKind::Offer,
                    sdp,
                }];
                effects.extend(flushed.into_iter().map(Effect::ApplyCandidate));
                effects.push(Effect::CreateAnswer);
                Ok(effects)
            }

            (Answering, PeerEvent::LocalDescriptionReady { sdp }) => {
                self.session.set_local_description(sdp.clone());
                self.state = Connected;
                Ok(vec![Effect::Send(ClientMessage::Answer {
                    room: self.room.clone(),
                    sdp,
                })])
            }

            (Offering, PeerEvent::AnswerReceived { sdp }) => {
                let flushed = self
                    .session
                    .accept_remote_description(sdp.clone())
                    .ok_or_else(|| self.duplicate("answer"))?;

                self.state = Connected;

                let mut effects = vec![Effect::ApplyRemoteDescription {
                    kind: DescriptionKind::Answer,
                    sdp,
                }];
                effects.extend(flushed.into_iter().map(Effect::ApplyCandidate));
                Ok(effects)
            }

            // A description in any other state is a duplicate or arrived out
            // of order; applying it would desynchronize the two sides.
            (_, event @ (PeerEvent::OfferReceived { .. } | PeerEvent::AnswerReceived { .. })) => {
                if self.session.has_remote_description() {
                    Err(self.duplicate(match event {
                        PeerEvent::OfferReceived { .. } => "offer",
                        _ => "answer",
                    }))
                } else {
                    Err(self.out_of_order(event.name()))
                }
            }

            (Closed, PeerEvent::CandidateReceived(_)) => {
                debug!(room = %self.room, "ignoring candidate for closed session");
                Ok(vec![])
            }

            (Idle, PeerEvent::CandidateReceived(_)) => Err(self.out_of_order("candidate_received")),

            // Orthogonal to the offer/answer sequence: apply now or buffer
            // until the remote description lands.
            (_, PeerEvent::CandidateReceived(candidate)) => {
                Ok(match self.session.remote_candidate(candidate) {
                    Some(ready) => vec![Effect::ApplyCandidate(ready)],
                    None => vec![],
                })
            }

            // Locally discovered candidates go out immediately, whatever the
            // negotiation state; they are never buffered on the sending side.
            (Idle | Closed, PeerEvent::CandidateDiscovered(_)) => Ok(vec![]),
            (_, PeerEvent::CandidateDiscovered(candidate)) => {
                Ok(vec![Effect::Send(ClientMessage::Candidate {
                    room: self.room.clone(),
                    label: candidate.label,
                    candidate: candidate.candidate,
                })])
            }

            (Closed, PeerEvent::PeerLeft | PeerEvent::HangUp) => Ok(vec![]),

            (_, PeerEvent::PeerLeft) => {
                self.state = Closed;
                Ok(vec![Effect::CloseMedia])
            }

            (_, PeerEvent::HangUp) => {
                self.state = Closed;
                Ok(vec![
                    Effect::Send(ClientMessage::Leave {
                        room: self.room.clone(),
                    }),
                    Effect::CloseMedia,
                ])
            }

            (_, event) => Err(self.out_of_order(event.name())),
        }
    }

    fn role_name(&self) -> &'static str {
        match self.role {
            Some(Role::Initiator) => "initiator",
            Some(Role::Responder) => "responder",
            None => "unassigned",
        }
    }

    fn duplicate(&self, kind: &'static str) -> NegotiationError {
        NegotiationError::DuplicateDescription {
            room: self.room.clone(),
            kind,
            state: self.state.name(),
        }
    }

    fn out_of_order(&self, event: &'static str) -> NegotiationError {
        NegotiationError::OutOfOrderEvent {
            room: self.room.clone(),
            event,
            state: self.state.name(),
            role: self.role_name(),
        }
    }
}
