use crate::error::NegotiationError;
use crate::media::MediaSession;
use crate::negotiator::{Effect, Negotiator, NegotiatorState, PeerEvent};
use std::collections::VecDeque;
use std::sync::Arc;
use tandem_core::{CandidatePayload, ClientMessage, Role, RoomId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Everything that can wake the driver: a relay message, a locally
/// discovered candidate, or the user hanging up.
#[derive(Debug)]
pub enum DriverInput {
    Server(ServerMessage),
    CandidateDiscovered(CandidatePayload),
    HangUp,
}

/// Runs one participant's negotiation: feeds events to the [`Negotiator`] in
/// strict arrival order, executes the resulting effects against the media
/// layer, and re-enters their completions before touching the next input.
/// Single-tasked, so no two transitions for the same participant ever
/// overlap.
pub struct Driver {
    negotiator: Negotiator,
    media: Arc<dyn MediaSession>,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    inbound: mpsc::UnboundedReceiver<DriverInput>,
}

impl Driver {
    pub fn new(
        room: RoomId,
        media: Arc<dyn MediaSession>,
        outbound: mpsc::UnboundedSender<ClientMessage>,
        inbound: mpsc::UnboundedReceiver<DriverInput>,
    ) -> Self {
        Self {
            negotiator: Negotiator::new(room),
            media,
            outbound,
            inbound,
        }
    }

    pub fn state(&self) -> NegotiatorState {
        self.negotiator.state()
    }

    /// Joins the room and processes inputs until the session closes or the
    /// message channel drops. Returns the final state.
    pub async fn run(mut self) -> NegotiatorState {
        let join = ClientMessage::Join {
            room: self.negotiator.room().clone(),
        };
        if self.outbound.send(join).is_err() {
            warn!("message channel closed before join");
            return self.negotiator.state();
        }

        while let Some(input) = self.inbound.recv().await {
            let event = match input {
                DriverInput::Server(msg) => map_server_message(msg),
                DriverInput::CandidateDiscovered(c) => PeerEvent::CandidateDiscovered(c),
                DriverInput::HangUp => PeerEvent::HangUp,
            };

            self.dispatch(event).await;

            if self.negotiator.state() == NegotiatorState::Closed {
                break;
            }
        }

        info!(
            room = %self.negotiator.room(),
            state = self.negotiator.state().name(),
            "negotiation finished"
        );
        self.negotiator.state()
    }

    /// One event plus every completion it triggers, before any later input.
    async fn dispatch(&mut self, event: PeerEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            match self.negotiator.handle(event) {
                Ok(effects) => {
                    for effect in effects {
                        if let Some(follow_up) = self.perform(effect).await {
                            queue.push_back(follow_up);
                        }
                    }
                }
                Err(err) => self.surface(err),
            }
        }
    }

    async fn perform(&mut self, effect: Effect) -> Option<PeerEvent> {
        match effect {
            Effect::Send(msg) => {
                if self.outbound.send(msg).is_err() {
                    warn!(room = %self.negotiator.room(), "message channel closed mid-negotiation");
                    return Some(PeerEvent::PeerLeft);
                }
                None
            }

            Effect::AcquireMedia => match self.media.acquire().await {
                Ok(()) => Some(PeerEvent::MediaReady),
                Err(e) => Some(PeerEvent::MediaFailed {
                    cause: e.to_string(),
                }),
            },

            Effect::CreateOffer => match self.media.create_offer().await {
                Ok(sdp) => Some(PeerEvent::LocalDescriptionReady { sdp }),
                Err(e) => Some(PeerEvent::MediaFailed {
                    cause: e.to_string(),
                }),
            },

            Effect::CreateAnswer => match self.media.create_answer().await {
                Ok(sdp) => Some(PeerEvent::LocalDescriptionReady { sdp }),
                Err(e) => Some(PeerEvent::MediaFailed {
                    cause: e.to_string(),
                }),
            },

            Effect::ApplyRemoteDescription { sdp, .. } => {
                match self.media.set_remote_description(sdp).await {
                    Ok(()) => None,
                    Err(e) => Some(PeerEvent::MediaFailed {
                        cause: e.to_string(),
                    }),
                }
            }

            Effect::ApplyCandidate(candidate) => {
                // A candidate the connectivity layer cannot use is not fatal;
                // others may still complete the path.
                if let Err(e) = self.media.add_remote_candidate(candidate).await {
                    warn!(room = %self.negotiator.room(), "failed to apply candidate: {}", e);
                }
                None
            }

            Effect::CloseMedia => {
                self.media.close().await;
                None
            }
        }
    }

    /// Errors are surfaced, never silently swallowed: terminal ones at error
    /// level for the user, protocol rejections at warn with enough context
    /// to reconstruct the race.
    fn surface(&self, err: NegotiationError) {
        match &err {
            NegotiationError::RoomFull { .. } => {
                error!(state = self.negotiator.state().name(), "{}", err);
            }
            _ => warn!(state = self.negotiator.state().name(), "dropped: {}", err),
        }
    }
}

fn map_server_message(msg: ServerMessage) -> PeerEvent {
    match msg {
        ServerMessage::RoomCreated { .. } => PeerEvent::JoinAccepted {
            role: Role::Initiator,
        },
        ServerMessage::RoomJoined { .. } => PeerEvent::JoinAccepted {
            role: Role::Responder,
        },
        ServerMessage::FullRoom { .. } => PeerEvent::RoomFull,
        ServerMessage::UserLeft => PeerEvent::PeerLeft,
        ServerMessage::StartCall => PeerEvent::StartReceived,
        ServerMessage::Offer { sdp } => PeerEvent::OfferReceived { sdp },
        ServerMessage::Answer { sdp } => PeerEvent::AnswerReceived { sdp },
        ServerMessage::Candidate { label, candidate } => {
            PeerEvent::CandidateReceived(CandidatePayload { label, candidate })
        }
    }
}
