//! The full two-participant call setup, driven through the real relay and
//! two real negotiation state machines, with canned SDP in place of a live
//! media stack.

use crate::{create_test_relay, init_tracing};
use std::time::Duration;
use tandem_client::{Effect, Negotiator, NegotiatorState, PeerEvent};
use tandem_core::{CandidatePayload, ClientMessage, PeerId, Role, RoomId, ServerMessage};
use tandem_server::Relay;
use tokio::sync::mpsc;

fn room() -> RoomId {
    RoomId::from("r1")
}

/// Feeds one event (plus the completions it triggers) into a negotiator and
/// returns the messages it wants relayed. Media effects resolve instantly:
/// offers become `O1`, answers become `A1`.
fn advance(negotiator: &mut Negotiator, event: PeerEvent) -> Vec<ClientMessage> {
    let mut queue = std::collections::VecDeque::from([event]);
    let mut outbound = Vec::new();

    while let Some(event) = queue.pop_front() {
        let effects = negotiator.handle(event).expect("scenario event accepted");
        for effect in effects {
            match effect {
                Effect::Send(msg) => outbound.push(msg),
                Effect::AcquireMedia => queue.push_back(PeerEvent::MediaReady),
                Effect::CreateOffer => {
                    queue.push_back(PeerEvent::LocalDescriptionReady { sdp: "O1".into() })
                }
                Effect::CreateAnswer => {
                    queue.push_back(PeerEvent::LocalDescriptionReady { sdp: "A1".into() })
                }
                // Media application is covered by the client crate's tests.
                Effect::ApplyRemoteDescription { .. }
                | Effect::ApplyCandidate(_)
                | Effect::CloseMedia => {}
            }
        }
    }

    outbound
}

async fn relay_all(relay: &Relay, sender: &PeerId, msgs: Vec<ClientMessage>) {
    for msg in msgs {
        relay.handle_message(sender.clone(), msg).await;
    }
}

async fn expect_delivery(
    rx: &mut mpsc::UnboundedReceiver<(PeerId, ServerMessage)>,
    expected_recipient: &PeerId,
) -> ServerMessage {
    let (recipient, msg) = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("delivery within timeout")
        .expect("output channel open");
    assert_eq!(&recipient, expected_recipient, "misaddressed {:?}", msg);
    msg
}

#[tokio::test]
async fn test_two_participants_negotiate_to_connected() {
    init_tracing();
    let (relay, registry, _output, mut rx) = create_test_relay();

    let (a, b) = (PeerId::new(), PeerId::new());
    let mut negotiator_a = Negotiator::new(room());
    let mut negotiator_b = Negotiator::new(room());

    // A joins first and becomes the initiator.
    relay
        .handle_message(a.clone(), ClientMessage::Join { room: room() })
        .await;
    assert_eq!(
        expect_delivery(&mut rx, &a).await,
        ServerMessage::RoomCreated { room: room() }
    );
    let msgs = advance(
        &mut negotiator_a,
        PeerEvent::JoinAccepted {
            role: Role::Initiator,
        },
    );
    assert!(msgs.is_empty(), "initiator stays quiet until start_call");

    // B joins second as the responder; its media-ready emits start_call.
    relay
        .handle_message(b.clone(), ClientMessage::Join { room: room() })
        .await;
    assert_eq!(
        expect_delivery(&mut rx, &b).await,
        ServerMessage::RoomJoined { room: room() }
    );
    let msgs = advance(
        &mut negotiator_b,
        PeerEvent::JoinAccepted {
            role: Role::Responder,
        },
    );
    assert_eq!(msgs, vec![ClientMessage::StartCall { room: room() }]);
    relay_all(&relay, &b, msgs).await;

    // start_call reaches A only, triggering the offer.
    assert_eq!(expect_delivery(&mut rx, &a).await, ServerMessage::StartCall);
    let msgs = advance(&mut negotiator_a, PeerEvent::StartReceived);
    assert_eq!(
        msgs,
        vec![ClientMessage::Offer {
            room: room(),
            sdp: "O1".into(),
        }]
    );
    relay_all(&relay, &a, msgs).await;

    // O1 reaches B only, which answers with A1.
    assert_eq!(
        expect_delivery(&mut rx, &b).await,
        ServerMessage::Offer { sdp: "O1".into() }
    );
    let msgs = advance(&mut negotiator_b, PeerEvent::OfferReceived { sdp: "O1".into() });
    assert_eq!(
        msgs,
        vec![ClientMessage::Answer {
            room: room(),
            sdp: "A1".into(),
        }]
    );
    assert_eq!(negotiator_b.state(), NegotiatorState::Connected);
    relay_all(&relay, &b, msgs).await;

    // A1 reaches A only; A is now connected too.
    assert_eq!(
        expect_delivery(&mut rx, &a).await,
        ServerMessage::Answer { sdp: "A1".into() }
    );
    advance(&mut negotiator_a, PeerEvent::AnswerReceived { sdp: "A1".into() });
    assert_eq!(negotiator_a.state(), NegotiatorState::Connected);

    // Candidates flow both ways, tagged with their line index, each reaching
    // only the non-sending member.
    let msgs = advance(
        &mut negotiator_a,
        PeerEvent::CandidateDiscovered(CandidatePayload {
            label: Some(0),
            candidate: "cand-a".into(),
        }),
    );
    relay_all(&relay, &a, msgs).await;
    assert_eq!(
        expect_delivery(&mut rx, &b).await,
        ServerMessage::Candidate {
            label: Some(0),
            candidate: "cand-a".into(),
        }
    );

    let msgs = advance(
        &mut negotiator_b,
        PeerEvent::CandidateDiscovered(CandidatePayload {
            label: Some(1),
            candidate: "cand-b".into(),
        }),
    );
    relay_all(&relay, &b, msgs).await;
    assert_eq!(
        expect_delivery(&mut rx, &a).await,
        ServerMessage::Candidate {
            label: Some(1),
            candidate: "cand-b".into(),
        }
    );

    // A latecomer is rejected and the room is untouched.
    let c = PeerId::new();
    relay
        .handle_message(c.clone(), ClientMessage::Join { room: room() })
        .await;
    assert_eq!(
        expect_delivery(&mut rx, &c).await,
        ServerMessage::FullRoom { room: room() }
    );
    assert_eq!(registry.member_count(&room()), 2);
    assert!(registry.is_member(&room(), &a));
    assert!(registry.is_member(&room(), &b));
}

#[tokio::test]
async fn test_mid_negotiation_disconnect_closes_the_survivor() {
    init_tracing();
    let (relay, _registry, _output, mut rx) = create_test_relay();

    let (a, b) = (PeerId::new(), PeerId::new());
    let mut negotiator_a = Negotiator::new(room());

    relay
        .handle_message(a.clone(), ClientMessage::Join { room: room() })
        .await;
    expect_delivery(&mut rx, &a).await;
    advance(
        &mut negotiator_a,
        PeerEvent::JoinAccepted {
            role: Role::Initiator,
        },
    );

    relay
        .handle_message(b.clone(), ClientMessage::Join { room: room() })
        .await;
    expect_delivery(&mut rx, &b).await;

    // B's transport drops before it ever signals readiness.
    relay.handle_disconnect(b).await;

    assert_eq!(expect_delivery(&mut rx, &a).await, ServerMessage::UserLeft);
    advance(&mut negotiator_a, PeerEvent::PeerLeft);
    assert_eq!(negotiator_a.state(), NegotiatorState::Closed);
}
