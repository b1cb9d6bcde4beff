use crate::{create_test_relay, init_tracing};
use tandem_core::{ClientMessage, PeerId, Role, RoomId, ServerMessage};

fn join(room: &str) -> ClientMessage {
    ClientMessage::Join {
        room: RoomId::from(room),
    }
}

#[tokio::test]
async fn test_admission_outcomes_in_join_order() {
    init_tracing();
    let (relay, registry, output, _rx) = create_test_relay();

    let (a, b, c) = (PeerId::new(), PeerId::new(), PeerId::new());

    relay.handle_message(a.clone(), join("r1")).await;
    relay.handle_message(b.clone(), join("r1")).await;
    relay.handle_message(c.clone(), join("r1")).await;

    assert_eq!(
        output.sent_to(&a).await,
        vec![ServerMessage::RoomCreated {
            room: RoomId::from("r1")
        }]
    );
    assert_eq!(
        output.sent_to(&b).await,
        vec![ServerMessage::RoomJoined {
            room: RoomId::from("r1")
        }]
    );
    assert_eq!(
        output.sent_to(&c).await,
        vec![ServerMessage::FullRoom {
            room: RoomId::from("r1")
        }]
    );

    // The rejected join left the room untouched.
    assert_eq!(registry.member_count(&RoomId::from("r1")), 2);
    assert!(registry.is_member(&RoomId::from("r1"), &a));
    assert!(registry.is_member(&RoomId::from("r1"), &b));
    assert!(!registry.is_member(&RoomId::from("r1"), &c));

    // Role assignment is order-stable.
    assert_eq!(
        registry.role_of(&RoomId::from("r1"), &a),
        Some(Role::Initiator)
    );
    assert_eq!(
        registry.role_of(&RoomId::from("r1"), &b),
        Some(Role::Responder)
    );
}

#[tokio::test]
async fn test_empty_room_id_is_dropped_at_the_boundary() {
    init_tracing();
    let (relay, registry, output, _rx) = create_test_relay();

    let a = PeerId::new();
    relay.handle_message(a.clone(), join("")).await;

    assert_eq!(output.total_sent().await, 0);
    assert!(!registry.room_exists(&RoomId::from("")));
}

#[tokio::test]
async fn test_second_join_from_same_connection_is_dropped() {
    init_tracing();
    let (relay, registry, output, _rx) = create_test_relay();

    let a = PeerId::new();
    relay.handle_message(a.clone(), join("r1")).await;
    relay.handle_message(a.clone(), join("r2")).await;

    // Only the first admission got a reply; r2 was never created.
    assert_eq!(output.sent_to(&a).await.len(), 1);
    assert!(registry.room_exists(&RoomId::from("r1")));
    assert!(!registry.room_exists(&RoomId::from("r2")));
}

#[tokio::test]
async fn test_room_id_reusable_after_both_members_leave() {
    init_tracing();
    let (relay, registry, output, _rx) = create_test_relay();

    let (a, b, c) = (PeerId::new(), PeerId::new(), PeerId::new());
    relay.handle_message(a.clone(), join("r1")).await;
    relay.handle_message(b.clone(), join("r1")).await;

    relay
        .handle_message(
            a.clone(),
            ClientMessage::Leave {
                room: RoomId::from("r1"),
            },
        )
        .await;
    relay.handle_disconnect(b.clone()).await;

    assert!(!registry.room_exists(&RoomId::from("r1")));

    relay.handle_message(c.clone(), join("r1")).await;
    assert_eq!(
        output.sent_to(&c).await,
        vec![ServerMessage::RoomCreated {
            room: RoomId::from("r1")
        }]
    );
}
