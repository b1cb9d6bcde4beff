use crate::room::RoomMembers;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tandem_core::{PeerId, Role, RoomId};
use tracing::{debug, info};

/// Outcome of an admission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The room had no members; the caller created it and is the initiator.
    Created,
    /// One member was waiting; the caller joined as the responder.
    Joined,
    /// Two members already present. The room is unchanged and the caller was
    /// not added.
    Full,
}

/// Tracks which participants are in which rooms. Rooms are created by the
/// first join and vanish when the last member leaves; an id with no members
/// is indistinguishable from an id never used.
///
/// Admission decisions for one room id are serialized by the map's entry
/// lock, so two concurrent joins can never both observe an empty room.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomMembers>,
    peer_rooms: DashMap<PeerId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, room: &RoomId, peer: PeerId) -> JoinOutcome {
        match self.rooms.entry(room.clone()) {
            Entry::Vacant(vacant) => {
                info!(%room, %peer, "creating room");
                vacant.insert(RoomMembers::solo(peer.clone()));
                self.peer_rooms.insert(peer, room.clone());
                JoinOutcome::Created
            }
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_full() {
                    debug!(%room, %peer, "room full, rejecting join");
                    JoinOutcome::Full
                } else {
                    info!(%room, %peer, "joining room");
                    occupied.get_mut().add_responder(peer.clone());
                    self.peer_rooms.insert(peer, room.clone());
                    JoinOutcome::Joined
                }
            }
        }
    }

    /// Removes `peer` from `room`. Returns the remaining member, if one is
    /// left behind and should be told the session is over. Returns `None`
    /// both when the room empties and when `peer` was not a member.
    pub fn leave(&self, room: &RoomId, peer: &PeerId) -> Option<PeerId> {
        let remaining = match self.rooms.entry(room.clone()) {
            Entry::Vacant(_) => return None,
            Entry::Occupied(mut occupied) => {
                if !occupied.get_mut().remove(peer) {
                    return None;
                }
                if occupied.get().is_empty() {
                    occupied.remove();
                    None
                } else {
                    occupied.get().remaining()
                }
            }
        };

        self.peer_rooms.remove(peer);
        debug!(%room, %peer, "peer left room");
        remaining
    }

    /// Removes a dropped connection from whatever room it was in. Returns the
    /// room and the member left behind, if any.
    pub fn disconnect(&self, peer: &PeerId) -> Option<(RoomId, Option<PeerId>)> {
        let room = self.peer_rooms.get(peer).map(|r| r.clone())?;
        let remaining = self.leave(&room, peer);
        Some((room, remaining))
    }

    pub fn room_exists(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn is_member(&self, room: &RoomId, peer: &PeerId) -> bool {
        self.rooms
            .get(room)
            .map(|members| members.contains(peer))
            .unwrap_or(false)
    }

    /// The other member of `room`, provided `peer` itself is a member.
    pub fn peer_of(&self, room: &RoomId, peer: &PeerId) -> Option<PeerId> {
        self.rooms.get(room)?.other(peer)
    }

    pub fn room_of(&self, peer: &PeerId) -> Option<RoomId> {
        self.peer_rooms.get(peer).map(|r| r.clone())
    }

    pub fn role_of(&self, room: &RoomId, peer: &PeerId) -> Option<Role> {
        self.rooms.get(room)?.role_of(peer)
    }

    pub fn member_count(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }
}
