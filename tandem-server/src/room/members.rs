use tandem_core::{PeerId, Role};

/// The member set of one room: at most two participants, in join order. The
/// first member is the initiator for the whole session.
#[derive(Debug, Clone)]
pub struct RoomMembers {
    members: Vec<PeerId>,
}

impl RoomMembers {
    pub fn solo(first: PeerId) -> Self {
        Self {
            members: vec![first],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= 2
    }

    pub fn contains(&self, peer: &PeerId) -> bool {
        self.members.contains(peer)
    }

    /// Adds the second member. Callers check `is_full` first; a third add is
    /// a registry bug, so it panics in debug builds and is ignored otherwise.
    pub fn add_responder(&mut self, peer: PeerId) {
        debug_assert!(!self.is_full());
        if !self.is_full() {
            self.members.push(peer);
        }
    }

    pub fn remove(&mut self, peer: &PeerId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != peer);
        self.members.len() != before
    }

    /// The member that is not `peer`, if `peer` itself is a member.
    pub fn other(&self, peer: &PeerId) -> Option<PeerId> {
        if !self.contains(peer) {
            return None;
        }
        self.members.iter().find(|m| *m != peer).cloned()
    }

    /// Whoever is left, regardless of which member is asking.
    pub fn remaining(&self) -> Option<PeerId> {
        self.members.first().cloned()
    }

    pub fn role_of(&self, peer: &PeerId) -> Option<Role> {
        match self.members.iter().position(|m| m == peer) {
            Some(0) => Some(Role::Initiator),
            Some(_) => Some(Role::Responder),
            None => None,
        }
    }
}
