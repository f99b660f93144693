use crate::room::Room;
use relaycast_core::PeerId;

/// Gates viewer admission before the viewer is added; never evicts.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    default_max: usize,
}

impl AdmissionController {
    pub fn new(default_max: usize) -> Self {
        Self { default_max }
    }

    /// Effective cap for a room: its override if set, the process default
    /// otherwise.
    pub fn max_for(&self, room: &Room) -> usize {
        room.max_viewers.unwrap_or(self.default_max)
    }

    /// A peer already in the viewer set never counts against the cap twice,
    /// so re-joins are always admitted.
    pub fn can_admit(&self, room: &Room, peer_id: &PeerId) -> bool {
        room.viewers.contains(peer_id) || room.viewers.len() < self.max_for(room)
    }
}
