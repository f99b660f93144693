use relaycast_core::PeerId;
use serde_json::Value;
use std::collections::HashSet;

/// Host-authored state mirrored to every viewer. Kept on the room so it
/// survives host disconnects and can be replayed to late or returning
/// viewers.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    /// Opaque application payload (score/match object). The server never
    /// looks inside it.
    pub match_state: Option<Value>,
    pub paused: bool,
    pub pause_image_url: Option<String>,
}

/// Occupancy phase of a room. Derived from the membership sets rather than
/// stored, so it cannot drift out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Empty,
    HostOnly,
    ViewersOnly,
    HostAndViewers,
}

/// A named broadcast session: at most one host, any number of viewers up to
/// the admission cap.
#[derive(Debug, Default)]
pub struct Room {
    pub host_id: Option<PeerId>,
    pub viewers: HashSet<PeerId>,
    pub live: LiveState,
    /// Per-room override of the process-wide viewer cap.
    pub max_viewers: Option<usize>,
}

impl Room {
    pub fn phase(&self) -> RoomPhase {
        match (self.host_id.is_some(), !self.viewers.is_empty()) {
            (false, false) => RoomPhase::Empty,
            (true, false) => RoomPhase::HostOnly,
            (false, true) => RoomPhase::ViewersOnly,
            (true, true) => RoomPhase::HostAndViewers,
        }
    }

    /// An empty room must not stay in the directory; see `RoomDirectory::delete_if_empty`.
    pub fn is_empty(&self) -> bool {
        self.phase() == RoomPhase::Empty
    }

    pub fn is_host(&self, peer_id: &PeerId) -> bool {
        self.host_id.as_ref() == Some(peer_id)
    }

    /// Snapshot of the viewer set, taken before any fan-out so broadcasts
    /// never iterate a collection that handlers are still mutating.
    pub fn viewer_snapshot(&self) -> Vec<PeerId> {
        self.viewers.iter().cloned().collect()
    }
}
