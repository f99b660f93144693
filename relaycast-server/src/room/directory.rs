use crate::room::Room;
use relaycast_core::RoomCode;
use std::collections::HashMap;
use tracing::info;

/// All live rooms, keyed by normalized code. Owned exclusively by the
/// coordinator actor; mutation is serialized by its event loop, so a plain
/// map is enough.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rooms are created lazily on the first join for an unseen code.
    pub fn get_or_create(&mut self, code: &RoomCode) -> &mut Room {
        self.rooms.entry(code.clone()).or_insert_with(|| {
            info!("Creating new room: {}", code);
            Room::default()
        })
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Enforces the lifecycle invariant: a room with neither host nor
    /// viewers does not exist. Returns whether the room was removed.
    pub fn delete_if_empty(&mut self, code: &RoomCode) -> bool {
        if self.rooms.get(code).is_some_and(Room::is_empty) {
            self.rooms.remove(code);
            info!("Room {} is empty, deleting", code);
            return true;
        }
        false
    }

    pub fn codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
