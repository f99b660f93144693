mod admission;
mod directory;
mod room;

pub use admission::AdmissionController;
pub use directory::RoomDirectory;
pub use room::{LiveState, Room, RoomPhase};
