pub mod model;

pub use model::{ClientMessage, EndReason, PeerId, RoomCode, ServerMessage};
