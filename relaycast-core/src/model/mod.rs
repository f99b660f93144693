mod peer;
mod room;
mod signaling;

pub use peer::PeerId;
pub use room::RoomCode;
pub use signaling::{ClientMessage, EndReason, ServerMessage};
