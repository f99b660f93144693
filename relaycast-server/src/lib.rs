pub mod config;
pub mod coordinator;
pub mod room;
pub mod signaling;
pub mod transport;

pub use config::ServerConfig;
pub use coordinator::{Coordinator, Outbound, SignalError};
pub use room::{AdmissionController, LiveState, Room, RoomDirectory, RoomPhase};
pub use signaling::{SignalingOutput, SignalingService, ws_handler};
pub use transport::TransportEvent;
