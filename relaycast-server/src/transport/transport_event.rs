use relaycast_core::PeerId;

/// Events flowing from the WebSocket layer into the coordinator. A single
/// mpsc channel carries them, so per-connection ordering (frames before
/// close) falls out of arrival order.
#[derive(Debug)]
pub enum TransportEvent {
    /// A text frame arrived from a registered peer.
    Inbound { from: PeerId, text: String },
    /// The peer's connection closed, whatever the cause.
    Closed { peer_id: PeerId },
}
