use async_trait::async_trait;
use relaycast_core::{PeerId, ServerMessage};

/// Outbound seam between the coordinator and the transport layer, so the
/// protocol state machine can be exercised against a capture mock instead of
/// live sockets.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Best-effort, fire-and-forget delivery. A peer that is gone or whose
    /// channel is closed is skipped silently.
    async fn send(&self, peer_id: &PeerId, message: ServerMessage);

    /// Whether the peer currently holds an open connection. Addressed relays
    /// consult this to answer `peer-not-found`.
    fn is_connected(&self, peer_id: &PeerId) -> bool;
}
