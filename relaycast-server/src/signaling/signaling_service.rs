use crate::signaling::SignalingOutput;
use crate::transport::TransportEvent;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use relaycast_core::{PeerId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
}

/// Connection registry plus outbound delivery. Cheap to clone; the WebSocket
/// handlers register/unregister peers here while the coordinator routes
/// through the same map.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) events_tx: mpsc::Sender<TransportEvent>,
}

impl SignalingService {
    pub fn new(events_tx: mpsc::Sender<TransportEvent>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
            events_tx,
        }
    }

    /// Issue a fresh peer id and bind it to the connection's outbound
    /// channel. Ids are never reused while the connection is open.
    pub fn register(&self, tx: mpsc::UnboundedSender<Message>) -> PeerId {
        let peer_id = PeerId::new();
        self.inner.peers.insert(peer_id.clone(), tx);
        peer_id
    }

    pub fn unregister(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
    }

    pub fn send_message(&self, peer_id: &PeerId, message: &ServerMessage) {
        if let Some(peer) = self.inner.peers.get(peer_id) {
            match serde_json::to_string(message) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", peer_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize envelope: {}", e),
            }
        } else {
            warn!("Attempted to send to disconnected peer {}", peer_id);
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, peer_id: &PeerId, message: ServerMessage) {
        self.send_message(peer_id, &message);
    }

    fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.inner.peers.contains_key(peer_id)
    }
}
