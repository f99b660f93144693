use async_trait::async_trait;
use relaycast_core::{PeerId, ServerMessage};
use relaycast_server::SignalingOutput;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock SignalingOutput that captures every outbound envelope and plays the
/// connection registry's role for relay target lookups.
#[derive(Clone, Default)]
pub struct MockSignalingOutput {
    connected: Arc<Mutex<HashSet<PeerId>>>,
    sent: Arc<Mutex<Vec<(PeerId, ServerMessage)>>>,
}

impl MockSignalingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fake connection and hand back its peer id.
    pub fn connect(&self) -> PeerId {
        let peer_id = PeerId::new();
        self.connected.lock().unwrap().insert(peer_id.clone());
        peer_id
    }

    pub fn disconnect(&self, peer_id: &PeerId) {
        self.connected.lock().unwrap().remove(peer_id);
    }

    /// Everything sent to one peer, in delivery order.
    pub fn sent_to(&self, peer_id: &PeerId) -> Vec<ServerMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == peer_id)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn all_sent(&self) -> Vec<(PeerId, ServerMessage)> {
        self.sent.lock().unwrap().clone()
    }

    /// Forget captured traffic; registration state is kept.
    pub fn drain(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send(&self, peer_id: &PeerId, message: ServerMessage) {
        tracing::debug!("[MockSignaling] send to {}: {:?}", peer_id, message);
        self.sent.lock().unwrap().push((peer_id.clone(), message));
    }

    fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.connected.lock().unwrap().contains(peer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_captures_in_order() {
        let mock = MockSignalingOutput::new();
        let peer_id = mock.connect();

        mock.send(&peer_id, ServerMessage::Pong).await;
        mock.send(
            &peer_id,
            ServerMessage::Hello {
                id: peer_id.clone(),
            },
        )
        .await;

        let sent = mock.sent_to(&peer_id);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ServerMessage::Pong);
        assert!(matches!(sent[1], ServerMessage::Hello { .. }));
    }

    #[tokio::test]
    async fn test_disconnect_clears_registration() {
        let mock = MockSignalingOutput::new();
        let peer_id = mock.connect();
        assert!(mock.is_connected(&peer_id));

        mock.disconnect(&peer_id);
        assert!(!mock.is_connected(&peer_id));
    }
}
