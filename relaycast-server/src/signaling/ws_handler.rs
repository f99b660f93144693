use crate::signaling::SignalingService;
use crate::transport::TransportEvent;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use relaycast_core::ServerMessage;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let peer_id = service.register(tx);
    info!("New WebSocket connection: {}", peer_id);

    // The peer needs its own id for diagnostics before anything else.
    service.send_message(
        &peer_id,
        &ServerMessage::Hello {
            id: peer_id.clone(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let peer_id = peer_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        let event = TransportEvent::Inbound {
                            from: peer_id.clone(),
                            text: text.to_string(),
                        };
                        if service.events_tx.send(event).await.is_err() {
                            error!("Coordinator is gone, dropping connection {}", peer_id);
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Cleanup runs exactly once per connection, whichever side ended first.
    service.unregister(&peer_id);
    let _ = service
        .events_tx
        .send(TransportEvent::Closed {
            peer_id: peer_id.clone(),
        })
        .await;
    info!("WebSocket disconnected: {}", peer_id);
}
