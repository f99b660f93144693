use crate::coordinator::SignalError;
use crate::room::{AdmissionController, LiveState, RoomDirectory};
use crate::signaling::SignalingOutput;
use crate::transport::TransportEvent;
use relaycast_core::{ClientMessage, EndReason, PeerId, RoomCode, ServerMessage};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// One envelope bound for one peer.
#[derive(Debug)]
pub struct Outbound {
    pub to: PeerId,
    pub message: ServerMessage,
}

fn reply(to: &PeerId, error: SignalError) -> Outbound {
    Outbound {
        to: to.clone(),
        message: error.into_envelope(),
    }
}

/// The consistent live-state pair replayed on every join, host return, or
/// state change: `match-state` (only when a payload exists) followed by
/// `pause-state`, so no viewer can observe a score without its pause flag.
fn live_snapshot(code: &RoomCode, live: &LiveState) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    if live.match_state.is_some() {
        messages.push(ServerMessage::MatchState {
            code: code.clone(),
            match_state: live.match_state.clone(),
            paused: live.paused,
            pause_image_url: live.pause_image_url.clone(),
        });
    }
    messages.push(ServerMessage::PauseState {
        code: code.clone(),
        paused: live.paused,
        pause_image_url: live.pause_image_url.clone(),
    });
    messages
}

/// The protocol state machine. Owns the room directory and processes one
/// event at a time to completion, so room mutation is single-writer by
/// construction and needs no locking.
///
/// Every handler is synchronous and returns the full set of outbound
/// notifications for its transition; delivery happens afterwards through the
/// `SignalingOutput` seam. That keeps the transition table testable without
/// a live connection.
pub struct Coordinator {
    directory: RoomDirectory,
    admission: AdmissionController,
    output: Arc<dyn SignalingOutput>,
}

impl Coordinator {
    pub fn new(max_viewers: usize, output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            directory: RoomDirectory::new(),
            admission: AdmissionController::new(max_viewers),
            output,
        }
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<TransportEvent>) {
        info!("Coordinator event loop started");

        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }

        info!("Coordinator event loop finished");
    }

    pub async fn handle_event(&mut self, event: TransportEvent) {
        let outbound = match event {
            TransportEvent::Inbound { from, text } => self.on_inbound(&from, &text),
            TransportEvent::Closed { peer_id } => self.on_closed(&peer_id),
        };
        self.deliver(outbound).await;
    }

    /// Read-only view for tests and diagnostics.
    pub fn rooms(&self) -> &RoomDirectory {
        &self.directory
    }

    fn on_inbound(&mut self, from: &PeerId, text: &str) -> Vec<Outbound> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(_) => return vec![reply(from, SignalError::InvalidJson)],
        };
        let message: ClientMessage = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(_) => return vec![reply(from, SignalError::InvalidJson)],
        };

        match message {
            ClientMessage::HostJoin { code } => self.on_host_join(from, &code),
            ClientMessage::ViewerJoin { code } => self.on_viewer_join(from, &code),
            ClientMessage::HostStop { code } => self.on_host_stop(from, &code),
            ClientMessage::PauseSet {
                code,
                paused,
                pause_image_url,
            } => self.on_pause_set(from, &code, paused, pause_image_url),
            ClientMessage::MatchUpdate { code, match_state } => {
                self.on_match_update(from, &code, match_state)
            }
            relay @ (ClientMessage::WebrtcOffer { .. }
            | ClientMessage::WebrtcAnswer { .. }
            | ClientMessage::WebrtcIce { .. }) => self.on_relay(from, relay),
            ClientMessage::Ping => vec![Outbound {
                to: from.clone(),
                message: ServerMessage::Pong,
            }],
            ClientMessage::Unknown => {
                warn!("Unknown message type from {}", from);
                vec![reply(from, SignalError::UnknownType)]
            }
        }
    }

    fn on_host_join(&mut self, from: &PeerId, raw_code: &str) -> Vec<Outbound> {
        let Some(code) = RoomCode::parse(raw_code) else {
            return vec![reply(from, SignalError::MissingCode)];
        };

        let room = self.directory.get_or_create(&code);
        if let Some(host) = &room.host_id {
            if host != from {
                return vec![reply(from, SignalError::HostExists(code))];
            }
        }

        room.host_id = Some(from.clone());
        // One connection cannot hold both roles in the same room.
        room.viewers.remove(from);

        let viewers = room.viewer_snapshot();
        let live = room.live.clone();
        info!("Host {} claimed room {}", from, code);

        let mut outbound = vec![Outbound {
            to: from.clone(),
            message: ServerMessage::HostJoined { code: code.clone() },
        }];
        // The host initiates negotiation per viewer, so it needs one
        // viewer-joined notice for every viewer already in the room.
        for viewer in &viewers {
            outbound.push(Outbound {
                to: from.clone(),
                message: ServerMessage::ViewerJoined {
                    code: code.clone(),
                    viewer_id: viewer.clone(),
                },
            });
        }
        // Orphaned viewers re-negotiate and resynchronize.
        for viewer in &viewers {
            outbound.push(Outbound {
                to: viewer.clone(),
                message: ServerMessage::HostAvailable { code: code.clone() },
            });
            for message in live_snapshot(&code, &live) {
                outbound.push(Outbound {
                    to: viewer.clone(),
                    message,
                });
            }
        }
        outbound
    }

    fn on_viewer_join(&mut self, from: &PeerId, raw_code: &str) -> Vec<Outbound> {
        let Some(code) = RoomCode::parse(raw_code) else {
            return vec![reply(from, SignalError::MissingCode)];
        };

        let room = self.directory.get_or_create(&code);
        if !self.admission.can_admit(room, from) {
            let max = self.admission.max_for(room);
            info!("Viewer {} denied for room {} (cap {})", from, code, max);
            let denied = Outbound {
                to: from.clone(),
                message: ServerMessage::ViewerDenied {
                    code: code.clone(),
                    reason: "viewer-limit".into(),
                    max,
                },
            };
            // The denied join must not leave behind a room it lazily created.
            self.directory.delete_if_empty(&code);
            return vec![denied];
        }

        room.viewers.insert(from.clone());
        let host = room.host_id.clone();
        let live = room.live.clone();

        let mut outbound = vec![Outbound {
            to: from.clone(),
            message: ServerMessage::ViewerJoinedOk {
                code: code.clone(),
                viewer_id: from.clone(),
                host_present: host.is_some(),
            },
        }];
        for message in live_snapshot(&code, &live) {
            outbound.push(Outbound {
                to: from.clone(),
                message,
            });
        }
        if let Some(host) = host {
            outbound.push(Outbound {
                to: host,
                message: ServerMessage::ViewerJoined {
                    code,
                    viewer_id: from.clone(),
                },
            });
        }
        outbound
    }

    fn on_host_stop(&mut self, from: &PeerId, raw_code: &str) -> Vec<Outbound> {
        let Some(code) = RoomCode::parse(raw_code) else {
            return vec![reply(from, SignalError::MissingCode)];
        };

        let Some(room) = self.directory.get_mut(&code) else {
            return vec![reply(from, SignalError::NotHost(code))];
        };
        if !room.is_host(from) {
            return vec![reply(from, SignalError::NotHost(code))];
        }

        // Host released the room on purpose; keep it so viewers can wait for
        // a restart.
        room.host_id = None;
        let viewers = room.viewer_snapshot();
        info!("Host {} stopped room {}", from, code);

        let outbound = viewers
            .into_iter()
            .map(|viewer| Outbound {
                to: viewer,
                message: ServerMessage::Ended {
                    code: code.clone(),
                    reason: EndReason::HostStopped,
                    can_reconnect: true,
                },
            })
            .collect();
        self.directory.delete_if_empty(&code);
        outbound
    }

    fn on_pause_set(
        &mut self,
        from: &PeerId,
        raw_code: &str,
        paused: bool,
        pause_image_url: Option<String>,
    ) -> Vec<Outbound> {
        let Some(code) = RoomCode::parse(raw_code) else {
            return vec![reply(from, SignalError::MissingCode)];
        };

        let Some(room) = self.directory.get_mut(&code) else {
            return vec![reply(from, SignalError::NotHost(code))];
        };
        if !room.is_host(from) {
            return vec![reply(from, SignalError::NotHost(code))];
        }

        room.live.paused = paused;
        if let Some(url) = pause_image_url {
            // An explicitly empty url clears the overlay.
            room.live.pause_image_url = if url.is_empty() { None } else { Some(url) };
        }

        let viewers = room.viewer_snapshot();
        let live = room.live.clone();

        let mut outbound = Vec::new();
        for viewer in viewers {
            outbound.push(Outbound {
                to: viewer.clone(),
                message: ServerMessage::PauseState {
                    code: code.clone(),
                    paused: live.paused,
                    pause_image_url: live.pause_image_url.clone(),
                },
            });
            if live.match_state.is_some() {
                outbound.push(Outbound {
                    to: viewer,
                    message: ServerMessage::MatchState {
                        code: code.clone(),
                        match_state: live.match_state.clone(),
                        paused: live.paused,
                        pause_image_url: live.pause_image_url.clone(),
                    },
                });
            }
        }
        outbound
    }

    fn on_match_update(
        &mut self,
        from: &PeerId,
        raw_code: &str,
        match_state: Option<Value>,
    ) -> Vec<Outbound> {
        let Some(code) = RoomCode::parse(raw_code) else {
            return vec![reply(from, SignalError::MissingCode)];
        };

        let Some(room) = self.directory.get_mut(&code) else {
            return vec![reply(from, SignalError::NotHost(code))];
        };
        if !room.is_host(from) {
            return vec![reply(from, SignalError::NotHost(code))];
        }

        room.live.match_state = match_state;
        let viewers = room.viewer_snapshot();
        let live = room.live.clone();

        viewers
            .into_iter()
            .map(|viewer| Outbound {
                to: viewer,
                message: ServerMessage::MatchState {
                    code: code.clone(),
                    match_state: live.match_state.clone(),
                    paused: live.paused,
                    pause_image_url: live.pause_image_url.clone(),
                },
            })
            .collect()
    }

    /// Addressed negotiation relay. The payload is forwarded untouched except
    /// for the injected `from`; the router never interprets it.
    fn on_relay(&self, from: &PeerId, message: ClientMessage) -> Vec<Outbound> {
        let (to_raw, forward) = match message {
            ClientMessage::WebrtcOffer { code, to, sdp } => (
                to,
                ServerMessage::WebrtcOffer {
                    code,
                    from: from.clone(),
                    sdp,
                },
            ),
            ClientMessage::WebrtcAnswer { code, to, sdp } => (
                to,
                ServerMessage::WebrtcAnswer {
                    code,
                    from: from.clone(),
                    sdp,
                },
            ),
            ClientMessage::WebrtcIce {
                code,
                to,
                candidate,
            } => (
                to,
                ServerMessage::WebrtcIce {
                    code,
                    from: from.clone(),
                    candidate,
                },
            ),
            _ => return Vec::new(),
        };

        let to_raw = to_raw.trim();
        if to_raw.is_empty() {
            return Vec::new();
        }

        match PeerId::parse(to_raw).filter(|target| self.output.is_connected(target)) {
            Some(target) => vec![Outbound {
                to: target,
                message: forward,
            }],
            None => vec![reply(from, SignalError::PeerNotFound(to_raw.to_string()))],
        }
    }

    /// Presence cleanup, fired exactly once per closed connection. The same
    /// connection may be host of one room and viewer of others, so every
    /// room is checked for both roles.
    fn on_closed(&mut self, peer_id: &PeerId) -> Vec<Outbound> {
        let mut outbound = Vec::new();

        for code in self.directory.codes() {
            let Some(room) = self.directory.get_mut(&code) else {
                continue;
            };

            if room.is_host(peer_id) {
                // Keep the room so viewers can wait for the host to return.
                room.host_id = None;
                info!("Host {} disconnected from room {}", peer_id, code);
                for viewer in room.viewer_snapshot() {
                    outbound.push(Outbound {
                        to: viewer,
                        message: ServerMessage::Ended {
                            code: code.clone(),
                            reason: EndReason::HostLeft,
                            can_reconnect: true,
                        },
                    });
                }
            }

            if room.viewers.remove(peer_id) {
                if let Some(host) = room.host_id.clone() {
                    outbound.push(Outbound {
                        to: host,
                        message: ServerMessage::ViewerLeft {
                            code: code.clone(),
                            viewer_id: peer_id.clone(),
                        },
                    });
                }
            }

            self.directory.delete_if_empty(&code);
        }

        outbound
    }

    async fn deliver(&self, outbound: Vec<Outbound>) {
        for Outbound { to, message } in outbound {
            self.output.send(&to, message).await;
        }
    }
}
