use crate::model::peer::PeerId;
use crate::model::room::RoomCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound envelopes. Fields the reference clients sometimes omit default to
/// empty so a sloppy envelope still resolves to a typed message; the router
/// decides whether the emptiness is an error (`missing-code`) or benign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "host-join")]
    HostJoin {
        #[serde(default)]
        code: String,
    },
    #[serde(rename = "viewer-join")]
    ViewerJoin {
        #[serde(default)]
        code: String,
    },
    #[serde(rename = "host-stop")]
    HostStop {
        #[serde(default)]
        code: String,
    },
    #[serde(rename = "pause-set", rename_all = "camelCase")]
    PauseSet {
        #[serde(default)]
        code: String,
        #[serde(default)]
        paused: bool,
        pause_image_url: Option<String>,
    },
    #[serde(rename = "match-update")]
    MatchUpdate {
        #[serde(default)]
        code: String,
        #[serde(rename = "match")]
        match_state: Option<Value>,
    },
    #[serde(rename = "webrtc-offer")]
    WebrtcOffer {
        #[serde(default)]
        code: String,
        #[serde(default)]
        to: String,
        sdp: Option<Value>,
    },
    #[serde(rename = "webrtc-answer")]
    WebrtcAnswer {
        #[serde(default)]
        code: String,
        #[serde(default)]
        to: String,
        sdp: Option<Value>,
    },
    #[serde(rename = "webrtc-ice")]
    WebrtcIce {
        #[serde(default)]
        code: String,
        #[serde(default)]
        to: String,
        candidate: Option<Value>,
    },
    /// Keep-alive from mobile clients; answered with `pong`.
    #[serde(rename = "ping")]
    Ping,
    /// Catch-all for tags this server does not speak.
    #[serde(other)]
    Unknown,
}

/// Why a room ended from a viewer's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// The host's connection dropped.
    HostLeft,
    /// The host explicitly released the room.
    HostStopped,
}

/// Outbound envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "hello")]
    Hello { id: PeerId },
    #[serde(rename = "host-joined")]
    HostJoined { code: RoomCode },
    #[serde(rename = "viewer-joined-ok", rename_all = "camelCase")]
    ViewerJoinedOk {
        code: RoomCode,
        viewer_id: PeerId,
        host_present: bool,
    },
    #[serde(rename = "viewer-joined", rename_all = "camelCase")]
    ViewerJoined { code: RoomCode, viewer_id: PeerId },
    #[serde(rename = "viewer-left", rename_all = "camelCase")]
    ViewerLeft { code: RoomCode, viewer_id: PeerId },
    #[serde(rename = "host-available")]
    HostAvailable { code: RoomCode },
    #[serde(rename = "match-state", rename_all = "camelCase")]
    MatchState {
        code: RoomCode,
        #[serde(rename = "match")]
        match_state: Option<Value>,
        paused: bool,
        pause_image_url: Option<String>,
    },
    #[serde(rename = "pause-state", rename_all = "camelCase")]
    PauseState {
        code: RoomCode,
        paused: bool,
        pause_image_url: Option<String>,
    },
    #[serde(rename = "ended", rename_all = "camelCase")]
    Ended {
        code: RoomCode,
        reason: EndReason,
        can_reconnect: bool,
    },
    #[serde(rename = "viewer-denied")]
    ViewerDenied {
        code: RoomCode,
        reason: String,
        max: usize,
    },
    #[serde(rename = "webrtc-offer")]
    WebrtcOffer {
        #[serde(skip_serializing_if = "String::is_empty", default)]
        code: String,
        from: PeerId,
        sdp: Option<Value>,
    },
    #[serde(rename = "webrtc-answer")]
    WebrtcAnswer {
        #[serde(skip_serializing_if = "String::is_empty", default)]
        code: String,
        from: PeerId,
        sdp: Option<Value>,
    },
    #[serde(rename = "webrtc-ice")]
    WebrtcIce {
        #[serde(skip_serializing_if = "String::is_empty", default)]
        code: String,
        from: PeerId,
        candidate: Option<Value>,
    },
    #[serde(rename = "error")]
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        code: Option<RoomCode>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        to: Option<String>,
    },
    #[serde(rename = "pong")]
    Pong,
}
