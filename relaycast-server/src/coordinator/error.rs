use relaycast_core::{RoomCode, ServerMessage};
use thiserror::Error;

/// Recoverable protocol violations. Every variant is answered with an
/// `error` envelope whose `message` is the `Display` string below; none of
/// them closes the connection or mutates room state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Frame was not JSON, or a known envelope with broken fields.
    #[error("invalid-json")]
    InvalidJson,
    /// A room-addressed message without a usable code.
    #[error("missing-code")]
    MissingCode,
    /// A `type` tag this server does not speak.
    #[error("unknown-type")]
    UnknownType,
    /// `host-join` while another connection holds the host role.
    #[error("host-exists")]
    HostExists(RoomCode),
    /// A host-only operation from a connection that is not the room's host.
    #[error("not-host")]
    NotHost(RoomCode),
    /// Addressed relay whose target is not currently registered.
    #[error("peer-not-found")]
    PeerNotFound(String),
}

impl SignalError {
    pub fn into_envelope(self) -> ServerMessage {
        let message = self.to_string();
        let (code, to) = match self {
            SignalError::HostExists(code) | SignalError::NotHost(code) => (Some(code), None),
            SignalError::PeerNotFound(to) => (None, Some(to)),
            _ => (None, None),
        };
        ServerMessage::Error { message, code, to }
    }
}
