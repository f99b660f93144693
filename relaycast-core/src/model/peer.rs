use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque routing token issued to every connection at registration time.
///
/// Peers address targeted relays by this id, so it doubles as a capability:
/// v4 uuids keep it unguessable.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct PeerId(pub Uuid);

impl PeerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied id. Anything unparseable is treated the same
    /// as an id that was never issued.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
