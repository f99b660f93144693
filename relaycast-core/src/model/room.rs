use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized room code: trimmed and upper-cased once at the protocol
/// boundary, so every lookup downstream compares equal codes equally.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct RoomCode(String);

impl RoomCode {
    /// Returns `None` for codes that are empty after trimming; the router
    /// maps that onto the `missing-code` error.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
