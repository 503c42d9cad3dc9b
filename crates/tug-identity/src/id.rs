//! Request identifiers

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for an upgrade request
///
/// Minted fresh for every proposal, so a re-proposed upgrade after a
/// cancellation is distinguishable from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate a new unique request ID
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn request_id_display_is_ulid() {
        let id = RequestId::new();
        assert_eq!(id.to_string().len(), 26);
    }

    #[test]
    fn request_id_serde_round_trip() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let decoded: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, decoded);
    }
}
