//! Request lifecycle predicates
//!
//! A request's phase is computed from its `proposed_at`, the current
//! time, and the configured delay. Nothing is stored: there is no
//! background task that flips requests to Ready, and no stored phase
//! that could drift from the clock.

use serde::{Deserialize, Serialize};
use tug_identity::Timestamp;

use crate::types::UpgradeRequest;

/// Computed lifecycle phase of a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPhase {
    /// The mandatory delay has not yet elapsed
    Pending,
    /// The request is old enough to accept
    Ready,
}

/// The phase of `request` at `now` under a `delay_secs` delay
#[must_use]
pub fn phase(request: &UpgradeRequest, now: Timestamp, delay_secs: u64) -> RequestPhase {
    if ready(request, now, delay_secs) {
        RequestPhase::Ready
    } else {
        RequestPhase::Pending
    }
}

/// Whether `request` can be accepted at `now`
///
/// True exactly when `now - proposed_at >= delay_secs`. The boundary
/// instant itself is acceptable.
#[must_use]
pub fn ready(request: &UpgradeRequest, now: Timestamp, delay_secs: u64) -> bool {
    match now.secs_since(request.proposed_at) {
        Some(elapsed) => elapsed >= delay_secs,
        None => false,
    }
}

/// Seconds until `request` becomes acceptable, zero if it already is
#[must_use]
pub fn remaining_delay(request: &UpgradeRequest, now: Timestamp, delay_secs: u64) -> u64 {
    let acceptable_at = request.proposed_at.saturating_add_secs(delay_secs);
    acceptable_at.as_secs().saturating_sub(now.as_secs())
}
