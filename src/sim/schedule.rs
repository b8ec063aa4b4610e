//! Match-scoped delayed actions
//!
//! Goal celebrations and the full-time whistle schedule work for later
//! without blocking the tick loop. Timers live inside the `Match`, so
//! dropping or tearing down the match cancels them.

use serde::{Deserialize, Serialize};

/// Work to perform once a timer expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Ball back to the center spot after a goal
    KickoffReset,
    /// Clear the status banner
    ClearStatus,
    /// Emit the final result after the full-time grace period
    EmitFinalResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: DeferredAction,
    /// Seconds until it fires
    pub remaining: f32,
}

/// Queue `action` to fire after `delay` seconds
pub fn schedule(pending: &mut Vec<PendingAction>, action: DeferredAction, delay: f32) {
    pending.push(PendingAction {
        action,
        remaining: delay.max(0.0),
    });
}

/// Drop any queued instance of `action`
pub fn cancel(pending: &mut Vec<PendingAction>, action: DeferredAction) {
    pending.retain(|p| p.action != action);
}

/// Advance every timer by `dt`, returning expired actions in firing order
pub fn advance(pending: &mut Vec<PendingAction>, dt: f32) -> Vec<DeferredAction> {
    for p in pending.iter_mut() {
        p.remaining -= dt;
    }
    let mut due: Vec<PendingAction> = pending
        .iter()
        .copied()
        .filter(|p| p.remaining <= 0.0)
        .collect();
    pending.retain(|p| p.remaining > 0.0);
    // Earliest deadline first; stable for ties
    due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
    due.into_iter().map(|p| p.action).collect()
}
