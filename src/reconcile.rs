// Reconciliation engine: folds a new raw reading into the running totals.
//
// Raw counters only grow until a reboot or an interface reset drops them back near zero.
// A drop in uptime or in rx marks a discontinuity; after one, the whole new raw value is
// fresh traffic. Otherwise only the forward difference against the last raw value counts.

use crate::models::{RawReading, TrackingState};
use serde::Deserialize;
use tracing::{debug, info};

/// What to do with a negative per-run difference that did not trip discontinuity detection
/// (tx fell while rx and uptime did not).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeDeltaPolicy {
    /// Apply the negative difference to the total (floored at zero).
    #[default]
    PassThrough,
    /// Treat the difference as zero.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscontinuityCause {
    /// Uptime went backwards: the machine rebooted.
    Reboot,
    /// rx went backwards without a reboot: counter wrap or interface reset.
    CounterReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileKind {
    /// No usable previous state; this reading becomes the baseline.
    EpochStart,
    Advance,
    Discontinuity(DiscontinuityCause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: TrackingState,
    /// Changes actually applied to the accumulated totals, after policy and saturation.
    /// Diagnostic only; saturates at the `i64` range.
    pub delta_rx: i64,
    pub delta_tx: i64,
    pub kind: ReconcileKind,
}

/// Reconcile with the default pass-through handling of negative differences.
pub fn reconcile(previous: Option<&TrackingState>, current: &RawReading) -> Reconciliation {
    reconcile_with(previous, current, NegativeDeltaPolicy::default())
}

pub fn reconcile_with(
    previous: Option<&TrackingState>,
    current: &RawReading,
    policy: NegativeDeltaPolicy,
) -> Reconciliation {
    let Some(previous) = previous else {
        debug!(
            rx = current.rx_bytes,
            tx = current.tx_bytes,
            "no previous state, starting epoch"
        );
        return Reconciliation {
            state: TrackingState::baseline(current),
            delta_rx: 0,
            delta_tx: 0,
            kind: ReconcileKind::EpochStart,
        };
    };

    let kind = match detect_discontinuity(previous, current) {
        Some(cause) => {
            info!(
                ?cause,
                uptime = current.uptime_seconds,
                last_uptime = previous.last_uptime,
                rx = current.rx_bytes,
                last_rx = previous.last_raw_rx,
                "counter discontinuity, counting full raw reading"
            );
            ReconcileKind::Discontinuity(cause)
        }
        None => ReconcileKind::Advance,
    };
    let (accumulated_rx, accumulated_tx) = match kind {
        ReconcileKind::Discontinuity(_) => (
            previous.accumulated_rx.saturating_add(current.rx_bytes),
            previous.accumulated_tx.saturating_add(current.tx_bytes),
        ),
        _ => (
            policy.advance(previous.accumulated_rx, previous.last_raw_rx, current.rx_bytes),
            policy.advance(previous.accumulated_tx, previous.last_raw_tx, current.tx_bytes),
        ),
    };
    let delta_rx = applied_delta(previous.accumulated_rx, accumulated_rx);
    let delta_tx = applied_delta(previous.accumulated_tx, accumulated_tx);

    let state = TrackingState {
        accumulated_rx,
        accumulated_tx,
        last_raw_rx: current.rx_bytes,
        last_raw_tx: current.tx_bytes,
        last_uptime: current.uptime_seconds,
    };
    debug!(
        ?kind,
        delta_rx,
        delta_tx,
        accumulated_rx = state.accumulated_rx,
        accumulated_tx = state.accumulated_tx,
        "reconciled"
    );
    Reconciliation {
        state,
        delta_rx,
        delta_tx,
        kind,
    }
}

/// rx is the only counter consulted; tx is expected to reset together with it.
fn detect_discontinuity(
    previous: &TrackingState,
    current: &RawReading,
) -> Option<DiscontinuityCause> {
    if current.uptime_seconds < previous.last_uptime {
        Some(DiscontinuityCause::Reboot)
    } else if current.rx_bytes < previous.last_raw_rx {
        Some(DiscontinuityCause::CounterReset)
    } else {
        None
    }
}

impl NegativeDeltaPolicy {
    /// New total after the raw counter moved from `last` to `current` with no discontinuity.
    fn advance(self, accumulated: u64, last: u64, current: u64) -> u64 {
        if current >= last {
            accumulated.saturating_add(current - last)
        } else {
            match self {
                NegativeDeltaPolicy::PassThrough => accumulated.saturating_sub(last - current),
                NegativeDeltaPolicy::Clamp => accumulated,
            }
        }
    }
}

fn applied_delta(before: u64, after: u64) -> i64 {
    let diff = i128::from(after) - i128::from(before);
    diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
