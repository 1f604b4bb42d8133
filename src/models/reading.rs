// Raw interface counters as reported by the OS at one instant

use chrono::{DateTime, Utc};

/// Counters are cumulative since the counter's own last reset (boot, driver reload, link flap).
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub uptime_seconds: f64,
    /// Informational only; never consulted by reconciliation.
    pub captured_at: DateTime<Utc>,
}

impl RawReading {
    pub fn new(rx_bytes: u64, tx_bytes: u64, uptime_seconds: f64) -> Self {
        Self {
            rx_bytes,
            tx_bytes,
            uptime_seconds,
            captured_at: Utc::now(),
        }
    }
}
