// Running totals carried across raw-counter resets

use wincode::{SchemaRead, SchemaWrite};

use super::RawReading;

#[derive(Debug, Clone, PartialEq, SchemaRead, SchemaWrite)]
pub struct TrackingState {
    pub accumulated_rx: u64,
    pub accumulated_tx: u64,
    pub last_raw_rx: u64,
    pub last_raw_tx: u64,
    pub last_uptime: f64,
}

impl TrackingState {
    /// Start of a tracking epoch: nothing accumulated, `reading` becomes the baseline.
    pub fn baseline(reading: &RawReading) -> Self {
        Self {
            accumulated_rx: 0,
            accumulated_tx: 0,
            last_raw_rx: reading.rx_bytes,
            last_raw_tx: reading.tx_bytes,
            last_uptime: reading.uptime_seconds,
        }
    }

    /// Received plus transmitted bytes in this epoch.
    pub fn total(&self) -> u64 {
        self.accumulated_rx.saturating_add(self.accumulated_tx)
    }
}
