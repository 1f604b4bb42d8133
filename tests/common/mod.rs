// Shared test helpers

#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;
use std::time::Duration;
use traffic_probe::counter_source::CounterSource;
use traffic_probe::error::ProbeError;
use traffic_probe::models::{RawReading, TrackingState};
use traffic_probe::probe::ProbeOptions;
use traffic_probe::reconcile::NegativeDeltaPolicy;

/// Counter source whose values the test sets between invocations.
pub struct FakeSource {
    pub rx: Cell<u64>,
    pub tx: Cell<u64>,
    pub uptime: Cell<f64>,
    pub interface_present: Cell<bool>,
    pub uptime_available: Cell<bool>,
}

impl FakeSource {
    pub fn new(rx: u64, tx: u64, uptime: f64) -> Self {
        Self {
            rx: Cell::new(rx),
            tx: Cell::new(tx),
            uptime: Cell::new(uptime),
            interface_present: Cell::new(true),
            uptime_available: Cell::new(true),
        }
    }

    pub fn set(&self, rx: u64, tx: u64, uptime: f64) {
        self.rx.set(rx);
        self.tx.set(tx);
        self.uptime.set(uptime);
    }
}

impl CounterSource for FakeSource {
    fn read_interface_bytes(&self, interface: &str) -> Result<(u64, u64), ProbeError> {
        if !self.interface_present.get() {
            return Err(ProbeError::InterfaceNotFound {
                interface: interface.to_string(),
            });
        }
        Ok((self.rx.get(), self.tx.get()))
    }

    fn read_uptime(&self) -> Result<f64, ProbeError> {
        if !self.uptime_available.get() {
            return Err(ProbeError::UptimeUnavailable {
                reason: "test".into(),
            });
        }
        Ok(self.uptime.get())
    }
}

pub fn options(dir: &Path, warning: u64, critical: u64) -> ProbeOptions {
    ProbeOptions {
        interface: "eth0".into(),
        warning,
        critical,
        state_path: dir.join("traffic-eth0.state"),
        negative_delta: NegativeDeltaPolicy::PassThrough,
        lock_state: true,
        lock_timeout: Duration::from_millis(200),
        perfdata: false,
    }
}

pub fn reading(rx: u64, tx: u64, uptime: f64) -> RawReading {
    RawReading::new(rx, tx, uptime)
}

/// Previous state used by the worked scenarios.
pub fn scenario_state() -> TrackingState {
    TrackingState {
        accumulated_rx: 1000,
        accumulated_tx: 500,
        last_raw_rx: 50_000,
        last_raw_tx: 20_000,
        last_uptime: 10_000.0,
    }
}
