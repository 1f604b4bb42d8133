// Counter source: raw interface byte counters and system uptime

mod linux;

use crate::error::ProbeError;
use crate::models::RawReading;
use chrono::Utc;
use sysinfo::{Networks, System};
use tracing::{debug, instrument};

/// I/O boundary consumed by the probe. Implementors supply the two primitives;
/// `read_counters` captures them back to back so the reconciliation window stays tight.
pub trait CounterSource {
    fn read_interface_bytes(&self, interface: &str) -> Result<(u64, u64), ProbeError>;

    fn read_uptime(&self) -> Result<f64, ProbeError>;

    fn read_counters(&self, interface: &str) -> Result<RawReading, ProbeError> {
        let (rx_bytes, tx_bytes) = self.read_interface_bytes(interface)?;
        let uptime_seconds = self.read_uptime()?;
        Ok(RawReading {
            rx_bytes,
            tx_bytes,
            uptime_seconds,
            captured_at: Utc::now(),
        })
    }
}

/// Reads the running host. Prefers sysfs/procfs on Linux, falls back to sysinfo elsewhere.
#[derive(Debug, Default)]
pub struct SystemCounterSource;

impl SystemCounterSource {
    pub fn new() -> Self {
        Self
    }
}

impl CounterSource for SystemCounterSource {
    #[instrument(skip(self), fields(source = "system", operation = "read_interface_bytes"))]
    fn read_interface_bytes(&self, interface: &str) -> Result<(u64, u64), ProbeError> {
        if !is_valid_interface_name(interface) {
            return Err(ProbeError::InterfaceNotFound {
                interface: interface.to_string(),
            });
        }
        if let Some(counters) = linux::read_interface_bytes_linux(interface) {
            return Ok(counters);
        }
        let networks = Networks::new_with_refreshed_list();
        let counters = networks
            .list()
            .get(interface)
            .map(|data| (data.total_received(), data.total_transmitted()));
        debug!(found = counters.is_some(), "sysinfo interface lookup");
        counters.ok_or_else(|| ProbeError::InterfaceNotFound {
            interface: interface.to_string(),
        })
    }

    #[instrument(skip(self), fields(source = "system", operation = "read_uptime"))]
    fn read_uptime(&self) -> Result<f64, ProbeError> {
        if let Some(uptime) = linux::read_uptime_linux() {
            return Ok(uptime);
        }
        match System::uptime() {
            0 => Err(ProbeError::UptimeUnavailable {
                reason: "neither /proc/uptime nor the platform uptime call returned a value".into(),
            }),
            secs => Ok(secs as f64),
        }
    }
}

/// Names that cannot refer to a /sys/class/net entry.
pub fn is_valid_interface_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/') && !name.contains('\0')
}
