// Probe error taxonomy. Every failure mode gets its own variant so callers and tests can tell them apart.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The named interface has no readable byte counters (absent, or not a valid name).
    #[error("interface '{interface}' not found")]
    InterfaceNotFound { interface: String },

    /// Uptime is required for reboot detection; nothing can be reconciled without it.
    #[error("system uptime unavailable: {reason}")]
    UptimeUnavailable { reason: String },

    #[error(transparent)]
    StateRead(#[from] StateReadError),

    #[error("could not write state file {}: {source}", path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not lock state file {}: {source}", path.display())]
    StateLock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reasons a persisted state could not be used. All of them are recovered by starting a new epoch.
#[derive(Debug, Error)]
pub enum StateReadError {
    #[error("state file {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("could not read state file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {} is unusable: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("state file {} tracks interface '{found}', expected '{expected}'", path.display())]
    InterfaceMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}
