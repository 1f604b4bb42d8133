// Durable TrackingState: one versioned binary record per interface, replaced atomically.

mod blob;

use crate::error::{ProbeError, StateReadError};
use crate::models::TrackingState;
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions, TryLockError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use wincode::{SchemaRead, SchemaWrite};

/// On-disk record. The capture time is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, SchemaRead, SchemaWrite)]
pub struct StateRecord {
    pub interface: String,
    pub captured_at_ms: i64,
    pub state: TrackingState,
}

pub struct StateStore {
    path: PathBuf,
    interface: String,
}

/// Exclusive advisory lock over the read-modify-write cycle. Released when dropped.
#[derive(Debug)]
pub struct StateLock {
    _file: File,
    path: PathBuf,
}

impl StateLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// How long `lock` waits for a concurrent invocation before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// `<dir>/traffic-<interface>.state`
pub fn default_state_path(dir: &Path, interface: &str) -> PathBuf {
    dir.join(format!("traffic-{}.state", interface))
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>, interface: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            interface: interface.into(),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    pub fn lock(&self) -> Result<StateLock, ProbeError> {
        self.lock_with_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Waits at most `timeout` for another invocation to release the lock.
    #[instrument(skip(self), fields(store = "state", operation = "lock", path = %self.path.display()))]
    pub fn lock_with_timeout(&self, timeout: Duration) -> Result<StateLock, ProbeError> {
        let lock_path = self.lock_path();
        let to_err = |source| ProbeError::StateLock {
            path: lock_path.clone(),
            source,
        };
        ensure_parent_dir(&lock_path).map_err(to_err)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(to_err)?;

        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock() {
                Ok(()) => break,
                Err(TryLockError::Error(e)) => return Err(to_err(e)),
                Err(TryLockError::WouldBlock) if Instant::now() >= deadline => {
                    return Err(to_err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("still held by another invocation after {:?}", timeout),
                    )));
                }
                Err(TryLockError::WouldBlock) => std::thread::sleep(LOCK_RETRY_INTERVAL),
            }
        }
        debug!("state lock acquired");
        Ok(StateLock {
            _file: file,
            path: lock_path,
        })
    }

    #[instrument(skip(self), fields(store = "state", operation = "load", path = %self.path.display()))]
    pub fn load(&self) -> Result<StateRecord, StateReadError> {
        let bytes = std::fs::read(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StateReadError::Missing {
                    path: self.path.clone(),
                }
            } else {
                StateReadError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let corrupt = |reason: String| StateReadError::Corrupt {
            path: self.path.clone(),
            reason,
        };

        let (version, payload) =
            blob::split_version(&bytes).ok_or_else(|| corrupt("empty file".into()))?;
        if version != blob::STATE_VERSION {
            return Err(corrupt(format!("unsupported format version {}", version)));
        }
        let record: StateRecord =
            wincode::deserialize(payload).map_err(|e| corrupt(format!("wincode: {}", e)))?;

        if record.interface != self.interface {
            return Err(StateReadError::InterfaceMismatch {
                path: self.path.clone(),
                expected: self.interface.clone(),
                found: record.interface,
            });
        }
        let uptime = record.state.last_uptime;
        if !uptime.is_finite() || uptime < 0.0 {
            return Err(corrupt(format!("invalid last_uptime {}", uptime)));
        }
        debug!(
            accumulated_rx = record.state.accumulated_rx,
            accumulated_tx = record.state.accumulated_tx,
            "state loaded"
        );
        Ok(record)
    }

    /// Convenience over `load` for callers that only need the tracking state.
    pub fn load_state(&self) -> Result<TrackingState, StateReadError> {
        self.load().map(|record| record.state)
    }

    /// Writes to a temp file beside the target, fsyncs, then renames over it.
    #[instrument(skip(self, state), fields(store = "state", operation = "save", path = %self.path.display()))]
    pub fn save(
        &self,
        state: &TrackingState,
        captured_at: DateTime<Utc>,
    ) -> Result<(), ProbeError> {
        let record = StateRecord {
            interface: self.interface.clone(),
            captured_at_ms: captured_at.timestamp_millis(),
            state: state.clone(),
        };
        self.write_record(&record)
            .map_err(|source| ProbeError::StateWrite {
                path: self.path.clone(),
                source,
            })?;
        debug!("state saved");
        Ok(())
    }

    fn write_record(&self, record: &StateRecord) -> io::Result<()> {
        let payload = wincode::serialize(record)
            .map_err(|e| io::Error::other(format!("wincode: {}", e)))?;
        let bytes = blob::with_version_prefix(blob::STATE_VERSION, payload);

        let dir = ensure_parent_dir(&self.path)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Creates the parent directory if needed and returns it ("." for bare file names).
fn ensure_parent_dir(path: &Path) -> io::Result<&Path> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(parent)
        }
        _ => Ok(Path::new(".")),
    }
}
