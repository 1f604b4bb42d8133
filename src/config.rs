use crate::reconcile::NegativeDeltaPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable clap reads for `--config`.
pub const CONFIG_ENV: &str = "TRAFFIC_PROBE_CONFIG";

/// Optional probe configuration. Every section and field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub state: StateConfig,
    pub reconcile: ReconcileConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateConfig {
    /// Directory holding `traffic-<iface>.state`. Defaults to the executable's directory.
    pub dir: Option<PathBuf>,
    /// Guard the read-modify-write cycle with an advisory file lock.
    pub lock: bool,
    /// Give up waiting for a concurrent invocation after this long and run unlocked.
    pub lock_timeout_ms: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lock: true,
            lock_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    pub negative_delta: NegativeDeltaPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Append Nagios performance data to the output line.
    pub perfdata: bool,
}

impl ProbeConfig {
    /// Load from `path`, or built-in defaults when no file was given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: ProbeConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(dir) = &self.state.dir {
            anyhow::ensure!(
                !dir.as_os_str().is_empty(),
                "state.dir must be non-empty when set"
            );
        }
        Ok(())
    }

    /// Configured state directory, or the directory of the running executable.
    pub fn state_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.state.dir {
            return Ok(dir.clone());
        }
        let exe = std::env::current_exe()?;
        let exe = exe.canonicalize().unwrap_or(exe);
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("executable path {} has no parent", exe.display()))
    }
}
