// Plugin output: status word, single output line, exit code.

use crate::classify::ThresholdLevel;
use std::fmt;

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Monitoring-plugin status. Exit codes are what the scheduler acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
    Reset,
}

impl Status {
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown | Status::Reset => 3,
        }
    }

    /// Critical shares the WARNING word; the message text tells them apart.
    pub fn word(self) -> &'static str {
        match self {
            Status::Ok => "TRAFFIC OK",
            Status::Warning | Status::Critical => "TRAFFIC WARNING",
            Status::Unknown => "TRAFFIC UNKNOWN",
            Status::Reset => "TRAFFIC RESET",
        }
    }
}

impl From<ThresholdLevel> for Status {
    fn from(level: ThresholdLevel) -> Self {
        match level {
            ThresholdLevel::Ok => Status::Ok,
            ThresholdLevel::Warning => Status::Warning,
            ThresholdLevel::Critical => Status::Critical,
        }
    }
}

/// Nagios performance data appended after `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfData {
    pub total: u64,
    pub rx: u64,
    pub tx: u64,
    pub warning: u64,
    pub critical: u64,
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "traffic={}B;{};{};0; rx={}B tx={}B",
            self.total, self.warning, self.critical, self.rx, self.tx
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    pub message: String,
    pub perfdata: Option<PerfData>,
}

impl Report {
    pub fn threshold(level: ThresholdLevel, total: u64) -> Self {
        let text = match level {
            ThresholdLevel::Ok => "Traffic is below the limit",
            ThresholdLevel::Warning => "Traffic is near the limit",
            ThresholdLevel::Critical => "Traffic exceeded the limit",
        };
        Self {
            status: level.into(),
            message: format!("{} - {}", text, human_size(total)),
            perfdata: None,
        }
    }

    pub fn reset(interface: &str) -> Self {
        Self {
            status: Status::Reset,
            message: format!("Traffic counter reset for {}", interface),
            perfdata: None,
        }
    }

    pub fn unknown(diagnostic: impl fmt::Display) -> Self {
        Self {
            status: Status::Unknown,
            message: diagnostic.to_string(),
            perfdata: None,
        }
    }

    pub fn with_perfdata(mut self, perfdata: PerfData) -> Self {
        self.perfdata = Some(perfdata);
        self
    }

    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }

    /// The single stdout line, e.g. `TRAFFIC OK: Traffic is below the limit - 1.5KiB`.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep to one line whatever the diagnostic contains.
        let message = self.message.replace(['\n', '\r'], " ");
        write!(f, "{}: {}", self.status.word(), message)?;
        if let Some(perf) = &self.perfdata {
            write!(f, " | {}", perf)?;
        }
        Ok(())
    }
}

/// Binary-unit size with one decimal: `512.0B`, `1.5KiB`, `3.0GiB`.
pub fn human_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{:.1}{}B", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}YiB", num)
}
