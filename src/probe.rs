// One probe invocation: lock -> read counters -> load state -> reconcile -> save -> classify -> report.
// I/O failures end here: recoverable ones are logged and degraded around, the rest become UNKNOWN.

use crate::classify::classify;
use crate::cli::Args;
use crate::config::ProbeConfig;
use crate::counter_source::CounterSource;
use crate::error::{ProbeError, StateReadError};
use crate::models::TrackingState;
use crate::reconcile::{NegativeDeltaPolicy, reconcile_with};
use crate::report::{PerfData, Report};
use crate::state_store::{StateLock, StateStore, default_state_path};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Check,
    Reset,
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub interface: String,
    pub warning: u64,
    pub critical: u64,
    pub state_path: PathBuf,
    pub negative_delta: NegativeDeltaPolicy,
    pub lock_state: bool,
    pub lock_timeout: Duration,
    pub perfdata: bool,
}

impl ProbeOptions {
    /// Command-line values take precedence; the config supplies everything else.
    pub fn from_args(args: &Args, config: &ProbeConfig) -> anyhow::Result<Self> {
        let state_path = match &args.state_file {
            Some(path) => path.clone(),
            None => default_state_path(&config.state_dir()?, &args.interface),
        };
        Ok(Self {
            interface: args.interface.clone(),
            warning: args.warning,
            critical: args.critical,
            state_path,
            negative_delta: config.reconcile.negative_delta,
            lock_state: config.state.lock,
            lock_timeout: Duration::from_millis(config.state.lock_timeout_ms),
            perfdata: config.output.perfdata,
        })
    }
}

pub fn run<S: CounterSource + ?Sized>(source: &S, options: &ProbeOptions, mode: Mode) -> Report {
    match mode {
        Mode::Check => run_check(source, options),
        Mode::Reset => run_reset(source, options),
    }
}

/// Normal run: update the running total and classify it against the thresholds.
pub fn run_check<S: CounterSource + ?Sized>(source: &S, options: &ProbeOptions) -> Report {
    check(source, options).unwrap_or_else(|e| {
        warn!(error = %e, interface = %options.interface, "check failed");
        Report::unknown(e)
    })
}

/// Start a new tracking epoch with the current reading as baseline.
pub fn run_reset<S: CounterSource + ?Sized>(source: &S, options: &ProbeOptions) -> Report {
    reset(source, options).unwrap_or_else(|e| {
        warn!(error = %e, interface = %options.interface, "reset failed");
        Report::unknown(e)
    })
}

fn check<S: CounterSource + ?Sized>(
    source: &S,
    options: &ProbeOptions,
) -> Result<Report, ProbeError> {
    if options.critical < options.warning {
        warn!(
            warning = options.warning,
            critical = options.critical,
            "critical threshold is below warning threshold"
        );
    }
    let store = StateStore::new(&options.state_path, &options.interface);
    let _lock = acquire_lock(&store, options);

    let reading = source.read_counters(&options.interface)?;
    let previous = load_previous(&store);
    let outcome = reconcile_with(previous.as_ref(), &reading, options.negative_delta);

    if let Err(e) = store.save(&outcome.state, reading.captured_at) {
        warn!(error = %e, "state not persisted, next run will use a stale baseline");
    }

    let total = outcome.state.total();
    let level = classify(total, options.warning, options.critical);
    let report = Report::threshold(level, total);
    Ok(if options.perfdata {
        report.with_perfdata(perfdata(&outcome.state, options))
    } else {
        report
    })
}

fn reset<S: CounterSource + ?Sized>(
    source: &S,
    options: &ProbeOptions,
) -> Result<Report, ProbeError> {
    let store = StateStore::new(&options.state_path, &options.interface);
    let _lock = acquire_lock(&store, options);

    let reading = source.read_counters(&options.interface)?;
    store.save(&TrackingState::baseline(&reading), reading.captured_at)?;
    info!(
        interface = %options.interface,
        rx = reading.rx_bytes,
        tx = reading.tx_bytes,
        "traffic counter reset"
    );
    Ok(Report::reset(&options.interface))
}

fn acquire_lock(store: &StateStore, options: &ProbeOptions) -> Option<StateLock> {
    if !options.lock_state {
        return None;
    }
    match store.lock_with_timeout(options.lock_timeout) {
        Ok(lock) => Some(lock),
        Err(e) => {
            warn!(error = %e, "continuing without state lock");
            None
        }
    }
}

/// Any unusable state starts a new epoch; only a missing file is expected.
fn load_previous(store: &StateStore) -> Option<TrackingState> {
    match store.load_state() {
        Ok(state) => Some(state),
        Err(e @ StateReadError::Missing { .. }) => {
            info!(error = %e, "no previous state, starting new epoch");
            None
        }
        Err(e) => {
            warn!(error = %e, "could not use previous state, starting new epoch");
            None
        }
    }
}

fn perfdata(state: &TrackingState, options: &ProbeOptions) -> PerfData {
    PerfData {
        total: state.total(),
        rx: state.accumulated_rx,
        tx: state.accumulated_tx,
        warning: options.warning,
        critical: options.critical,
    }
}
