use clap::Parser;
use std::process::ExitCode;
use traffic_probe::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

fn main() -> ExitCode {
    // stdout carries the plugin line only; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    tracing::debug!(name = version::NAME, version = version::VERSION, ?args, "starting");

    let report = match options_from(&args) {
        Ok(options) => {
            let mode = if args.reset {
                probe::Mode::Reset
            } else {
                probe::Mode::Check
            };
            let source = counter_source::SystemCounterSource::new();
            probe::run(&source, &options, mode)
        }
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            report::Report::unknown(format!("{:#}", e))
        }
    };

    println!("{}", report.line());
    ExitCode::from(report.exit_code())
}

fn options_from(args: &cli::Args) -> anyhow::Result<probe::ProbeOptions> {
    let config = config::ProbeConfig::load(args.config.as_deref())?;
    probe::ProbeOptions::from_args(args, &config)
}
