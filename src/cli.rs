//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::config::CONFIG_ENV;

/// Icinga/Nagios plugin monitoring the accumulated traffic of an interface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Interface to monitor (e.g. eth0)
    #[arg(value_name = "INTERFACE")]
    pub interface: String,

    /// Warning threshold, traffic in bytes
    #[arg(short = 'w', long, value_name = "BYTES", default_value_t = 0)]
    pub warning: u64,

    /// Critical threshold, traffic in bytes
    #[arg(short = 'c', long, value_name = "BYTES", default_value_t = 0)]
    pub critical: u64,

    /// Reset the traffic counter and start a new tracking epoch
    #[arg(short = 'r', long)]
    pub reset: bool,

    /// State file (default: <state dir>/traffic-<INTERFACE>.state)
    #[arg(short = 's', long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// TOML config file
    #[arg(long, value_name = "PATH", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
}
