//! CLI argument definitions
//!
//! Every flag is optional; with none given the run uses the config file and
//! built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::sink::Schema;

#[derive(Debug, Parser)]
#[command(name = "routelog")]
#[command(
    about = "Log the current Google Maps driving duration between two places to a CSV file",
    version
)]
pub(crate) struct Cli {
    /// Config file to use instead of the default search locations
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Log file to append to (default: gmap_log.csv)
    #[arg(short, long, value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,

    /// Column layout of the log file
    #[arg(long, value_enum)]
    pub(crate) schema: Option<Schema>,

    /// Only log successful measurements
    #[arg(long)]
    pub(crate) skip_failures: bool,

    /// Timezone for the timestamp columns (e.g., "America/New_York", "UTC", "local")
    #[arg(long, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    pub(crate) debug: bool,
}
