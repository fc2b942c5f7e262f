use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};

/// CLI options
#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// Configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Directory holding one CSV file per flight.
    #[clap(short = 'd', long, default_value = "kml-data")]
    pub input: PathBuf,
    /// Directory for log files (default is no log file).
    #[clap(long)]
    pub log_dir: Option<String>,
    /// Quiet mode, no summary.
    #[clap(short = 'q', long = "quiet")]
    pub quiet: bool,
    /// Hierarchical logging output.
    #[clap(long)]
    pub tree: bool,
    /// Display utility full version.
    #[clap(short = 'V', long)]
    pub version: bool,
    /// Timezone to attribute timestamps to, overrides the configuration.
    #[clap(short = 'z', long)]
    pub timezone: Option<String>,
    /// Output KML file.
    #[clap(required_unless_present = "version")]
    pub output: Option<PathBuf>,
}
