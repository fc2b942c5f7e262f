//! Convert the position CSV files of a set of flights into a single KML file.
//!
//! Every flight is one CSV file in the input directory (`kml-data` by default), the flight
//! identifier being the file name.  Positions are split into tracks whenever they switch
//! between measured and estimated, or when the segment id changes; each track is written as a
//! `gx:Track` so that every point keeps its timestamp.
//!
//! Measured tracks use the `good` style, estimated ones the `bad` style, both defined in the
//! configuration file (`$HOME/.config/flighttracks/csv2kml.hcl` or `-c`), a built-in default
//! being used otherwise.
//!
//! A flight that can not be converted is reported and skipped, the others are still written.
//!

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{crate_authors, crate_version, Parser};
use eyre::{Result, WrapErr};
use flighttracks_common::{init_logging, ConfigFile};
use jiff::tz::TimeZone;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, trace};

use crate::cli::Opts;
use crate::config::{KmlConfig, TAG};
use crate::error::Status;
use crate::flight::{convert_all, describe, flight_name, list_flights, Flight};

mod cli;
mod config;
mod error;
mod export;
mod flight;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

/// Banner with the versions of our internal modules
///
fn version() -> String {
    format!(
        "{}/{} by {} ({} {})",
        NAME,
        VERSION,
        AUTHORS,
        flighttracks_formats::version(),
        flighttracks_common::version(),
    )
}

/// One line per flight, converted or not.
///
fn summary(results: &[(PathBuf, Result<Flight>)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Flight", "Samples", "Tracks", "Status"]);

    results.iter().for_each(|(path, res)| match res {
        Ok(f) => builder.push_record([
            f.name.clone(),
            f.samples.to_string(),
            f.tracks.to_string(),
            "ok".to_string(),
        ]),
        Err(e) => builder.push_record([
            flight_name(path),
            "-".to_string(),
            "-".to_string(),
            describe(e),
        ]),
    });
    builder.build().with(Style::modern()).to_string()
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    if opts.version {
        println!("{}", version());
        return Ok(());
    }
    if !opts.quiet {
        eprintln!("{}\n", version());
    }

    init_logging(NAME, opts.tree, opts.log_dir.clone())?;
    trace!("Logging initialised.");

    // Load default config if nothing is specified
    //
    info!("Loading config…");
    let cfg = ConfigFile::<KmlConfig>::load(TAG, opts.config.as_deref())?;
    match cfg.source() {
        Some(fname) => info!("Using {fname:?}"),
        None => info!("Using built-in configuration"),
    }
    let mut cfg = cfg.into_inner();
    if let Some(tz) = &opts.timezone {
        cfg.timezone = tz.clone();
    }
    let tz = TimeZone::get(&cfg.timezone).map_err(|_| Status::BadTimezone(cfg.timezone.clone()))?;

    let list = list_flights(&opts.input)?;
    info!("{} flights in {:?}", list.len(), opts.input);

    let now = Instant::now();
    let results = convert_all(&list, &tz);
    let now = now.elapsed().as_millis();

    if !opts.quiet {
        eprintln!("{}", summary(&results));
    }

    let total = results.len();
    let flights: Vec<Flight> = results.into_iter().filter_map(|(_, r)| r.ok()).collect();
    if flights.is_empty() {
        return Err(Status::NoFlightConverted(total).into());
    }
    info!("{}/{} flights converted in {}ms", flights.len(), total, now);

    // Write the whole thing
    //
    let output = match &opts.output {
        Some(output) => output,
        None => return Err(eyre::eyre!("no output file")),
    };
    let data = export::render(&cfg, &flights);
    fs::write(output, data).wrap_err_with(|| format!("can not write {output:?}"))?;
    info!("Written {output:?}");

    Ok(())
}
