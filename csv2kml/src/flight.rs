//! One flight is one CSV file, converted on its own.
//!
//! A bad file only fails its own flight, the caller gets one result per file and decides
//! what to do with the failures.
//!

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use flighttracks_formats::{group_by_segment, read_samples, segment, Track};
use jiff::tz::TimeZone;
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::error::Status;

/// A converted flight, tracks grouped by segment id.
///
#[derive(Clone, Debug)]
pub struct Flight {
    /// Identifier taken from the file name
    pub name: String,
    /// Number of samples read
    pub samples: usize,
    /// Number of tracks produced
    pub tracks: usize,
    pub segments: Vec<(i64, Vec<Track>)>,
}

/// Flight identifier, the file name without directory and extension.
///
pub fn flight_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Find all the `.csv` files in `dir`, sorted by name.
///
#[tracing::instrument]
pub fn list_flights(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Status::NotADirectory(dir.to_string_lossy().to_string()).into());
    }

    let mut list = fs::read_dir(dir)
        .wrap_err_with(|| format!("can not list {dir:?}"))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect::<Vec<_>>();
    list.sort();

    if list.is_empty() {
        return Err(Status::NoInputFiles(dir.to_string_lossy().to_string()).into());
    }
    debug!("{} flights in {dir:?}", list.len());
    Ok(list)
}

/// Read and segment one flight.
///
#[tracing::instrument(skip(tz))]
pub fn convert_flight(path: &Path, tz: &TimeZone) -> Result<Flight> {
    let name = flight_name(path);
    trace!("converting {name}");

    let fh = File::open(path).wrap_err_with(|| format!("{name}: can not open {path:?}"))?;
    let samples = read_samples(BufReader::new(fh), tz).wrap_err_with(|| name.clone())?;
    let nb = samples.len();

    let tracks = segment(samples).wrap_err_with(|| name.clone())?;
    let ntracks = tracks.len();
    info!("{name}: {nb} samples, {ntracks} tracks");

    Ok(Flight {
        name,
        samples: nb,
        tracks: ntracks,
        segments: group_by_segment(tracks),
    })
}

/// Convert all flights in parallel, results are in the same order as `paths`.
///
#[tracing::instrument(skip_all)]
pub fn convert_all(paths: &[PathBuf], tz: &TimeZone) -> Vec<(PathBuf, Result<Flight>)> {
    paths
        .par_iter()
        .map(|p| {
            let res = convert_flight(p, tz);
            if let Err(e) = &res {
                warn!("{}", describe(e));
            }
            (p.clone(), res)
        })
        .collect()
}

/// Full error chain on one line.
///
pub fn describe(e: &eyre::Report) -> String {
    e.chain()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flighttracks_formats::{InputError, ParseError, Quality};
    use std::io::Write;

    fn la() -> TimeZone {
        TimeZone::get("America/Los_Angeles").unwrap()
    }

    fn write_flight(dir: &Path, name: &str, data: &str) -> PathBuf {
        let path = dir.join(name);
        let mut fh = File::create(&path).unwrap();
        fh.write_all(data.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_flight_name() {
        assert_eq!("N12345", flight_name(Path::new("kml-data/N12345.csv")));
        assert_eq!("a4b2c1", flight_name(Path::new("a4b2c1.csv")));
    }

    #[test]
    fn test_list_flights() {
        let dir = tempfile::tempdir().unwrap();
        write_flight(dir.path(), "b.csv", "");
        write_flight(dir.path(), "a.CSV", "");
        write_flight(dir.path(), "notes.txt", "");

        let list = list_flights(dir.path()).unwrap();
        let names: Vec<_> = list.iter().map(|p| flight_name(p)).collect();
        assert_eq!(vec!["a", "b"], names);
    }

    #[test]
    fn test_list_flights_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_flights(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Status>(),
            Some(Status::NoInputFiles(_))
        ));
    }

    #[test]
    fn test_list_flights_not_a_dir() {
        let err = list_flights(Path::new("/nonexistent/kml-data")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Status>(),
            Some(Status::NotADirectory(_))
        ));
    }

    #[test]
    fn test_convert_flight() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_flight(
            dir.path(),
            "N12345.csv",
            "1,0,100,37,-122,1000\n1,1,101,37.01,-122.01,1010\n2,1,102,37.02,-122.02,1020\n2,0,103,37.03,-122.03,1030\n",
        );

        let f = convert_flight(&path, &la()).unwrap();
        assert_eq!("N12345", f.name);
        assert_eq!(4, f.samples);
        assert_eq!(4, f.tracks);
        assert_eq!(2, f.segments.len());

        let (id, tracks) = &f.segments[0];
        assert_eq!(1, *id);
        assert_eq!(Quality::Actual, tracks[0].quality);
        assert_eq!(Quality::Estimated, tracks[1].quality);

        let (id, tracks) = &f.segments[1];
        assert_eq!(2, *id);
        assert_eq!(2, tracks.len());
    }

    #[test]
    fn test_convert_flight_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_flight(dir.path(), "EMPTY.csv", "");

        let err = convert_flight(&path, &la()).unwrap_err();
        assert!(err.downcast_ref::<InputError>().is_some());
        assert!(describe(&err).starts_with("EMPTY"));
    }

    #[test]
    fn test_convert_flight_bad_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_flight(dir.path(), "BAD.csv", "1,0,100,37,-122,1000\n1,0,zz,37,-122,1000\n");

        let err = convert_flight(&path, &la()).unwrap_err();
        let pe = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(Some(2), pe.line());
        let msg = describe(&err);
        assert!(msg.starts_with("BAD: line 2"));
        assert!(msg.contains("1,0,zz,37,-122,1000"));
    }

    #[test]
    fn test_convert_all_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_flight(dir.path(), "A.csv", "1,0,100,37,-122,1000\n");
        write_flight(dir.path(), "B.csv", "");
        write_flight(dir.path(), "C.csv", "1,0,100,37,-122\n");
        write_flight(dir.path(), "D.csv", "1,0,100,37,-122,1000\n1,0,101,37,-122,1000\n");

        let list = list_flights(dir.path()).unwrap();
        let res = convert_all(&list, &la());

        let ok: Vec<_> = res
            .iter()
            .map(|(p, r)| (flight_name(p), r.is_ok()))
            .collect();
        assert_eq!(
            vec![
                ("A".to_string(), true),
                ("B".to_string(), false),
                ("C".to_string(), false),
                ("D".to_string(), true),
            ],
            ok
        );
    }
}
