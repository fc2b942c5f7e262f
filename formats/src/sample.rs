//! Position samples as recorded for one flight.
//!
//! The CSV file has no header and the following fields:
//!
//! - segment id (integer)
//! - estimated flag, 0 = measured, 1 = computed
//! - UNIX timestamp in seconds (float)
//! - latitude (degrees)
//! - longitude (degrees)
//! - altitude in feet
//!

use std::io::Read;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{to_meters, ParseError, FIELDS};

/// Column names, in file order.
const COLUMNS: [&str; FIELDS] = [
    "segment",
    "estimated",
    "timestamp",
    "latitude",
    "longitude",
    "altitude",
];

/// One record as found in the file, before any check or conversion.
///
#[derive(Debug, Deserialize)]
struct RawSample {
    segment: i64,
    estimated: i64,
    timestamp: f64,
    latitude: f64,
    longitude: f64,
    /// Feet
    altitude: f64,
}

/// One observed or inferred position report.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    /// Logical flight leg as recorded by the instrument
    pub segment: i64,
    /// Position was computed instead of measured
    pub estimated: bool,
    /// Time of the report, attributed to the flight timezone
    pub time: Zoned,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f64,
}

impl Sample {
    /// Convert one raw record into a `Sample`, `line` is only used for error reporting.
    ///
    pub fn from_record(
        record: &StringRecord,
        line: u64,
        tz: &TimeZone,
    ) -> Result<Sample, ParseError> {
        let row = record.iter().collect::<Vec<_>>().join(",");

        if record.len() != FIELDS {
            return Err(ParseError::BadArity {
                line,
                found: record.len(),
                row,
            });
        }

        let raw: RawSample = match record.deserialize(None) {
            Ok(raw) => raw,
            Err(e) => {
                let column = match e.kind() {
                    ErrorKind::Deserialize { err, .. } => err.field().map(|f| f as usize),
                    _ => None,
                };
                return Err(match column {
                    Some(1) => ParseError::BadFlag {
                        line,
                        value: record[1].to_string(),
                        row,
                    },
                    Some(i) if i < FIELDS => ParseError::BadField {
                        line,
                        field: COLUMNS[i],
                        value: record[i].to_string(),
                        row,
                    },
                    _ => ParseError::Csv(e),
                });
            }
        };

        let estimated = match raw.estimated {
            0 => false,
            1 => true,
            _ => {
                return Err(ParseError::BadFlag {
                    line,
                    value: record[1].to_string(),
                    row,
                });
            }
        };

        // NaN and infinities go through serde, refuse them here
        let values = [raw.timestamp, raw.latitude, raw.longitude, raw.altitude];
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ParseError::BadField {
                line,
                field: COLUMNS[i + 2],
                value: record[i + 2].to_string(),
                row,
            });
        }

        let time = SignedDuration::try_from_secs_f64(raw.timestamp)
            .and_then(Timestamp::from_duration)
            .map_err(|_| ParseError::BadTimestamp {
                line,
                value: raw.timestamp,
                row: row.clone(),
            })?
            .to_zoned(tz.clone());

        Ok(Sample {
            segment: raw.segment,
            estimated,
            time,
            latitude: raw.latitude,
            longitude: raw.longitude,
            altitude: to_meters(raw.altitude),
        })
    }
}

/// Physical line numbers, blank lines included.
///
/// The csv reader skips empty lines without counting them so we count the
/// newlines ourselves, from one record start to the next.
///
#[derive(Debug)]
struct LineCounter {
    /// Bytes already counted
    pos: usize,
    /// Line at `pos`, 1-based
    line: u64,
}

impl LineCounter {
    fn new() -> Self {
        LineCounter { pos: 0, line: 1 }
    }

    /// Line of the record whose parsing started at `byte`.
    ///
    fn at(&mut self, data: &[u8], byte: usize) -> u64 {
        // Parsing may start on the blank lines skipped before the record
        let mut start = byte.min(data.len());
        while start < data.len() && matches!(data[start], b'\n' | b'\r') {
            start += 1;
        }
        if start > self.pos {
            self.line += data[self.pos..start].iter().filter(|&&b| b == b'\n').count() as u64;
            self.pos = start;
        }
        self.line
    }
}

/// Read all the samples of one flight, in file order.
///
/// Any bad record aborts the whole read, we never return a partial flight.
///
#[tracing::instrument(skip(rdr, tz))]
pub fn read_samples<R: Read>(mut rdr: R, tz: &TimeZone) -> Result<Vec<Sample>, ParseError> {
    trace!("reading samples");

    let mut data = vec![];
    rdr.read_to_end(&mut data).map_err(csv::Error::from)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_slice());

    let mut lines = LineCounter::new();
    let mut record = StringRecord::new();
    let mut samples = vec![];
    while reader.read_record(&mut record)? {
        let byte = record.position().map(|p| p.byte()).unwrap_or(0);
        let line = lines.at(&data, byte as usize);
        samples.push(Sample::from_record(&record, line, tz)?);
    }
    debug!("{} samples read", samples.len());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn la() -> TimeZone {
        TimeZone::get("America/Los_Angeles").unwrap()
    }

    #[test]
    fn test_read_samples_simple() {
        let input = "1,0,100,37,-122,1000\n1,1,101.5,37.01,-122.01,1010\n";
        let res = read_samples(input.as_bytes(), &la()).unwrap();

        assert_eq!(2, res.len());
        assert_eq!(1, res[0].segment);
        assert!(!res[0].estimated);
        assert!(res[1].estimated);
        assert_eq!(37.0, res[0].latitude);
        assert_eq!(-122.0, res[0].longitude);
        assert_eq!(1000.0 / 3.281, res[0].altitude);
        assert_eq!(Timestamp::from_second(100).unwrap(), res[0].time.timestamp());
        assert_eq!(
            Timestamp::from_millisecond(101_500).unwrap(),
            res[1].time.timestamp()
        );
    }

    #[test]
    fn test_read_samples_timezone() {
        let input = "1,0,1700000000,37,-122,0\n";
        let res = read_samples(input.as_bytes(), &la()).unwrap();

        assert_eq!(Some("America/Los_Angeles"), res[0].time.time_zone().iana_name());
        // 2023-11-14T22:13:20Z is still PST
        assert_eq!(-8, res[0].time.offset().seconds() / 3600);
    }

    #[test]
    fn test_read_samples_whitespace() {
        let input = " 2 , 1 , 100 , 37 , -122 , 3281 \n";
        let res = read_samples(input.as_bytes(), &la()).unwrap();

        assert_eq!(2, res[0].segment);
        assert!(res[0].estimated);
        assert_eq!(1000.0, res[0].altitude);
    }

    #[test]
    fn test_read_samples_empty() {
        let res = read_samples("".as_bytes(), &la()).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn test_read_samples_keeps_order() {
        let input = "1,0,300,37,-122,0\n1,0,100,37,-122,0\n1,0,200,37,-122,0\n";
        let res = read_samples(input.as_bytes(), &la()).unwrap();

        let secs: Vec<_> = res.iter().map(|s| s.time.timestamp().as_second()).collect();
        assert_eq!(vec![300, 100, 200], secs);
    }

    #[rstest]
    #[case("1,0,100,37,-122\n", 1)]
    #[case("1,0,100,37,-122,1000,12\n", 1)]
    #[case("1,0,100,37,-122,1000\n1,0,101\n", 2)]
    fn test_read_samples_bad_arity(#[case] input: &str, #[case] at: u64) {
        let res = read_samples(input.as_bytes(), &la());
        match res {
            Err(ParseError::BadArity { line, .. }) => assert_eq!(at, line),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    #[case("x,0,100,37,-122,1000", "segment")]
    #[case("1.5,0,100,37,-122,1000", "segment")]
    #[case("1,0,soon,37,-122,1000", "timestamp")]
    #[case("1,0,100,north,-122,1000", "latitude")]
    #[case("1,0,100,37,,1000", "longitude")]
    #[case("1,0,100,37,-122,NaN", "altitude")]
    fn test_read_samples_bad_field(#[case] input: &str, #[case] name: &str) {
        let res = read_samples(input.as_bytes(), &la());
        match res {
            Err(ParseError::BadField { field, row, .. }) => {
                assert_eq!(name, field);
                assert_eq!(input, row);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    #[case("2")]
    #[case("-1")]
    #[case("yes")]
    fn test_read_samples_bad_flag(#[case] flag: &str) {
        let input = format!("1,{flag},100,37,-122,1000\n");
        let res = read_samples(input.as_bytes(), &la());
        assert!(matches!(res, Err(ParseError::BadFlag { line: 1, .. })));
    }

    #[test]
    fn test_read_samples_bad_timestamp() {
        let input = "1,0,1e300,37,-122,1000\n";
        let res = read_samples(input.as_bytes(), &la());
        assert!(matches!(res, Err(ParseError::BadTimestamp { line: 1, .. })));
    }

    #[rstest]
    #[case("1,0,100,37,-122,1000\n\n\n1,0,101,37,x,1000\n", 4)]
    #[case("1,0,100,37,-122,1000\r\n\r\n1,0,101,37,x,1000\r\n", 3)]
    #[case("\n1,0,100,37,x,1000\n", 2)]
    #[case("1,0,100,37,-122,1000\n\n1,0,101,37,-122,1000\n\n1,0,102,37,x,1000", 5)]
    fn test_read_samples_line_after_blank(#[case] input: &str, #[case] at: u64) {
        let err = read_samples(input.as_bytes(), &la()).unwrap_err();
        assert!(matches!(err, ParseError::BadField { field: "longitude", .. }));
        assert_eq!(Some(at), err.line());
    }

    #[test]
    fn test_parse_error_line() {
        let input = "1,0,100,37,-122,1000\n\n1,0,101,37,-122\n";
        let err = read_samples(input.as_bytes(), &la()).unwrap_err();
        assert_eq!(Some(3), err.line());
        assert!(err.to_string().starts_with("line 3:"));
    }
}
