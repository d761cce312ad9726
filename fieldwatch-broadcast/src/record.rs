//! Field data recording and replay
//!
//! The daemon can append every checksum-valid reading to a plain text
//! file, one line per sample:
//!
//! ```text
//! 2024-06-14 18:02:11.348201   +1.234 kV/m
//! ```
//!
//! The replay reader walks the same format back, yielding timestamped
//! values that drive the monitor exactly as live data would. Recordings
//! double as the input for offline analysis, so the format stays stable.

use std::io::{self, BufRead, Lines, Write};

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use fieldwatch_core::Timestamp;

use crate::DATE_FORMAT;

/// Errors from replaying a recorded file
#[derive(Error, Debug)]
pub enum ReplayError {
    /// A line did not match the record format
    #[error("unreadable record line: '{line}'")]
    Malformed {
        /// The offending line
        line: String,
    },

    /// I/O failure while reading
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Append-only writer for field recordings
pub struct FieldRecorder<W: Write> {
    out: W,
}

impl<W: Write> FieldRecorder<W> {
    /// Wrap a writer (typically a file opened for append)
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Record one reading; flushes so a crash loses at most one line
    pub fn record(&mut self, time: DateTime<Utc>, field: f32) -> io::Result<()> {
        writeln!(
            self.out,
            "{}  {:+7.3} kV/m",
            time.format(DATE_FORMAT),
            field
        )?;
        self.out.flush()
    }
}

/// Iterator over a recorded field file
pub struct ReplayReader<R: BufRead> {
    lines: Lines<R>,
}

impl<R: BufRead> ReplayReader<R> {
    /// Wrap a buffered reader over a recording
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for ReplayReader<R> {
    type Item = Result<(DateTime<Utc>, f32), ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(err) => return Some(Err(err.into())),
        };

        Some(parse_line(&line))
    }
}

fn parse_line(line: &str) -> Result<(DateTime<Utc>, f32), ReplayError> {
    let malformed = || ReplayError::Malformed {
        line: line.to_string(),
    };

    // Timestamp and value are separated by a double space; the value
    // itself may carry leading padding
    let (stamp, rest) = line.split_once("  ").ok_or_else(malformed)?;

    let time = NaiveDateTime::parse_from_str(stamp, DATE_FORMAT)
        .map_err(|_| malformed())?
        .and_utc();

    let field = rest
        .split_whitespace()
        .next()
        .ok_or_else(malformed)?
        .parse::<f32>()
        .map_err(|_| malformed())?;

    Ok((time, field))
}

/// Millisecond timestamp for the core from a wall-clock time
pub fn timestamp_ms(time: &DateTime<Utc>) -> Timestamp {
    time.timestamp_millis() as Timestamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn record_then_replay_round_trip() {
        let mut buf = Vec::new();
        {
            let mut recorder = FieldRecorder::new(&mut buf);
            let t0 = DateTime::from_timestamp_millis(1_718_380_931_348).unwrap();
            recorder.record(t0, 1.234).unwrap();
            recorder.record(t0 + chrono::Duration::milliseconds(50), -12.5).unwrap();
        }

        let replayed: Vec<(DateTime<Utc>, f32)> = ReplayReader::new(Cursor::new(buf))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed[0].1, 1.234);
        assert_eq!(replayed[1].1, -12.5);
        assert_eq!(timestamp_ms(&replayed[0].0), 1_718_380_931_348);
        assert_eq!(
            replayed[1].0 - replayed[0].0,
            chrono::Duration::milliseconds(50)
        );
    }

    #[test]
    fn recorded_line_format_is_stable() {
        let mut buf = Vec::new();
        let mut recorder = FieldRecorder::new(&mut buf);
        let t = DateTime::from_timestamp_millis(0).unwrap();
        recorder.record(t, 1.2).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1970-01-01 00:00:00.000000   +1.200 kV/m\n"
        );
    }

    #[test]
    fn malformed_lines_are_reported() {
        let bad = Cursor::new("not a record\n");
        let results: Vec<_> = ReplayReader::new(bad).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ReplayError::Malformed { .. })));
    }
}
