//! The count-prefixed coordinate list consumed by the route optimiser.
//!
//! ```text
//! 3
//! 1 12.340000 56.780000
//! 2 0.000000 0.000000
//! 5 -0.127800 51.507400
//! ```

use std::io::{self, BufRead, Write};

use thiserror::Error;

use super::types::{Coordinate, ResultRecord};

/// Write `results` in input order, failed lookups as the sentinel.
pub fn write_results<W: Write>(mut out: W, results: &[ResultRecord]) -> io::Result<()> {
    writeln!(out, "{}", results.len())?;
    for record in results {
        writeln!(out, "{} {}", record.id, record.coordinate())?;
    }
    out.flush()
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("file is empty")]
    Empty,
    #[error("first line is neither a count nor 'id lon lat': '{0}'")]
    BadFirstLine(String),
    #[error("expected {expected} data lines but file ended after {found}")]
    Truncated { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn parse_entry(line: &str) -> Option<(i64, Coordinate)> {
    let mut parts = line.split_whitespace();
    let id = parts.next()?.parse().ok()?;
    let lon = parts.next()?.parse().ok()?;
    let lat = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((id, Coordinate::new(lon, lat)))
}

/// Read a coordinate list back.
///
/// The count line is optional: when the first non-blank line is already an
/// `id lon lat` entry, every following line is data. Otherwise exactly
/// `count` entries are read. Blank and malformed lines are skipped and do
/// not count toward `count`.
pub fn read_results<R: BufRead>(reader: R) -> Result<Vec<(i64, Coordinate)>, FormatError> {
    let mut lines = reader.lines();

    let first = loop {
        match lines.next() {
            None => return Err(FormatError::Empty),
            Some(line) => {
                let line = line?;
                let line = line.trim();
                if !line.is_empty() {
                    break line.to_string();
                }
            }
        }
    };

    if let Some(entry) = parse_entry(&first) {
        let mut entries = vec![entry];
        for line in lines {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_entry(line) {
                Some(entry) => entries.push(entry),
                None => log::warn!("Skipping malformed line: {}", line),
            }
        }
        return Ok(entries);
    }

    let expected: usize = first
        .parse()
        .map_err(|_| FormatError::BadFirstLine(first.clone()))?;

    let mut entries = Vec::with_capacity(expected);
    while entries.len() < expected {
        let line = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(FormatError::Truncated {
                    expected,
                    found: entries.len(),
                })
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_entry(line) {
            Some(entry) => entries.push(entry),
            None => log::warn!("Skipping malformed line: {}", line),
        }
    }
    Ok(entries)
}
