//! Core types for the geocoding pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// One validated input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub id: i64,
    pub address: String,
    /// 1-based position among the data rows (header excluded).
    pub row: u64,
}

/// A longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Placeholder written for rows whose lookup failed.
    pub const SENTINEL: Coordinate = Coordinate {
        longitude: 0.0,
        latitude: 0.0,
    };

    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} {:.6}", self.longitude, self.latitude)
    }
}

/// The outcome for one processed row, in input order.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub id: i64,
    pub outcome: Result<Coordinate, LookupFailure>,
}

impl ResultRecord {
    /// The coordinate to emit: the lookup result, or the sentinel on failure.
    pub fn coordinate(&self) -> Coordinate {
        self.outcome
            .as_ref()
            .copied()
            .unwrap_or(Coordinate::SENTINEL)
    }
}

/// Fatal errors: the batch cannot start or its output cannot be produced.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot open input file '{}': {}", .path.display(), .source)]
    OpenInput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot read CSV header: {0}")]
    Header(#[source] csv::Error),
    #[error("CSV must have columns 'id' and 'address' (missing: {})", .missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },
    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

/// Per-row lookup problems. Never fatal; the row gets the sentinel coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupFailure {
    #[error("{status} {reason}")]
    Http { status: u16, reason: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("no results")]
    NoResults,
    #[error("invalid coordinate value '{0}'")]
    InvalidCoordinate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(12.34, 56.78).to_string(), "12.340000 56.780000");
        assert_eq!(Coordinate::new(-0.1278, 51.5074).to_string(), "-0.127800 51.507400");
        assert_eq!(Coordinate::SENTINEL.to_string(), "0.000000 0.000000");
    }

    #[test]
    fn test_failed_record_uses_sentinel() {
        let record = ResultRecord {
            id: 7,
            outcome: Err(LookupFailure::NoResults),
        };
        assert!(record.outcome.is_err());
        assert_eq!(record.coordinate(), Coordinate::SENTINEL);
    }

    #[test]
    fn test_resolved_record_keeps_coordinate() {
        let record = ResultRecord {
            id: 7,
            outcome: Ok(Coordinate::new(18.0686, 59.3293)),
        };
        assert!(record.outcome.is_ok());
        assert_eq!(record.coordinate(), Coordinate::new(18.0686, 59.3293));
    }

    #[test]
    fn test_missing_columns_message() {
        let err = ConfigurationError::MissingColumns {
            missing: vec!["id", "address"],
        };
        assert_eq!(
            err.to_string(),
            "CSV must have columns 'id' and 'address' (missing: id, address)"
        );
    }
}
