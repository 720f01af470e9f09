//! CSV input: header check and per-row validation.
//!
//! The header must contain `id` and `address` (exact, case-sensitive).
//! Other columns are ignored. Rows are yielded in file order; rows that
//! cannot become an [`AddressRecord`] are yielded as [`SkippedRow`] so the
//! caller decides how to report them.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::types::{AddressRecord, ConfigurationError};

const ID_COLUMN: &str = "id";
const ADDRESS_COLUMN: &str = "address";

/// Why a data row was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Empty { id: String, address: String },
    InvalidId(String),
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: u64,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::Empty { id, address } => write!(
                f,
                "Skipping empty row {}: id='{}', address='{}'",
                self.row, id, address
            ),
            SkipReason::InvalidId(id) => {
                write!(f, "Skipping row {}: id '{}' is not an integer", self.row, id)
            }
            SkipReason::Unreadable(e) => write!(f, "Skipping unreadable row {}: {}", self.row, e),
        }
    }
}

/// Streaming reader over the address rows of a CSV source.
pub struct AddressReader<R> {
    inner: csv::Reader<R>,
    id_idx: usize,
    address_idx: usize,
    record: StringRecord,
    row: u64,
    done: bool,
}

impl AddressReader<File> {
    pub fn open(path: &Path) -> Result<Self, ConfigurationError> {
        let inner = builder()
            .from_path(path)
            .map_err(|source| ConfigurationError::OpenInput {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(inner)
    }
}

impl<R: Read> AddressReader<R> {
    pub fn from_reader(reader: R) -> Result<Self, ConfigurationError> {
        Self::new(builder().from_reader(reader))
    }

    fn new(mut inner: csv::Reader<R>) -> Result<Self, ConfigurationError> {
        let headers = inner.headers().map_err(ConfigurationError::Header)?;
        let (id_idx, address_idx) = locate_columns(headers)?;
        Ok(Self {
            inner,
            id_idx,
            address_idx,
            record: StringRecord::new(),
            row: 0,
            done: false,
        })
    }
}

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // Short rows read as empty fields instead of aborting the whole file.
    builder.has_headers(true).flexible(true);
    builder
}

fn locate_columns(headers: &StringRecord) -> Result<(usize, usize), ConfigurationError> {
    // A repeated header name resolves to its last column.
    let find = |name: &str| headers.iter().enumerate().filter(|(_, h)| *h == name).map(|(i, _)| i).last();
    match (find(ID_COLUMN), find(ADDRESS_COLUMN)) {
        (Some(id), Some(address)) => Ok((id, address)),
        (id, address) => {
            let mut missing = Vec::new();
            if id.is_none() {
                missing.push(ID_COLUMN);
            }
            if address.is_none() {
                missing.push(ADDRESS_COLUMN);
            }
            Err(ConfigurationError::MissingColumns { missing })
        }
    }
}

fn validate(row: u64, id: &str, address: &str) -> Result<AddressRecord, SkippedRow> {
    let id = id.trim();
    let address = address.trim();
    if id.is_empty() || address.is_empty() {
        return Err(SkippedRow {
            row,
            reason: SkipReason::Empty {
                id: id.to_string(),
                address: address.to_string(),
            },
        });
    }
    let id = id.parse::<i64>().map_err(|_| SkippedRow {
        row,
        reason: SkipReason::InvalidId(id.to_string()),
    })?;
    Ok(AddressRecord {
        id,
        address: address.to_string(),
        row,
    })
}

impl<R: Read> Iterator for AddressReader<R> {
    type Item = Result<AddressRecord, SkippedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let read = self.inner.read_record(&mut self.record);
        self.row += 1;
        match read {
            Ok(false) => {
                self.done = true;
                None
            }
            Ok(true) => {
                let id = self.record.get(self.id_idx).unwrap_or("");
                let address = self.record.get(self.address_idx).unwrap_or("");
                Some(validate(self.row, id, address))
            }
            Err(e) => {
                // An I/O failure leaves nothing further to read.
                self.done = e.is_io_error();
                Some(Err(SkippedRow {
                    row: self.row,
                    reason: SkipReason::Unreadable(e.to_string()),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(csv: &str) -> Vec<Result<AddressRecord, SkippedRow>> {
        AddressReader::from_reader(csv.as_bytes()).unwrap().collect()
    }

    #[test]
    fn test_reads_quoted_addresses() {
        let rows = read_all("id,address\n1,\"123 Main St, Springfield\"\n2,\"456 Oak Ave, Shelbyville\"\n");
        assert_eq!(
            rows,
            vec![
                Ok(AddressRecord { id: 1, address: "123 Main St, Springfield".into(), row: 1 }),
                Ok(AddressRecord { id: 2, address: "456 Oak Ave, Shelbyville".into(), row: 2 }),
            ]
        );
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let rows = read_all("name,address,id\nHome,  10 Downing St  , 42 \n");
        assert_eq!(
            rows,
            vec![Ok(AddressRecord { id: 42, address: "10 Downing St".into(), row: 1 })]
        );
    }

    #[test]
    fn test_missing_address_column() {
        let err = AddressReader::from_reader("id,street\n1,Main St\n".as_bytes())
            .err()
            .unwrap();
        match err {
            ConfigurationError::MissingColumns { missing } => assert_eq!(missing, vec!["address"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let err = AddressReader::from_reader("ID,Address\n1,Main St\n".as_bytes())
            .err()
            .unwrap();
        match err {
            ConfigurationError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["id", "address"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_header_uses_last_column() {
        let rows = read_all("id,address,address\n1,Old Rd,New Rd\n");
        assert_eq!(
            rows,
            vec![Ok(AddressRecord { id: 1, address: "New Rd".into(), row: 1 })]
        );
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        assert!(matches!(
            AddressReader::from_reader("".as_bytes()),
            Err(ConfigurationError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let rows = read_all("id,address\n1,   \n  ,Main St\n3,Oak Ave\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            Err(SkippedRow {
                row: 1,
                reason: SkipReason::Empty { id: "1".into(), address: "".into() },
            })
        );
        assert!(matches!(rows[1], Err(SkippedRow { row: 2, .. })));
        assert_eq!(
            rows[2],
            Ok(AddressRecord { id: 3, address: "Oak Ave".into(), row: 3 })
        );
    }

    #[test]
    fn test_short_row_is_skipped() {
        let rows = read_all("id,address\n5\n6,Elm St\n");
        assert!(matches!(
            rows[0],
            Err(SkippedRow { row: 1, reason: SkipReason::Empty { .. } })
        ));
        assert_eq!(rows[1].as_ref().unwrap().id, 6);
    }

    #[test]
    fn test_non_numeric_id_is_skipped() {
        let rows = read_all("id,address\nabc,Main St\n");
        assert_eq!(
            rows,
            vec![Err(SkippedRow { row: 1, reason: SkipReason::InvalidId("abc".into()) })]
        );
    }

    #[test]
    fn test_skip_message() {
        let skipped = SkippedRow {
            row: 4,
            reason: SkipReason::Empty { id: "".into(), address: "Main St".into() },
        };
        assert_eq!(skipped.to_string(), "Skipping empty row 4: id='', address='Main St'");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AddressReader::open(&dir.path().join("nope.csv")).err().unwrap();
        assert!(matches!(err, ConfigurationError::OpenInput { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }
}
