//! Address resolver: input rows → rate-limited lookups → ordered results.

use std::io::Read;
use std::path::Path;

use super::input::AddressReader;
use super::providers::Geocoder;
use super::throttle::{Clock, RateLimiter};
use super::types::{ConfigurationError, LookupFailure, ResultRecord};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub resolved: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Resolves every row of an address file, one request at a time.
pub struct AddressResolver<G, C> {
    geocoder: G,
    limiter: RateLimiter<C>,
    summary: RunSummary,
}

impl<G: Geocoder, C: Clock> AddressResolver<G, C> {
    pub fn new(geocoder: G, limiter: RateLimiter<C>) -> Self {
        Self {
            geocoder,
            limiter,
            summary: RunSummary::default(),
        }
    }

    /// Resolve the addresses in the CSV file at `path`.
    pub fn resolve(&mut self, path: &Path) -> Result<Vec<ResultRecord>, ConfigurationError> {
        let rows = AddressReader::open(path)?;
        Ok(self.run(rows))
    }

    /// Resolve the addresses of CSV data from any reader.
    pub fn resolve_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> Result<Vec<ResultRecord>, ConfigurationError> {
        let rows = AddressReader::from_reader(reader)?;
        Ok(self.run(rows))
    }

    /// Counters of the most recent run.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn limiter(&self) -> &RateLimiter<C> {
        &self.limiter
    }

    fn run<R: Read>(&mut self, rows: AddressReader<R>) -> Vec<ResultRecord> {
        self.summary = RunSummary::default();
        let started = self.limiter.clock().now();
        let mut results = Vec::new();

        for row in rows {
            let record = match row {
                Ok(record) => record,
                Err(skipped) => {
                    log::warn!("{}", skipped);
                    self.summary.skipped += 1;
                    continue;
                }
            };

            let outcome = self.geocoder.lookup(&record.address);
            match &outcome {
                Ok(coordinate) => {
                    log::debug!("Resolved id {} to {}", record.id, coordinate);
                    self.summary.resolved += 1;
                }
                Err(failure) => {
                    report_failure(&record.address, failure);
                    self.summary.failed += 1;
                }
            }
            results.push(ResultRecord {
                id: record.id,
                outcome,
            });

            self.limiter.pause();
        }

        let elapsed = self.limiter.clock().now().saturating_duration_since(started);
        log::info!(
            "Resolved {} of {} addresses ({} failed, {} rows skipped) in {:.1}s",
            self.summary.resolved,
            results.len(),
            self.summary.failed,
            self.summary.skipped,
            elapsed.as_secs_f64()
        );
        results
    }
}

fn report_failure(address: &str, failure: &LookupFailure) {
    match failure {
        LookupFailure::Http { .. } => {
            log::warn!("HTTP error for '{}': {}", address, failure)
        }
        _ => log::warn!("Geocoding failure for '{}': {}", address, failure),
    }
}
