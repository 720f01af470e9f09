//! Address geocoding pipeline.
//!
//! Reads `id,address` rows, resolves each address through a rate-limited
//! geocoder and produces the count-prefixed `id lon lat` list used by the
//! route optimiser.

pub mod input;
pub mod output;
pub mod providers;
pub mod resolver;
pub mod throttle;
pub mod types;

pub use input::{AddressReader, SkipReason, SkippedRow};
pub use output::{read_results, write_results, FormatError};
pub use providers::{Geocoder, NominatimGeocoder};
pub use resolver::{AddressResolver, RunSummary};
pub use throttle::{Clock, RateLimiter, SystemClock};
pub use types::{AddressRecord, ConfigurationError, Coordinate, LookupFailure, ResultRecord};
