use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use address_resolver::config::{self, Cfg};
use address_resolver::geocode::{
    write_results, AddressResolver, ConfigurationError, NominatimGeocoder, RateLimiter,
    SystemClock,
};
use clap::error::ErrorKind;
use clap::Parser;

/// Geocode a CSV of addresses into a coordinate list for route optimisation.
///
/// The input needs a header row with `id` and `address` columns. Output is
/// the number of geocoded rows followed by one `id lon lat` line per row.
/// Addresses that cannot be geocoded get `0.000000 0.000000`.
///
/// Examples:
///   geocode addresses.csv > coords.txt
///   geocode --email ops@example.com addresses.csv -o coords.txt
#[derive(Parser)]
#[command(name = "geocode", version, about, long_about = None)]
struct Cli {
    /// CSV file with `id` and `address` columns.
    input: PathBuf,

    /// Write the coordinate list here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Nominatim-compatible search endpoint.
    #[arg(long, env = "GEOCODER_ENDPOINT", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// User-Agent identifying this client to the provider.
    #[arg(long, env = "GEOCODER_USER_AGENT")]
    user_agent: Option<String>,

    /// Contact email sent with every request.
    #[arg(long, env = "GEOCODER_EMAIL")]
    email: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "GEOCODER_TIMEOUT_SECS", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Pause after each request, in milliseconds.
    #[arg(long, env = "GEOCODER_INTERVAL_MS", default_value_t = config::DEFAULT_INTERVAL_MS)]
    interval_ms: u64,
}

impl Cli {
    fn cfg(&self) -> Cfg {
        Cfg {
            endpoint: self.endpoint.clone(),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(config::default_user_agent),
            email: self.email.clone(),
            timeout: Duration::from_secs(self.timeout),
            interval: Duration::from_millis(self.interval_ms),
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::try_parse().unwrap_or_else(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            let _ = e.print();
            std::process::exit(1);
        }
    });

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ConfigurationError> {
    let cfg = cli.cfg().validate()?;

    // ── Resolve ─────────────────────────────────────────────────

    let geocoder = NominatimGeocoder::new(&cfg);
    let limiter = RateLimiter::new(SystemClock, cfg.interval);
    let mut resolver = AddressResolver::new(geocoder, limiter);
    let results = resolver.resolve(&cli.input)?;

    // ── Write ───────────────────────────────────────────────────

    // Only created once every row is resolved; a fatal error leaves no file.
    match &cli.output {
        Some(path) => write_results(BufWriter::new(fs::File::create(path)?), &results)?,
        None => write_results(io::stdout().lock(), &results)?,
    }
    Ok(())
}
