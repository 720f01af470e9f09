//! Geocoding providers: the `Geocoder` seam and the Nominatim client.

use serde::Deserialize;

use super::types::{Coordinate, LookupFailure};
use crate::config::Cfg;

/// Resolves one free-form address to a coordinate.
pub trait Geocoder {
    fn lookup(&self, address: &str) -> Result<Coordinate, LookupFailure>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn lookup(&self, address: &str) -> Result<Coordinate, LookupFailure> {
        (**self).lookup(address)
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

/// One entry of a Nominatim `/search?format=json` response. Only the
/// coordinates are consumed.
#[derive(Deserialize, Debug, Clone)]
pub struct NominatimPlace {
    pub lat: Degrees,
    pub lon: Degrees,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Nominatim sends degrees as strings; other deployments send numbers.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn to_f64(&self) -> Result<f64, LookupFailure> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| LookupFailure::InvalidCoordinate(s.clone())),
        }
    }
}

/// Blocking client for a Nominatim-compatible search endpoint.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    endpoint: String,
    user_agent: String,
    email: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(cfg: &Cfg) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(cfg.timeout).build();
        Self {
            agent,
            endpoint: cfg.endpoint.clone(),
            user_agent: cfg.user_agent.clone(),
            email: cfg.email.clone(),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, address: &str) -> Result<Coordinate, LookupFailure> {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .set("User-Agent", &self.user_agent)
            .query("q", address)
            .query("format", "json")
            .query("limit", "1");
        if let Some(email) = &self.email {
            request = request.query("email", email);
        }

        log::debug!("GET {} q='{}'", self.endpoint, address);

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(status, response) => LookupFailure::Http {
                status,
                reason: response.status_text().to_string(),
            },
            ureq::Error::Transport(t) => LookupFailure::Transport(t.to_string()),
        })?;

        let body = response
            .into_string()
            .map_err(|e| LookupFailure::Transport(e.to_string()))?;

        parse_search_response(&body)
    }
}

/// Extract the first result's coordinate from a search response body.
pub fn parse_search_response(body: &str) -> Result<Coordinate, LookupFailure> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| LookupFailure::MalformedResponse(e.to_string()))?;

    let first = places.first().ok_or(LookupFailure::NoResults)?;
    let lon = first.lon.to_f64()?;
    let lat = first.lat.to_f64()?;

    if let Some(name) = &first.display_name {
        log::debug!("Matched '{}'", name);
    }

    Ok(Coordinate::new(lon, lat))
}
