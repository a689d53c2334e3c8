//! # JPL Horizons access
//!
//! The simulator needs two things from the outside world:
//!
//! - the osculating orbital elements of each simulated body at the reference epoch
//!   ([`ElementSource`]),
//! - the apparent geocentric ecliptic longitude of a body on a given date, used by the logger
//!   ([`LongitudeSource`]).
//!
//! [`HorizonsClient`] implements both traits on top of the public JPL Horizons REST API
//! (`https://ssd.jpl.nasa.gov/api/horizons.api`) with a blocking [`ureq::Agent`]. The response
//! parsing lives in [`elements`] and [`vectors`] and is free of any network access, so it can be
//! tested against canned responses.
//!
//! The traits are the seam used by the simulation: tests and offline runs substitute an in-memory
//! table (see the [`ElementSource`] implementation for [`HashMap`]).
//!
//! ## Logging
//!
//! Every request is logged at `info` level, the raw Horizons payloads at `debug` level.
use std::collections::HashMap;
use std::time::Duration;

use hifitime::Epoch;
use tracing::{debug, info};
use ureq::{http::Response, Agent, Body as HttpBody};

use crate::bodies::Body;
use crate::kepsim_errors::KepsimError;
use crate::orbital_elements::OrbitalElementSet;
use crate::time::format_date;

pub mod elements;
pub mod vectors;

/// Public endpoint of the JPL Horizons API.
pub const HORIZONS_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// Provider of orbital element sets.
pub trait ElementSource {
    /// Orbital elements of `body` valid at `epoch`.
    fn fetch_elements(&self, body: Body, epoch: Epoch) -> Result<OrbitalElementSet, KepsimError>;
}

/// Provider of apparent geocentric ecliptic longitudes, in degrees in `[0, 360)`.
pub trait LongitudeSource {
    fn geocentric_longitude(&self, body: Body, date: Epoch) -> Result<f64, KepsimError>;
}

/// Static element table, mostly used offline and in tests. The requested epoch is ignored.
impl ElementSource for HashMap<Body, OrbitalElementSet> {
    fn fetch_elements(&self, body: Body, _epoch: Epoch) -> Result<OrbitalElementSet, KepsimError> {
        self.get(&body)
            .cloned()
            .ok_or_else(|| KepsimError::UnknownBody(body.to_string()))
    }
}

/// Connection settings of a [`HorizonsClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonsConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        HorizonsConfig {
            base_url: HORIZONS_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Blocking client of the JPL Horizons API.
///
/// The underlying [`ureq::Agent`] keeps its connection pool across requests, so a single client
/// should be reused for a whole run.
#[derive(Debug, Clone)]
pub struct HorizonsClient {
    config: HorizonsConfig,
    http_client: Agent,
}

impl Default for HorizonsClient {
    fn default() -> Self {
        Self::new(HorizonsConfig::default())
    }
}

impl HorizonsClient {
    pub fn new(config: HorizonsConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .into();

        HorizonsClient {
            config,
            http_client: agent,
        }
    }

    pub fn config(&self) -> &HorizonsConfig {
        &self.config
    }

    /// GET the API with `params`. With `status_as_error` unset, non-2xx answers are returned
    /// as responses so that their body can still be read.
    fn get_with_query(
        &self,
        params: &[(&str, String)],
        status_as_error: bool,
    ) -> Result<Response<HttpBody>, KepsimError> {
        let request = params
            .iter()
            .fold(self.http_client.get(&self.config.base_url), |req, (key, value)| {
                req.query(*key, value)
            });
        Ok(request
            .config()
            .http_status_as_error(status_as_error)
            .build()
            .call()?)
    }
}

impl ElementSource for HorizonsClient {
    fn fetch_elements(&self, body: Body, epoch: Epoch) -> Result<OrbitalElementSet, KepsimError> {
        let day = elements::start_of_day(&epoch);
        info!(body = %body, date = %format_date(&day), "Fetching orbital elements from Horizons");

        let text = self
            .get_with_query(&elements::elements_query(body, &day), true)?
            .body_mut()
            .read_to_string()?;
        debug!(body = %body, "Raw Horizons elements response:\n{text}");

        elements::parse_elements(&text, body, day)
    }
}

impl LongitudeSource for HorizonsClient {
    fn geocentric_longitude(&self, body: Body, date: Epoch) -> Result<f64, KepsimError> {
        info!(body = %body, date = %format_date(&date), "Fetching geocentric vector from Horizons");

        // bad queries come back as HTTP 400 with the reason in the JSON envelope
        let mut response = self.get_with_query(&vectors::vectors_query(body, &date), false)?;
        let status = response.status();
        let envelope = match response
            .body_mut()
            .read_json::<vectors::HorizonsJsonResponse>()
        {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => return Err(err.into()),
            Err(_) => {
                return Err(KepsimError::HorizonsApiError(format!(
                    "HTTP status {status}"
                )))
            }
        };
        debug!(body = %body, "Raw Horizons vectors response ({status}): {envelope:?}");

        let result = envelope.into_result()?;
        if !status.is_success() {
            return Err(KepsimError::HorizonsApiError(format!("HTTP status {status}")));
        }
        vectors::parse_geocentric_longitude(&result, body)
    }
}
