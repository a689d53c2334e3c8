//! Geocentric state-vector requests (`EPHEM_TYPE='VECTORS'`, `CENTER='@399'`) used by the
//! longitude logger.
//!
//! The request asks for the JSON envelope of the API. Its `result` string holds the usual text
//! report, where the first record after `$$SOE` carries the position components in km:
//!
//! ```text
//! $$SOE
//! 2459215.500000000 = A.D. 2021-Jan-01 00:00:00.0000 TDB
//!  X = 2.627892928751338E+07 Y =-1.327745582771366E+08 Z = 5.737328014671803E+03
//! $$EOE
//! ```
//!
//! Only `X` and `Y` matter: the longitude is `atan2(Y, X)` in the ecliptic frame.
use std::sync::LazyLock;

use hifitime::Epoch;
use regex::Regex;
use serde::Deserialize;

use super::elements::{ephemeris_block, NUMBER_PATTERN};
use crate::bodies::Body;
use crate::kepsim_errors::KepsimError;
use crate::propagator::ecliptic_longitude;
use crate::time::format_date;

static X_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?:^|\s)X\s*=\s*({NUMBER_PATTERN})")).unwrap());
static Y_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?:^|\s)Y\s*=\s*({NUMBER_PATTERN})")).unwrap());

/// JSON envelope returned by the API when called with `format=json`.
#[derive(Debug, Deserialize)]
pub struct HorizonsJsonResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HorizonsJsonResponse {
    /// The text report, or the error message reported by the API.
    pub fn into_result(self) -> Result<String, KepsimError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(KepsimError::HorizonsApiError(error)),
            (Some(result), None) => Ok(result),
            (None, None) => Err(KepsimError::HorizonsApiError(
                "response without result field".into(),
            )),
        }
    }
}

/// Query parameters of a one-day geocentric vector request for `body` starting at `date`.
pub fn vectors_query(body: Body, date: &Epoch) -> Vec<(&'static str, String)> {
    let next_day = Epoch::from_mjd_utc(date.to_mjd_utc_days() + 1.0);
    vec![
        ("format", "json".to_string()),
        ("COMMAND", format!("'{}'", body.horizons_id())),
        ("OBJ_DATA", "'NO'".to_string()),
        ("MAKE_EPHEM", "'YES'".to_string()),
        ("EPHEM_TYPE", "'VECTORS'".to_string()),
        ("CENTER", "'@399'".to_string()),
        ("START_TIME", format!("'{}'", format_date(date))),
        ("STOP_TIME", format!("'{}'", format_date(&next_day))),
        ("STEP_SIZE", "'1d'".to_string()),
        ("VEC_TABLE", "'1'".to_string()),
    ]
}

fn component(block: &str, re: &Regex, body: Body, name: &str) -> Result<f64, KepsimError> {
    re.captures(block)
        .and_then(|c| c.get(1)?.as_str().parse().ok())
        .ok_or_else(|| KepsimError::MissingVectorComponent {
            body: body.to_string(),
            component: name.to_string(),
        })
}

/// Geocentric ecliptic longitude, in degrees in `[0, 360)`, from the text report of a vector
/// request.
pub fn parse_geocentric_longitude(result: &str, body: Body) -> Result<f64, KepsimError> {
    let block = ephemeris_block(result, body)?;
    let x = component(block, &X_REGEX, body, "X")?;
    let y = component(block, &Y_REGEX, body, "Y")?;
    Ok(ecliptic_longitude(x, y))
}
