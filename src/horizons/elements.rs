//! Osculating element requests (`EPHEM_TYPE='ELEMENTS'`) and the parser of their text answer.
//!
//! Horizons answers an element request with a plain-text report. The data block starts after the
//! `$$SOE` marker and reads
//!
//! ```text
//! $$SOE
//! 2459215.500000000 = A.D. 2021-Jan-01 00:00:00.0000 TDB
//!  EC= 1.705974755844298E-02 QR= 1.470093894068785E+08 IN= 4.164075603038432E-04
//!  OM= 1.498625963929686E+02 W = 3.146587763491159E+02 Tp=  2459218.230546016432
//!  N = 1.141184536588004E-05 MA= 3.597447215862011E+02 TA= 3.596556086428082E+02
//!  A = 1.495607593693229E+08 AD= 1.521121293318674E+08 PR= 3.154623585402380E+07
//! $$EOE
//! ```
//!
//! Only the first record is read. `A` is given in km and converted to AU.
use std::sync::LazyLock;

use hifitime::Epoch;
use regex::Regex;

use crate::bodies::Body;
use crate::kepsim_errors::KepsimError;
use crate::orbital_elements::OrbitalElementSet;
use crate::time::format_date;

pub(crate) const START_OF_EPHEMERIS: &str = "$$SOE";
pub(crate) const END_OF_EPHEMERIS: &str = "$$EOE";

/// Floating point literal as printed by Horizons, e.g. `-1.705974755844298E-02`.
pub(crate) const NUMBER_PATTERN: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[Ee][-+]?\d+)?";

/// Labels of the parsed fields, in the order expected by [`OrbitalElementSet::from_horizons_km`]
/// except for `A`, which comes last.
const ELEMENT_LABELS: [&str; 6] = ["EC=", "IN=", "OM=", "W =", "MA=", "A ="];

static ELEMENT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ELEMENT_LABELS
        .iter()
        .map(|label| {
            Regex::new(&format!(
                r"(?:^|\s){}\s*({NUMBER_PATTERN})",
                regex::escape(label)
            ))
            .unwrap()
        })
        .collect()
});

/// Midnight UTC of the calendar day of `epoch`.
pub fn start_of_day(epoch: &Epoch) -> Epoch {
    Epoch::from_mjd_utc(epoch.to_mjd_utc_days().floor())
}

/// Query parameters of an element request for `body` on the day starting at `day`.
pub fn elements_query(body: Body, day: &Epoch) -> Vec<(&'static str, String)> {
    let next_day = Epoch::from_mjd_utc(day.to_mjd_utc_days() + 1.0);
    vec![
        ("format", "text".to_string()),
        ("COMMAND", format!("'{}'", body.horizons_id())),
        ("OBJ_DATA", "'NO'".to_string()),
        ("MAKE_EPHEM", "'YES'".to_string()),
        ("EPHEM_TYPE", "'ELEMENTS'".to_string()),
        ("CENTER", "'@sun'".to_string()),
        ("START_TIME", format!("'{}'", format_date(day))),
        ("STOP_TIME", format!("'{}'", format_date(&next_day))),
    ]
}

/// Return the part of a Horizons report between `$$SOE` and `$$EOE` (or the end of the text).
pub(crate) fn ephemeris_block<'a>(response: &'a str, body: Body) -> Result<&'a str, KepsimError> {
    let start = response
        .find(START_OF_EPHEMERIS)
        .ok_or_else(|| KepsimError::MissingEphemerisBlock(body.to_string()))?
        + START_OF_EPHEMERIS.len();
    let block = &response[start..];
    Ok(block
        .find(END_OF_EPHEMERIS)
        .map_or(block, |end| &block[..end]))
}

/// Parse the text answer of an element request.
///
/// Arguments
/// ---------
/// * `response`: the raw Horizons report.
/// * `body`: the requested body, used in error messages.
/// * `epoch`: the epoch attached to the parsed elements.
///
/// Return
/// ------
/// * The element set with the semi-major axis converted to AU.
/// * [`KepsimError::MissingEphemerisBlock`] when there is no `$$SOE` marker,
///   [`KepsimError::IncompleteElements`] when one of the six fields cannot be read.
pub fn parse_elements(
    response: &str,
    body: Body,
    epoch: Epoch,
) -> Result<OrbitalElementSet, KepsimError> {
    let block = ephemeris_block(response, body)?;

    let values: Vec<f64> = ELEMENT_REGEXES
        .iter()
        .filter_map(|re| re.captures(block)?.get(1)?.as_str().parse().ok())
        .collect();

    let [ec, inc, om, w, ma, a_km] = values[..] else {
        return Err(KepsimError::IncompleteElements {
            body: body.to_string(),
            found: values.len(),
            expected: ELEMENT_LABELS.len(),
        });
    };

    Ok(OrbitalElementSet::from_horizons_km(
        ec, a_km, inc, om, w, ma, epoch,
    ))
}
