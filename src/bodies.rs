use std::{fmt, str::FromStr};

use crate::kepsim_errors::KepsimError;

/// Solar-system bodies known to the simulator.
///
/// Each body maps to the command id understood by JPL Horizons (`COMMAND='<id>'`) and to the
/// display name used in CSV headers.
///
/// Conversions
/// -----------
/// * [`Body::horizons_id`] gives the Horizons command id.
/// * [`std::str::FromStr`] accepts the display name, case-insensitively, or the Horizons id.
///
/// Examples
/// --------
/// ```rust
/// use kepsim::bodies::Body;
///
/// let mars: Body = "mars".parse().unwrap();
/// assert_eq!(mars, Body::Mars);
/// assert_eq!(mars.horizons_id(), "499");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Bodies propagated by the Keplerian simulation, in CSV column order.
pub const SIMULATED_BODIES: [Body; 9] = [
    Body::Mercury,
    Body::Venus,
    Body::Earth,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// Bodies looked up by the geocentric longitude logger, in CSV column order.
pub const LOGGED_BODIES: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

const ALL_BODIES: [Body; 11] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Earth,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

impl Body {
    /// Command id of the body in JPL Horizons.
    pub fn horizons_id(&self) -> &'static str {
        match self {
            Body::Sun => "10",
            Body::Moon => "301",
            Body::Mercury => "199",
            Body::Venus => "299",
            Body::Earth => "399",
            Body::Mars => "499",
            Body::Jupiter => "599",
            Body::Saturn => "699",
            Body::Uranus => "799",
            Body::Neptune => "899",
            Body::Pluto => "999",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = KepsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ALL_BODIES
            .iter()
            .find(|b| b.name().eq_ignore_ascii_case(s) || b.horizons_id() == s)
            .copied()
            .ok_or_else(|| KepsimError::UnknownBody(s.to_string()))
    }
}

#[cfg(test)]
mod bodies_test {
    use super::*;

    #[test]
    fn test_horizons_ids() {
        let ids: Vec<&str> = SIMULATED_BODIES.iter().map(|b| b.horizons_id()).collect();
        assert_eq!(
            ids,
            vec!["199", "299", "399", "499", "599", "699", "799", "899", "999"]
        );
        assert_eq!(Body::Sun.horizons_id(), "10");
        assert_eq!(Body::Moon.horizons_id(), "301");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!("Jupiter".parse::<Body>().unwrap(), Body::Jupiter);
        assert_eq!(" PLUTO ".parse::<Body>().unwrap(), Body::Pluto);
        assert_eq!("301".parse::<Body>().unwrap(), Body::Moon);
        assert_eq!(
            "Vulcan".parse::<Body>(),
            Err(KepsimError::UnknownBody("Vulcan".into()))
        );
    }

    #[test]
    fn test_logger_excludes_earth() {
        assert!(!LOGGED_BODIES.contains(&Body::Earth));
        assert_eq!(Body::Earth.to_string(), "Earth");
    }
}
