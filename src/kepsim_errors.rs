use thiserror::Error;

#[derive(Error, Debug)]
pub enum KepsimError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("HTTP ureq error: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV writer error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Time conversion error: {0}")]
    TimeError(#[from] hifitime::HifitimeError),

    #[error("No $$SOE ephemeris block in the Horizons response for {0}")]
    MissingEphemerisBlock(String),

    #[error("Could only parse {found} of {expected} orbital elements for {body}")]
    IncompleteElements {
        body: String,
        found: usize,
        expected: usize,
    },

    #[error("Horizons API error: {0}")]
    HorizonsApiError(String),

    #[error("Missing {component} vector component in the Horizons response for {body}")]
    MissingVectorComponent { body: String, component: String },
}

impl PartialEq for KepsimError {
    fn eq(&self, other: &Self) -> bool {
        use KepsimError::*;
        match (self, other) {
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,

            // not comparable: same variant is enough
            (HttpError(_), HttpError(_)) => true,
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (TimeError(_), TimeError(_)) => true,

            (MissingEphemerisBlock(a), MissingEphemerisBlock(b)) => a == b,
            (HorizonsApiError(a), HorizonsApiError(b)) => a == b,
            (
                IncompleteElements {
                    body: b1,
                    found: f1,
                    expected: e1,
                },
                IncompleteElements {
                    body: b2,
                    found: f2,
                    expected: e2,
                },
            ) => b1 == b2 && f1 == f2 && e1 == e2,
            (
                MissingVectorComponent {
                    body: b1,
                    component: c1,
                },
                MissingVectorComponent {
                    body: b2,
                    component: c2,
                },
            ) => b1 == b2 && c1 == c2,

            _ => false,
        }
    }
}
