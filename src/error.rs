use thiserror::Error;

/// Rejected window length for a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidArgument {
    #[error("window of {0} seconds is outside 1..=300")]
    OutOfRange(i64),

    #[error("window of {0} seconds is not a whole number")]
    NotAnInteger(f64),

    #[error("cannot parse window length {0:?}")]
    Malformed(String),
}
