use thiserror::Error;

/// Why an inbound record was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field `{0}` is not a finite number")]
    NonFinite(&'static str),
    #[error("field `{0}` must not be negative")]
    Negative(&'static str),
    #[error("opacity {0} is outside 0..=100")]
    OpacityOutOfRange(f64),
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}
