use derive_more::Display;

/// Domain errors for malformed input and illegal lifecycle moves.
/// Expected negative outcomes (expired token, out-of-range location,
/// late arrival) are structured results, never errors.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum CoreError {
    #[display(fmt = "validation error: {}", _0)]
    Validation(String),

    #[display(fmt = "invalid transition: {}", _0)]
    InvalidTransition(String),
}

impl std::error::Error for CoreError {}
