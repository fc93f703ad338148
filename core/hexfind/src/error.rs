use thiserror::Error;

/// Query compilation failures. `NotFound` and `Cancelled` are ordinary
/// search outcomes, not errors; see [`crate::engine::FindOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindError {
    #[error("Hex pattern '{0}' is not valid")]
    InvalidHexPattern(String),
    #[error("integer pattern '{0}' is not valid")]
    InvalidInt(String),
    #[error("float pattern '{0}' is not valid")]
    InvalidFloat(String),
}

pub type Result<T> = std::result::Result<T, FindError>;
