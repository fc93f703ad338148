use crate::types::FourCc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid leading tag '{0}', expected RIFF or RIFX")]
    InvalidFormat(FourCc),
    #[error("{0} is not a valid RIFF file")]
    NotRiff(String),
    #[error(transparent)]
    Source(#[from] utils::SourceError),
}

pub type Result<T> = std::result::Result<T, RiffError>;
