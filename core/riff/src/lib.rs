pub mod error;
pub mod process;
pub mod reader;
pub mod types;

pub use error::{Result, RiffError};
pub use reader::parse;
pub use types::*;
