pub mod engine;
pub mod error;
pub mod pattern;
pub mod session;

pub use engine::{CancelToken, Direction, FindOutcome, Matches, find, find_all};
pub use error::{FindError, Result};
pub use pattern::{CompiledPattern, FindMode, FindQuery, FloatWidth, IntWidth, compile};
pub use session::FindSession;
