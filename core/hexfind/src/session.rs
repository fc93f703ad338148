//! Interactive find-next/find-previous state.
//!
//! The original widget kept the last query and cursor as hidden widget
//! state; here it is an explicit session object so the engine itself stays a
//! pure function of its arguments.

use crate::engine::{CancelToken, Direction, FindOutcome, find};
use crate::error::Result;
use crate::pattern::{CompiledPattern, FindQuery, compile};
use tracing::debug;
use utils::ByteSource;

#[derive(Debug, Default)]
pub struct FindSession {
    last_query: Option<FindQuery>,
    compiled: Option<CompiledPattern>,
    cursor: u64,
    cancel: CancelToken,
}

impl FindSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a query, recompiling only when the pattern text or mode
    /// changed since the last one.
    pub fn set_query(&mut self, query: FindQuery) -> Result<()> {
        let reuse = self
            .last_query
            .as_ref()
            .is_some_and(|q| q.pattern == query.pattern && q.mode == query.mode);
        if !reuse {
            self.compiled = Some(compile(&query.pattern, query.mode)?);
            debug!(pattern = %query.pattern, "compiled new find query");
        }
        self.last_query = Some(query);
        Ok(())
    }

    pub fn last_query(&self) -> Option<&FindQuery> {
        self.last_query.as_ref()
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Reposition the cursor, e.g. after a navigate-to-offset request.
    pub fn set_cursor(&mut self, offset: u64) {
        self.cursor = offset;
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn find_next<S: ByteSource + ?Sized>(&mut self, source: &S) -> FindOutcome {
        self.run(source, Direction::Forward)
    }

    pub fn find_previous<S: ByteSource + ?Sized>(&mut self, source: &S) -> FindOutcome {
        self.run(source, Direction::Backward)
    }

    fn run<S: ByteSource + ?Sized>(&mut self, source: &S, direction: Direction) -> FindOutcome {
        let (Some(query), Some(compiled)) = (&self.last_query, &self.compiled) else {
            return FindOutcome::NotFound;
        };
        let outcome = find(
            source,
            compiled,
            direction,
            self.cursor,
            query.case_sensitive,
            &self.cancel,
        );
        if let FindOutcome::Found(offset) = outcome {
            self.cursor = offset;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::FindMode;

    fn query(pattern: &str) -> FindQuery {
        FindQuery {
            pattern: pattern.to_string(),
            mode: FindMode::Text,
            case_sensitive: true,
        }
    }

    #[test]
    fn find_next_walks_successive_hits_then_not_found() {
        let source: &[u8] = b"ab..ab..";
        let mut session = FindSession::new();
        session.set_query(query("ab")).unwrap();

        // cursor starts at 0; the hit at 0 is skipped by design, matching
        // the original find-next behaviour of never re-reporting the cursor
        assert_eq!(session.find_next(source), FindOutcome::Found(4));
        assert_eq!(session.cursor(), 4);
        assert_eq!(session.find_next(source), FindOutcome::NotFound);
        assert_eq!(session.cursor(), 4);

        assert_eq!(session.find_previous(source), FindOutcome::Found(0));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn no_query_means_not_found() {
        let source: &[u8] = b"anything";
        let mut session = FindSession::new();
        assert_eq!(session.find_next(source), FindOutcome::NotFound);
    }

    #[test]
    fn recompiles_only_when_pattern_or_mode_changes() {
        let mut session = FindSession::new();
        session.set_query(query("41 42")).unwrap(); // text mode, fine

        // same pattern, hex mode now: must recompile (and still be valid)
        session
            .set_query(FindQuery {
                pattern: "41 42".to_string(),
                mode: FindMode::Hex,
                case_sensitive: true,
            })
            .unwrap();

        let source: &[u8] = &[0x00, 0x41, 0x42, 0x00];
        assert_eq!(session.find_next(source), FindOutcome::Found(1));

        // toggling only case sensitivity keeps the compiled pattern
        session
            .set_query(FindQuery {
                pattern: "41 42".to_string(),
                mode: FindMode::Hex,
                case_sensitive: false,
            })
            .unwrap();
        session.set_cursor(0);
        assert_eq!(session.find_next(source), FindOutcome::Found(1));
    }

    #[test]
    fn invalid_query_leaves_previous_state_untouched() {
        let source: &[u8] = &[0x00, 0x41, 0x42, 0x00];
        let mut session = FindSession::new();
        session
            .set_query(FindQuery {
                pattern: "4142".to_string(),
                mode: FindMode::Hex,
                case_sensitive: true,
            })
            .unwrap();
        assert_eq!(session.find_next(source), FindOutcome::Found(1));

        let err = session.set_query(FindQuery {
            pattern: "zz".to_string(),
            mode: FindMode::Hex,
            case_sensitive: true,
        });
        assert!(err.is_err());

        // prior compiled pattern still usable
        session.set_cursor(0);
        assert_eq!(session.find_next(source), FindOutcome::Found(1));
    }
}
