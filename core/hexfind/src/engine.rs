//! Byte-wise scan over a byte source.
//!
//! Matching is exact byte equality against the compiled pattern, with
//! optional per-byte ASCII case folding for text queries. Long scans check a
//! cooperative cancellation flag at coarse granularity.

use crate::pattern::CompiledPattern;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use utils::ByteSource;

/// Bytes scanned between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    /// Forward with a single wrap past end-of-source (interactive
    /// wrap-around find-next).
    All,
}

/// Terminal result of one search invocation. `NotFound` and `Cancelled` are
/// normal outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    Found(u64),
    NotFound,
    Cancelled,
}

/// Cloneable cancellation flag shared between a scanning call and its
/// requester. The flag is the only shared mutable state of a search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

fn fold(b: u8, case_sensitive: bool) -> u8 {
    if case_sensitive { b } else { b.to_ascii_lowercase() }
}

fn matches_at(haystack: &[u8], needle: &[u8], idx: usize, case_sensitive: bool) -> bool {
    match haystack.get(idx..) {
        Some(rest) if rest.len() >= needle.len() => rest
            .iter()
            .zip(needle)
            .all(|(&h, &n)| fold(h, case_sensitive) == fold(n, case_sensitive)),
        _ => false,
    }
}

/// Search for one match.
///
/// `Forward` scans strictly increasing offsets from `start_offset + 1`, so a
/// repeated find-next never re-reports the hit it started from; it stops at
/// end-of-source. `Backward` scans strictly decreasing offsets from
/// `start_offset - 1` down to 0. `All` behaves as Forward but wraps to
/// offset 0 once after reaching the end.
pub fn find<S: ByteSource + ?Sized>(
    source: &S,
    pattern: &CompiledPattern,
    direction: Direction,
    start_offset: u64,
    case_sensitive: bool,
    cancel: &CancelToken,
) -> FindOutcome {
    let needle = pattern.bytes();
    if needle.is_empty() || needle.len() as u64 > source.len() {
        return FindOutcome::NotFound;
    }
    let haystack = match source.read(0, source.len() as usize) {
        Ok(bytes) => bytes,
        Err(_) => return FindOutcome::NotFound,
    };

    let outcome = match direction {
        Direction::Forward => scan_forward(
            haystack,
            needle,
            start_offset.saturating_add(1),
            false,
            case_sensitive,
            cancel,
        ),
        Direction::All => scan_forward(
            haystack,
            needle,
            start_offset.saturating_add(1),
            true,
            case_sensitive,
            cancel,
        ),
        Direction::Backward => scan_backward(haystack, needle, start_offset, case_sensitive, cancel),
    };
    debug!(?direction, start_offset, ?outcome, "search finished");
    outcome
}

fn scan_forward(
    haystack: &[u8],
    needle: &[u8],
    from: u64,
    wrap_once: bool,
    case_sensitive: bool,
    cancel: &CancelToken,
) -> FindOutcome {
    let len = haystack.len() as u64;
    let mut i = from;
    let mut wrapped = false;
    let mut scanned = 0u64;

    loop {
        if i >= len {
            if wrap_once && !wrapped {
                wrapped = true;
                i = 0;
                continue;
            }
            return FindOutcome::NotFound;
        }
        if scanned % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return FindOutcome::Cancelled;
        }
        scanned += 1;
        if matches_at(haystack, needle, i as usize, case_sensitive) {
            return FindOutcome::Found(i);
        }
        i += 1;
    }
}

fn scan_backward(
    haystack: &[u8],
    needle: &[u8],
    start_offset: u64,
    case_sensitive: bool,
    cancel: &CancelToken,
) -> FindOutcome {
    if start_offset == 0 || haystack.is_empty() {
        return FindOutcome::NotFound;
    }
    // clamp a cursor past end-of-source to the last scannable offset
    let mut i = (start_offset - 1).min(haystack.len() as u64 - 1);
    let mut scanned = 0u64;

    loop {
        if scanned % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return FindOutcome::Cancelled;
        }
        scanned += 1;
        if matches_at(haystack, needle, i as usize, case_sensitive) {
            return FindOutcome::Found(i);
        }
        if i == 0 {
            return FindOutcome::NotFound;
        }
        i -= 1;
    }
}

/// Lazy iterator over every non-overlapping match in ascending offset
/// order. Cancellation ends the iteration early.
pub struct Matches<'a> {
    haystack: &'a [u8],
    needle: Vec<u8>,
    pos: u64,
    case_sensitive: bool,
    cancel: CancelToken,
}

impl Iterator for Matches<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.needle.is_empty() {
            return None;
        }
        let len = self.haystack.len() as u64;
        let mut scanned = 0u64;
        while self.pos < len {
            if scanned % CANCEL_CHECK_INTERVAL == 0 && self.cancel.is_cancelled() {
                self.pos = len;
                return None;
            }
            scanned += 1;
            if matches_at(
                self.haystack,
                &self.needle,
                self.pos as usize,
                self.case_sensitive,
            ) {
                let hit = self.pos;
                self.pos += self.needle.len() as u64;
                return Some(hit);
            }
            self.pos += 1;
        }
        None
    }
}

/// Enumerate every non-overlapping match across the whole source.
pub fn find_all<'a, S: ByteSource + ?Sized>(
    source: &'a S,
    pattern: &CompiledPattern,
    case_sensitive: bool,
    cancel: &CancelToken,
) -> Matches<'a> {
    let haystack = source.read(0, source.len() as usize).unwrap_or(&[]);
    Matches {
        haystack,
        needle: pattern.bytes().to_vec(),
        pos: 0,
        case_sensitive,
        cancel: cancel.clone(),
    }
}
