//! Sentinel-run detection.
//!
//! Record and segment boundaries in the save format are not length-prefixed;
//! they are marked by contiguous runs of 0xFF. A run only counts as a
//! boundary when its length falls inside a configured range: shorter runs
//! are ordinary data, longer ones are padding/filler and are skipped whole.
//! Every higher-level parser trusts the first qualifying match and never
//! backtracks.

use memchr::memchr;

/// The byte value used as segment delimiter.
pub const SENTINEL: u8 = 0xFF;

/// Default accepted run-length range.
pub const MIN_RUN: usize = 4;
pub const MAX_RUN: usize = 16;

/// A located sentinel run: start position and length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfRun {
    pub pos: usize,
    pub len: usize,
}

impl FfRun {
    /// First byte after the run.
    pub fn end(&self) -> usize {
        self.pos + self.len
    }
}

/// Finds the first maximal run of 0xFF starting at or after `start`, bounded
/// to `start + window` bytes. A run qualifies when its length is
/// `>= min_run` and, if `max_run` is given, `<= max_run`; an over-long run
/// is rejected whole and the scan resumes after it.
pub fn find_run(
    data: &[u8],
    start: usize,
    window: usize,
    min_run: usize,
    max_run: Option<usize>,
) -> Option<FfRun> {
    let end = data.len().min(start.saturating_add(window));
    let mut i = start;
    while i < end {
        i = match memchr(SENTINEL, &data[i..end]) {
            Some(rel) => i + rel,
            None => return None,
        };
        let mut j = i;
        while j < end && data[j] == SENTINEL {
            j += 1;
        }
        let run_len = j - i;
        if run_len >= min_run && max_run.is_none_or(|max| run_len <= max) {
            return Some(FfRun { pos: i, len: run_len });
        }
        i = j;
    }
    None
}

/// Enumerates qualifying runs inside the window, up to `limit` entries.
/// Used by the probe surface only.
pub fn list_runs(
    data: &[u8],
    start: usize,
    window: usize,
    min_run: usize,
    max_run: Option<usize>,
    limit: usize,
) -> Vec<FfRun> {
    let end = data.len().min(start.saturating_add(window));
    let mut out = Vec::new();
    let mut i = start;
    while i < end && out.len() < limit {
        match find_run(data, i, end - i, min_run, max_run) {
            Some(run) => {
                i = run.end();
                out.push(run);
            }
            None => break,
        }
    }
    out
}
