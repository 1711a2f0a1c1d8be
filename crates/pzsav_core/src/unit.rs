//! One unit record: the step-by-step walk from a start offset to the next
//! record.
//!
//! A record is `name | FF-run | stats+history | FF-run | hero count |
//! heroes | citations | FF-run | gap`. Nothing is length-prefixed; every
//! boundary is a sentinel run found greedily within a byte-bounded window.

use serde::Serialize;

use crate::error::ScanError;
use crate::hero::{Hero, parse_hero_region};
use crate::sentinel::{MAX_RUN, MIN_RUN, find_run};
use crate::text::{DEFAULT_SKIP_LIMIT, read_wide_cstr, skip_leading_non_printable};
use crate::citation::split_citations;

/// Fixed minimum gap between a record's closing sentinel run and the next
/// record's first byte.
pub const INTER_RECORD_GAP: usize = 4;

/// Windows and thresholds for a scan pass. All searches are bounded purely
/// by byte counts, so a scan always terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    /// Window between the name terminator and boundary 1.
    pub after_name_window: usize,
    /// Window between the stats head and boundary 2 (max history size).
    pub history_window: usize,
    /// Window between hero parsing's end and boundary 3.
    pub tail_window: usize,
    /// Per-hero lookahead between image name and the hero's sentinel run.
    pub hero_window: usize,
    /// Accepted sentinel run length range.
    pub min_run: usize,
    pub max_run: Option<usize>,
    /// Leading bytes of the post-boundary-1 block read as u16 stats.
    pub stats_head_len: usize,
    /// Lookahead for skipping non-printable bytes before the name.
    pub name_skip_limit: usize,
    /// Upper bound on records per scan pass.
    pub max_units: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            after_name_window: 4096,
            history_window: 256_000,
            tail_window: 512_000,
            hero_window: 64_000,
            min_run: MIN_RUN,
            max_run: Some(MAX_RUN),
            stats_head_len: 132,
            name_skip_limit: DEFAULT_SKIP_LIMIT,
            max_units: 100,
        }
    }
}

/// One parsed unit record. Created once per scan pass; only the underlying
/// buffer bytes of numeric fields ever change afterwards (via the patcher),
/// so recorded offsets stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    pub name: String,
    /// Leading 16-bit values of the block after boundary 1.
    pub stats: Vec<u16>,
    /// Absolute offset of `stats[0]`.
    pub stats_offset: usize,
    /// Raw bytes between boundary 1 and boundary 2; decoded lazily for
    /// display. Deliberately not split on embedded nulls.
    #[serde(skip_serializing)]
    pub history: Vec<u8>,
    pub heroes: Vec<Hero>,
    pub citations: Vec<String>,
    /// Raw bytes between hero parsing's end and boundary 3, kept for
    /// residual parsing.
    #[serde(skip_serializing)]
    pub raw_tail_bytes: Vec<u8>,
    pub start_offset: usize,
    /// One past the record, inter-record gap included; the next record's
    /// scan start.
    pub end_offset: usize,
    /// 1-based position within a scan pass (0 until assigned).
    pub index: usize,
}

/// Parses one unit record at `off`. Returns the record and the offset where
/// the next record starts. Errors here are fatal for the current record and
/// stop the stream scan.
pub fn parse_unit(
    data: &[u8],
    off: usize,
    params: &ScanParams,
) -> Result<(UnitRecord, usize), ScanError> {
    // 1) Name: make sure we start on a readable character.
    let first_readable = skip_leading_non_printable(data, off, params.name_skip_limit);
    let (name, name_end) = read_wide_cstr(data, first_readable)?;

    // 2) Boundary 1, right after the name.
    let run1 = find_run(
        data,
        name_end,
        params.after_name_window,
        params.min_run,
        params.max_run,
    )
    .ok_or(ScanError::MissingBoundary(1))?;

    // 3) Stats head: the byte after the run starts the numeric block.
    let stats_offset = run1.end();
    let head_end = data.len().min(stats_offset + params.stats_head_len);
    let head = &data[stats_offset..head_end];
    let stats: Vec<u16> = head
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    // 4) Boundary 2: everything between the stats head and it is history.
    let run2 = find_run(
        data,
        stats_offset,
        params.history_window,
        params.min_run,
        params.max_run,
    )
    .ok_or(ScanError::MissingBoundary(2))?;
    let history = data[stats_offset..run2.pos].to_vec();

    // 5) Hero count byte, then up to the capped number of hero blocks.
    let region = parse_hero_region(
        data,
        run2.end(),
        params.min_run,
        params.max_run,
        params.hero_window,
    );

    // 6) Boundary 3, closing the record.
    let run3 = find_run(
        data,
        region.end,
        params.tail_window,
        params.min_run,
        params.max_run,
    )
    .ok_or(ScanError::MissingBoundary(3))?;

    // 7) Residual tail between heroes and boundary 3 holds the citations.
    let raw_tail_bytes = data[region.end..run3.pos].to_vec();
    let citations = split_citations(&raw_tail_bytes);

    let end_offset = run3.end() + INTER_RECORD_GAP;
    let unit = UnitRecord {
        name,
        stats,
        stats_offset,
        history,
        heroes: region.heroes,
        citations,
        raw_tail_bytes,
        start_offset: off,
        end_offset,
        index: 0,
    };
    Ok((unit, end_offset))
}

impl UnitRecord {
    /// Stat value by index into the 16-bit head block, if read.
    pub fn stat(&self, index: usize) -> Option<u16> {
        self.stats.get(index).copied()
    }

    pub fn hero(&self, index_1based: usize) -> Option<&Hero> {
        index_1based.checked_sub(1).and_then(|i| self.heroes.get(i))
    }
}
