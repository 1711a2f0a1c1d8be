//! Stream scanning: repeated record parsing until the shape breaks.
//!
//! The unit stream is assumed contiguous and homogeneous. The scan stops at
//! the first position that does not parse and returns everything collected
//! so far together with the reason. Partial success is the steady state
//! here, not an error, because the format's end-of-stream shape is
//! indistinguishable from corruption. No resynchronization is attempted.

use crate::error::ScanError;
use crate::unit::{ScanParams, UnitRecord, parse_unit};

/// Where and why a scan pass stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStop {
    pub offset: usize,
    pub error: ScanError,
}

/// Result of a scan pass: the ordered records plus, when the pass ended on
/// an unparsable position rather than buffer exhaustion or the record cap,
/// the explicit last failure reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub units: Vec<UnitRecord>,
    pub stop: Option<ScanStop>,
}

/// Scans forward from `start`, assigning each record its 1-based index.
/// `end_offset` of record k is `start_offset` of record k+1.
pub fn scan_units(data: &[u8], start: usize, params: &ScanParams) -> ScanOutcome {
    let mut units = Vec::new();
    let mut stop = None;
    let mut off = start;

    for index in 1..=params.max_units {
        if off >= data.len() {
            break;
        }
        match parse_unit(data, off, params) {
            Ok((mut unit, next)) => {
                unit.index = index;
                units.push(unit);
                off = next;
            }
            Err(error) => {
                stop = Some(ScanStop { offset: off, error });
                break;
            }
        }
    }

    ScanOutcome { units, stop }
}

impl ScanOutcome {
    /// Exact-name lookup; retries with a trimmed needle when the exact form
    /// has suspicious surrounding whitespace.
    pub fn find_by_name(&self, name: &str) -> Option<&UnitRecord> {
        self.units
            .iter()
            .find(|u| u.name == name)
            .or_else(|| {
                let trimmed = name.trim();
                if trimmed == name {
                    None
                } else {
                    self.units.iter().find(|u| u.name == trimmed)
                }
            })
    }

    /// 1-based index lookup, matching the indices assigned during the pass.
    pub fn by_index(&self, index_1based: usize) -> Option<&UnitRecord> {
        index_1based
            .checked_sub(1)
            .and_then(|i| self.units.get(i))
    }
}
