//! Format probing: compression sniffing and single-offset parse attempts.
//!
//! Save files from different game builds arrive plain, gzip- or
//! zlib-wrapped; the scanner only ever sees the inflated bytes. The probe
//! report exists for working against an undocumented layout by hand: point
//! it at an offset and see what each parse step makes of the bytes there.

use std::io::{self, Read};

use flate2::read::{GzDecoder, ZlibDecoder};

use crate::error::ScanError;
use crate::sentinel::{FfRun, list_runs};
use crate::text::{read_wide_cstr, skip_leading_non_printable};
use crate::unit::{ScanParams, UnitRecord, parse_unit};

/// Container detected from a buffer's magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
    Zlib,
}

/// Sniffs the container from the first two bytes.
pub fn sniff_compression(data: &[u8]) -> Compression {
    match data {
        [0x1f, 0x8b, ..] => Compression::Gzip,
        [0x78, 0x01 | 0x9c | 0xda, ..] => Compression::Zlib,
        _ => Compression::Plain,
    }
}

/// Returns the raw record stream: inflates wrapped buffers, passes plain
/// ones through unchanged.
pub fn unwrap_container(data: &[u8]) -> io::Result<Vec<u8>> {
    match sniff_compression(data) {
        Compression::Plain => Ok(data.to_vec()),
        Compression::Gzip => {
            let mut out = Vec::new();
            GzDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
        Compression::Zlib => {
            let mut out = Vec::new();
            ZlibDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
    }
}

/// What the parse steps see at one candidate offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub offset: usize,
    /// Where the leading-junk skip lands.
    pub first_readable: usize,
    /// The wide C-string at `first_readable`, when one is there.
    pub name: Option<String>,
    pub name_error: Option<ScanError>,
    /// Qualifying sentinel runs ahead of the offset.
    pub runs: Vec<FfRun>,
    /// The full record, when the offset parses as one.
    pub unit: Option<UnitRecord>,
    pub unit_error: Option<ScanError>,
}

/// Runs each parse step independently at `offset` and reports every result,
/// including the failures a stream scan would stop on.
pub fn probe_offset(data: &[u8], offset: usize, params: &ScanParams) -> ProbeReport {
    let first_readable = skip_leading_non_printable(data, offset, params.name_skip_limit);
    let (name, name_error) = match read_wide_cstr(data, first_readable) {
        Ok((s, _)) => (Some(s), None),
        Err(e) => (None, Some(e)),
    };
    let runs = list_runs(
        data,
        offset,
        params.after_name_window,
        params.min_run,
        params.max_run,
        8,
    );
    let (unit, unit_error) = match parse_unit(data, offset, params) {
        Ok((u, _)) => (Some(u), None),
        Err(e) => (None, Some(e)),
    };
    ProbeReport {
        offset,
        first_readable,
        name,
        name_error,
        runs,
        unit,
        unit_error,
    }
}
