//! Text decoding for the save format's two string encodings.
//!
//! Strings appear either as plain 8-bit ASCII ("narrow") or as 2-byte cells
//! holding ASCII in the low byte with a zero high byte ("wide"). Wide
//! decoding keeps a low byte only when its high byte is zero, which filters
//! out the ghost characters produced by misaligned or foreign data instead
//! of passing them through.

use crate::error::ScanError;

/// How to interpret a byte range as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    Narrow,
    Wide,
    /// Measure the fraction of byte pairs with a zero high byte; above
    /// [`AUTO_WIDE_THRESHOLD`] decode wide, otherwise narrow.
    #[default]
    Auto,
}

/// Zero-high-byte pair fraction above which auto mode picks wide decoding.
pub const AUTO_WIDE_THRESHOLD: f64 = 0.6;

/// Bounded lookahead for [`skip_leading_non_printable`].
pub const DEFAULT_SKIP_LIMIT: usize = 256;

fn is_printable(b: u8) -> bool {
    (0x20..0x7f).contains(&b)
}

/// Decodes `bytes` according to `mode`, dropping undecodable bytes.
pub fn decode_text(bytes: &[u8], mode: DecodeMode) -> String {
    match mode {
        DecodeMode::Narrow => decode_narrow(bytes),
        DecodeMode::Wide => decode_wide(bytes),
        DecodeMode::Auto => {
            if zero_high_ratio(bytes) > AUTO_WIDE_THRESHOLD {
                decode_wide(bytes)
            } else {
                decode_narrow(bytes)
            }
        }
    }
}

fn decode_narrow(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|&&b| b < 0x80)
        .map(|&b| b as char)
        .collect()
}

fn decode_wide(bytes: &[u8]) -> String {
    let even = bytes.len() / 2 * 2;
    let mut out = String::new();
    for pair in bytes[..even].chunks_exact(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi == 0x00 && is_printable(lo) {
            out.push(lo as char);
        }
    }
    out
}

fn zero_high_ratio(bytes: &[u8]) -> f64 {
    let even = bytes.len() / 2 * 2;
    if even == 0 {
        return 0.0;
    }
    let zero_high = bytes[..even]
        .chunks_exact(2)
        .filter(|pair| pair[1] == 0x00)
        .count();
    zero_high as f64 / (even / 2) as f64
}

/// Reads a null-pair-terminated wide C-string starting at `off`.
///
/// Every character cell must be (printable ASCII or tab, 0x00); the first
/// all-zero pair terminates the string. Anything else is malformed data,
/// not a terminator, and fails fast with `InvalidEncoding`. Returns the
/// decoded text and the offset just past the terminator.
pub fn read_wide_cstr(data: &[u8], off: usize) -> Result<(String, usize), ScanError> {
    let mut i = off;
    let mut out = String::new();
    loop {
        if i + 1 >= data.len() {
            return Err(ScanError::TruncatedInput { offset: i });
        }
        let (lo, hi) = (data[i], data[i + 1]);
        i += 2;
        if lo == 0x00 && hi == 0x00 {
            return Ok((out, i));
        }
        if hi != 0x00 || !(is_printable(lo) || lo == b'\t') {
            return Err(ScanError::InvalidEncoding { offset: i - 2 });
        }
        out.push(lo as char);
    }
}

/// Advances past leading non-printable bytes, looking at most `limit` bytes
/// ahead so a bad offset never walks half the file.
pub fn skip_leading_non_printable(data: &[u8], start: usize, limit: usize) -> usize {
    let end = data.len().min(start.saturating_add(limit));
    let mut i = start;
    while i < end && !is_printable(data[i]) {
        i += 1;
    }
    i
}

/// Readable preview of a history blob: skip the binary head, auto-decode
/// the rest, collapse line breaks, truncate to `limit` characters.
pub fn history_preview(history: &[u8], skip: usize, limit: usize) -> String {
    let tail = history.get(skip..).unwrap_or(&[]);
    let s = decode_text(tail, DecodeMode::Auto)
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string();
    s.chars().take(limit).collect()
}
