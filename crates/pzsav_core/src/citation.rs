//! Citation extraction from the residual tail of a unit record.
//!
//! The tail stores short texts as (character, 0x00) pairs with 0x0000 as
//! separator, but the region's starting parity is unknown: depending on what
//! hero parsing consumed before it, the character bytes may sit on even or
//! odd offsets. Both alignments are tried and the one that yields more
//! decoded characters wins.

fn is_printable(b: u8) -> bool {
    (0x20..0x7f).contains(&b)
}

fn parse_at_parity(buf: &[u8], start: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut i = start;
    let n = buf.len();
    // only complete pairs are read
    while i + 1 < n {
        let (lo, hi) = (buf[i], buf[i + 1]);
        i += 2;
        if lo == 0x00 && hi == 0x00 {
            let s = cur.trim().to_string();
            if !s.is_empty() {
                out.push(s);
            }
            cur.clear();
            // collapse repeated 00 00 separators
            while i + 1 < n && buf[i] == 0x00 && buf[i + 1] == 0x00 {
                i += 2;
            }
            continue;
        }
        if hi == 0x00 && is_printable(lo) {
            cur.push(lo as char);
        }
        // anything else is padding or noise
    }
    let s = cur.trim().to_string();
    if !s.is_empty() {
        out.push(s);
    }
    out
}

/// Splits a residual tail into citation strings, choosing the byte parity
/// that decodes more text. Empty strings after trimming are discarded.
pub fn split_citations(tail: &[u8]) -> Vec<String> {
    let even = parse_at_parity(tail, 0);
    let odd = parse_at_parity(tail, 1);
    let score = |v: &[String]| v.iter().map(String::len).sum::<usize>();
    if score(&even) >= score(&odd) { even } else { odd }
}
