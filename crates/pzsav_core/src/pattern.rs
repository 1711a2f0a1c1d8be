//! Raw byte-pattern search over the save buffer.
//!
//! Backs the `find` surface and the patcher's image-anchored fallback. Text
//! needles are widened to the (char, 0x00) on-disk layout before searching.

use memchr::memmem;

/// Expands an ASCII needle into its wide on-disk form.
pub fn wide_pattern(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.bytes() {
        out.push(ch);
        out.push(0x00);
    }
    out
}

/// First occurrence of `needle` in `haystack[start..]`, absolute offset.
pub fn find_first(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || start >= haystack.len() {
        return None;
    }
    memmem::find(&haystack[start..], needle).map(|rel| start + rel)
}

/// All occurrences, overlapping matches included, capped at `limit`.
pub fn find_all(haystack: &[u8], needle: &[u8], limit: usize) -> Vec<usize> {
    let mut out = Vec::new();
    if needle.is_empty() {
        return out;
    }
    let mut pos = 0;
    while out.len() < limit {
        match find_first(haystack, needle, pos) {
            Some(at) => {
                out.push(at);
                pos = at + 1;
            }
            None => break,
        }
    }
    out
}
