use std::error::Error;
use std::fmt;

/// Failure while parsing a unit record out of the raw buffer.
///
/// Any of these aborts the current record; the stream scanner converts the
/// first one into a [`crate::scanner::ScanStop`] and keeps what was already
/// parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The buffer ended in the middle of a field.
    TruncatedInput { offset: usize },
    /// A required wide C-string contained a byte outside printable ASCII/tab.
    InvalidEncoding { offset: usize },
    /// No qualifying sentinel run for boundary 1, 2 or 3 within its window.
    MissingBoundary(u8),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::TruncatedInput { offset } => {
                write!(f, "buffer truncated at offset 0x{offset:x}")
            }
            ScanError::InvalidEncoding { offset } => {
                write!(f, "invalid character in wide string at offset 0x{offset:x}")
            }
            ScanError::MissingBoundary(n) => {
                write!(f, "sentinel run for boundary #{n} not found within window")
            }
        }
    }
}

impl Error for ScanError {}

/// Failure while planning or applying a batch of stat updates.
///
/// Always surfaced to the caller; a batch that produces any of these writes
/// no bytes at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Field name not present in the relevant static field table.
    UnknownField(String),
    /// Neither the recorded offset nor the fallback search located the field.
    OffsetUnresolved(String),
    /// New value does not fit the field's bit width.
    ValueOutOfRange { field: String, value: u32, max: u32 },
    /// Resolved offset plus field width would exceed the buffer.
    WriteOutOfBounds { field: String, offset: usize },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::UnknownField(name) => write!(f, "unknown stat field: {name}"),
            PatchError::OffsetUnresolved(name) => {
                write!(f, "could not resolve offset for field {name}")
            }
            PatchError::ValueOutOfRange { field, value, max } => {
                write!(f, "value {value} out of range for {field} (max {max})")
            }
            PatchError::WriteOutOfBounds { field, offset } => {
                write!(f, "write for {field} at 0x{offset:x} exceeds buffer")
            }
        }
    }
}

impl Error for PatchError {}
