//! Heuristic scanner and in-place stats patcher for Panzer Corps save
//! buffers.
//!
//! The format is undocumented; nothing here parses a declared structure.
//! Records are recovered by walking sentinel-delimited segments and checking
//! that what falls between them has the expected shape. See [`scanner`] for
//! the stream walk and [`document`] for the editing surface.

pub mod citation;
pub mod document;
pub mod error;
pub mod fields;
pub mod hero;
pub mod pattern;
pub mod patcher;
pub mod probe;
pub mod scanner;
pub mod sentinel;
pub mod text;
pub mod unit;

pub use document::SaveDocument;
pub use error::{PatchError, ScanError};
pub use hero::{Hero, MAX_HEROES};
pub use patcher::PatchChange;
pub use probe::{Compression, ProbeReport};
pub use scanner::{ScanOutcome, ScanStop};
pub use sentinel::FfRun;
pub use text::DecodeMode;
pub use unit::{ScanParams, UnitRecord};
