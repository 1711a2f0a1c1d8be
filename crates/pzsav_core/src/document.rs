//! An open save file: the mutable buffer, its pre-edit snapshot, and the
//! editing operations composed from the scanner and the patcher.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PatchError;
use crate::patcher::{
    PatchChange, apply_changes, plan_hero_patch, plan_unit_patch, resolve_hero_stats_base,
};
use crate::probe::unwrap_container;
use crate::scanner::{ScanOutcome, scan_units};
use crate::unit::{ScanParams, UnitRecord};

/// An in-memory save file under edit.
///
/// `buffer` takes every patch; `original` stays as loaded so that
/// pattern-based offset resolution always searches the bytes the scan pass
/// actually saw, no matter how many patches were applied in between.
#[derive(Debug, Clone)]
pub struct SaveDocument {
    buffer: Vec<u8>,
    original: Vec<u8>,
    params: ScanParams,
}

impl SaveDocument {
    /// Wraps an already-loaded byte buffer. Compressed containers are
    /// inflated so the scanner sees the raw record stream.
    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        let buffer = unwrap_container(data)?;
        Ok(Self {
            original: buffer.clone(),
            buffer,
            params: ScanParams::default(),
        })
    }

    pub fn open_path(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn with_params(mut self, params: ScanParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// The bytes as they were when the document was opened.
    pub fn original_bytes(&self) -> &[u8] {
        &self.original
    }

    pub fn is_modified(&self) -> bool {
        self.buffer != self.original
    }

    /// Scans the live buffer from `start`. Patches only ever rewrite numeric
    /// stat bytes in place, so record boundaries from an earlier pass stay
    /// valid and a re-scan finds the same records.
    pub fn scan(&self, start: usize) -> ScanOutcome {
        scan_units(&self.buffer, start, &self.params)
    }

    /// Applies a batch of unit-level stat updates. All-or-nothing: any
    /// invalid update leaves the buffer untouched.
    pub fn patch_unit(
        &mut self,
        unit: &UnitRecord,
        updates: &[(String, u32)],
    ) -> Result<Vec<PatchChange>, PatchError> {
        let changes = plan_unit_patch(&self.buffer, unit, updates)?;
        apply_changes(&mut self.buffer, &changes);
        Ok(changes)
    }

    /// Applies a batch of hero stat updates. The hero's stat block is
    /// resolved against the pre-edit snapshot when the scan pass recorded no
    /// offset for it.
    pub fn patch_hero(
        &mut self,
        unit: &UnitRecord,
        hero_index_1based: usize,
        updates: &[(String, u32)],
    ) -> Result<Vec<PatchChange>, PatchError> {
        let hero = unit
            .hero(hero_index_1based)
            .ok_or_else(|| PatchError::OffsetUnresolved(format!("hero #{hero_index_1based}")))?;
        let base = resolve_hero_stats_base(&self.original, unit, hero, &self.params)?;
        let changes = plan_hero_patch(&self.buffer, base, updates)?;
        apply_changes(&mut self.buffer, &changes);
        Ok(changes)
    }

    /// Writes the live buffer to `path`, first copying the current file at
    /// that path to `<path>.bak`. Returns the backup path when one was made
    /// (none when `path` did not exist yet).
    pub fn write_with_backup(&self, path: &Path) -> io::Result<Option<PathBuf>> {
        let backup = if path.exists() {
            let mut name = path.as_os_str().to_owned();
            name.push(".bak");
            let backup_path = PathBuf::from(name);
            fs::copy(path, &backup_path)?;
            Some(backup_path)
        } else {
            None
        };
        fs::write(path, &self.buffer)?;
        Ok(backup)
    }
}
