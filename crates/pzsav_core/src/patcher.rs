//! In-place stat patching.
//!
//! Patching is a two-phase batch: every requested update is first resolved
//! to a concrete byte offset and bounds-checked against the live buffer, and
//! only when the whole batch validates are any bytes written. A failing
//! update therefore never leaves the buffer half-patched.

use crate::error::PatchError;
use crate::fields::{FieldSpec, FieldWidth, hero_field, unit_field};
use crate::hero::{HERO_STAT_COUNT, Hero};
use crate::pattern::{find_first, wide_pattern};
use crate::sentinel::find_run;
use crate::unit::{ScanParams, UnitRecord};

/// One resolved, validated write. `old` is the value currently in the
/// buffer at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchChange {
    pub field: String,
    pub offset: usize,
    pub width: FieldWidth,
    pub old: u32,
    pub new: u32,
}

fn read_value(buffer: &[u8], offset: usize, width: FieldWidth) -> u32 {
    match width {
        FieldWidth::U16 => {
            u16::from_le_bytes([buffer[offset], buffer[offset + 1]]) as u32
        }
        FieldWidth::U32 => u32::from_le_bytes([
            buffer[offset],
            buffer[offset + 1],
            buffer[offset + 2],
            buffer[offset + 3],
        ]),
    }
}

fn validate_one(
    buffer: &[u8],
    base: usize,
    spec: &FieldSpec,
    value: u32,
) -> Result<Option<PatchChange>, PatchError> {
    if value > spec.width.max_value() {
        return Err(PatchError::ValueOutOfRange {
            field: spec.name.to_string(),
            value,
            max: spec.width.max_value(),
        });
    }
    let offset = base + spec.index * spec.width.bytes();
    if offset + spec.width.bytes() > buffer.len() {
        return Err(PatchError::WriteOutOfBounds {
            field: spec.name.to_string(),
            offset,
        });
    }
    let old = read_value(buffer, offset, spec.width);
    if old == value {
        // nothing to write
        return Ok(None);
    }
    Ok(Some(PatchChange {
        field: spec.name.to_string(),
        offset,
        width: spec.width,
        old,
        new: value,
    }))
}

/// Plans a batch of unit-level stat updates. `updates` pairs field names
/// from the unit table with new values. Updates whose value already matches
/// the buffer are dropped from the plan.
pub fn plan_unit_patch(
    buffer: &[u8],
    unit: &UnitRecord,
    updates: &[(String, u32)],
) -> Result<Vec<PatchChange>, PatchError> {
    let mut changes = Vec::new();
    for (name, value) in updates {
        let spec = unit_field(name).ok_or_else(|| PatchError::UnknownField(name.clone()))?;
        if let Some(change) = validate_one(buffer, unit.stats_offset, spec, *value)? {
            changes.push(change);
        }
    }
    Ok(changes)
}

/// Locates a hero's stat block in `snapshot` when the scan pass did not
/// record its offset. The image filename is the only stable anchor: its wide
/// form is searched within the unit's byte range, then the hero's own
/// sentinel run is re-found behind it, exactly as the scanner would.
pub fn resolve_hero_stats_base(
    snapshot: &[u8],
    unit: &UnitRecord,
    hero: &Hero,
    params: &ScanParams,
) -> Result<usize, PatchError> {
    if let Some(base) = hero.stats16_offset {
        return Ok(base);
    }
    let needle = wide_pattern(&hero.image);
    let anchor = find_first(snapshot, &needle, unit.start_offset)
        .filter(|&at| at < unit.end_offset)
        .ok_or_else(|| PatchError::OffsetUnresolved(hero.image.clone()))?;
    let run = find_run(
        snapshot,
        anchor + needle.len(),
        params.hero_window,
        params.min_run,
        params.max_run,
    )
    .ok_or_else(|| PatchError::OffsetUnresolved(hero.image.clone()))?;
    let base = run.end();
    if base + HERO_STAT_COUNT * 2 > snapshot.len() {
        return Err(PatchError::OffsetUnresolved(hero.image.clone()));
    }
    Ok(base)
}

/// Plans a batch of hero stat updates against an already-resolved stat-block
/// base offset.
pub fn plan_hero_patch(
    buffer: &[u8],
    stats_base: usize,
    updates: &[(String, u32)],
) -> Result<Vec<PatchChange>, PatchError> {
    let mut changes = Vec::new();
    for (name, value) in updates {
        let spec = hero_field(name).ok_or_else(|| PatchError::UnknownField(name.clone()))?;
        if let Some(change) = validate_one(buffer, stats_base, spec, *value)? {
            changes.push(change);
        }
    }
    Ok(changes)
}

/// Writes a validated batch into the buffer. Offsets were bounds-checked at
/// planning time against this same buffer.
pub fn apply_changes(buffer: &mut [u8], changes: &[PatchChange]) {
    for change in changes {
        match change.width {
            FieldWidth::U16 => {
                buffer[change.offset..change.offset + 2]
                    .copy_from_slice(&(change.new as u16).to_le_bytes());
            }
            FieldWidth::U32 => {
                buffer[change.offset..change.offset + 4]
                    .copy_from_slice(&change.new.to_le_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_unit(stats_offset: usize, end: usize) -> UnitRecord {
        UnitRecord {
            name: "Test".into(),
            stats: Vec::new(),
            stats_offset,
            history: Vec::new(),
            heroes: Vec::new(),
            citations: Vec::new(),
            raw_tail_bytes: Vec::new(),
            start_offset: 0,
            end_offset: end,
            index: 1,
        }
    }

    #[test]
    fn plan_resolves_offsets_and_reads_old_values() {
        let mut buffer = vec![0u8; 200];
        let unit = dummy_unit(10, 200);
        // strength (index 5) lives at 10 + 10
        buffer[20..22].copy_from_slice(&7u16.to_le_bytes());
        let changes =
            plan_unit_patch(&buffer, &unit, &[("strength".into(), 10)]).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].offset, 20);
        assert_eq!(changes[0].old, 7);
        assert_eq!(changes[0].new, 10);
    }

    #[test]
    fn equal_value_is_dropped_from_plan() {
        let mut buffer = vec![0u8; 200];
        let unit = dummy_unit(10, 200);
        buffer[20..22].copy_from_slice(&7u16.to_le_bytes());
        let changes = plan_unit_patch(&buffer, &unit, &[("strength".into(), 7)]).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn unknown_field_fails_whole_batch() {
        let buffer = vec![0u8; 200];
        let unit = dummy_unit(10, 200);
        let err = plan_unit_patch(
            &buffer,
            &unit,
            &[("strength".into(), 1), ("charisma".into(), 2)],
        )
        .unwrap_err();
        assert_eq!(err, PatchError::UnknownField("charisma".into()));
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let buffer = vec![0u8; 200];
        let unit = dummy_unit(10, 200);
        let err = plan_unit_patch(&buffer, &unit, &[("strength".into(), 70_000)])
            .unwrap_err();
        assert!(matches!(err, PatchError::ValueOutOfRange { .. }));
    }

    #[test]
    fn write_past_buffer_end_is_rejected() {
        let buffer = vec![0u8; 16];
        let unit = dummy_unit(10, 16);
        let err = plan_unit_patch(&buffer, &unit, &[("strength".into(), 1)]).unwrap_err();
        assert!(matches!(err, PatchError::WriteOutOfBounds { .. }));
    }

    #[test]
    fn u32_field_strides_by_four_bytes() {
        let mut buffer = vec![0u8; 64];
        // index 2 of a u32 table sits at base + 8, not base + 4
        buffer[18..22].copy_from_slice(&0x0001_0000u32.to_le_bytes());
        let spec = FieldSpec {
            name: "total_kills",
            index: 2,
            width: FieldWidth::U32,
        };
        let change = validate_one(&buffer, 10, &spec, 70_000).unwrap().unwrap();
        assert_eq!(change.offset, 18);
        assert_eq!(change.old, 0x0001_0000);

        apply_changes(&mut buffer, &[change]);
        assert_eq!(&buffer[18..22], &70_000u32.to_le_bytes());
    }

    #[test]
    fn apply_writes_little_endian() {
        let mut buffer = vec![0u8; 8];
        let changes = vec![PatchChange {
            field: "strength".into(),
            offset: 2,
            width: FieldWidth::U16,
            old: 0,
            new: 0x0102,
        }];
        apply_changes(&mut buffer, &changes);
        assert_eq!(&buffer[2..4], &[0x02, 0x01]);
    }
}
