//! Named stat fields and their positions inside the numeric blocks.
//!
//! The format carries no field names; these tables pin the known indices
//! down once, instead of per-call maps. Indices are element positions
//! inside the block (stride = field width), not byte offsets.

/// Width of a numeric field in the save buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U16,
    U32,
}

impl FieldWidth {
    pub fn bytes(&self) -> usize {
        match self {
            FieldWidth::U16 => 2,
            FieldWidth::U32 => 4,
        }
    }

    pub fn max_value(&self) -> u32 {
        match self {
            FieldWidth::U16 => u16::MAX as u32,
            FieldWidth::U32 => u32::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub index: usize,
    pub width: FieldWidth,
}

const fn u16_field(name: &'static str, index: usize) -> FieldSpec {
    FieldSpec {
        name,
        index,
        width: FieldWidth::U16,
    }
}

/// Named positions inside a hero's 16-value stat block.
pub const HERO_FIELDS: &[FieldSpec] = &[
    u16_field("attack", 3),
    u16_field("defense", 5),
    u16_field("initiative", 6),
    u16_field("movement", 8),
    u16_field("spotting", 10),
    u16_field("range", 12),
];

/// Named positions inside a unit's stats head block.
pub const UNIT_FIELDS: &[FieldSpec] = &[
    u16_field("strength", 5),
    u16_field("max_strength", 7),
    u16_field("xp", 13),
    u16_field("fuel", 21),
    u16_field("ammo", 23),
    u16_field("kills", 28),
    u16_field("losses", 30),
    u16_field("kill_inf", 32),
    u16_field("kill_tank", 34),
    u16_field("kill_reco", 36),
    u16_field("kill_at", 38),
    u16_field("kill_art", 40),
    u16_field("kill_aa", 42),
    u16_field("kill_bunker", 44),
    u16_field("kill_fighter", 46),
    u16_field("kill_tbomber", 48),
    u16_field("kill_sbomber", 50),
    u16_field("kill_submarine", 52),
    u16_field("kill_destroyer", 54),
    u16_field("kill_cruiser", 56),
    u16_field("kill_carrier", 58),
    u16_field("kill_truck", 60),
    u16_field("kill_airtransport", 62),
    u16_field("kill_seatransport", 64),
    u16_field("kill_train", 66),
];

pub fn hero_field(name: &str) -> Option<&'static FieldSpec> {
    HERO_FIELDS.iter().find(|f| f.name == name)
}

pub fn unit_field(name: &str) -> Option<&'static FieldSpec> {
    UNIT_FIELDS.iter().find(|f| f.name == name)
}
