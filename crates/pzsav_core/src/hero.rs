//! Hero sub-records nested in a unit's tail region.

use serde::Serialize;

use crate::sentinel::find_run;
use crate::text::read_wide_cstr;

/// Hard cap on heroes per unit, regardless of the declared count.
pub const MAX_HEROES: usize = 3;

/// Required suffix of a hero's image filename. A string without it means
/// "no more heroes", not an error.
pub const IMAGE_SUFFIX: &str = ".png";

/// Number of 16-bit values in a hero stat block.
pub const HERO_STAT_COUNT: usize = 16;

/// Bytes between a hero's name terminator and its image filename (a type
/// tag that is not interpreted).
const NAME_TO_IMAGE_GAP: usize = 4;

/// Bytes between a hero's stat block and the next hero.
const STATS_TO_NEXT_GAP: usize = 2;

/// Bytes between the declared-count byte and the first hero block.
const COUNT_TO_FIRST_GAP: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hero {
    pub name: String,
    pub image: String,
    pub stats16: [u16; HERO_STAT_COUNT],
    /// Absolute offset of `stats16[0]`, when located during scanning.
    pub stats16_offset: Option<usize>,
}

/// Result of reading the hero region after boundary 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroRegion {
    pub heroes: Vec<Hero>,
    /// Raw count byte found in the file (may exceed [`MAX_HEROES`]).
    pub declared: u8,
    /// First byte after the region: past the last parsed hero block, or past
    /// the count byte when nothing was parsed.
    pub end: usize,
}

/// Parses one hero block at `off`. Returns `None` (and leaves the cursor
/// where it was) when the block is implausible or incomplete; the caller
/// treats that as the end of the hero list, never as a unit failure.
fn parse_one_hero(
    data: &[u8],
    off: usize,
    min_run: usize,
    max_run: Option<usize>,
    window: usize,
) -> Option<(Hero, usize)> {
    let n = data.len();

    let (name, i) = read_wide_cstr(data, off).ok()?;
    let j = i + NAME_TO_IMAGE_GAP;
    if name.is_empty() || j > n {
        return None;
    }

    let (image, k) = read_wide_cstr(data, j).ok()?;
    if !image.ends_with(IMAGE_SUFFIX) {
        return None;
    }

    // Each hero block is closed by its own sentinel run; the stat block
    // sits immediately after it.
    let run = find_run(data, k, window.min(n - k), min_run, max_run)?;
    let stats_off = run.end();
    let stats_end = stats_off + HERO_STAT_COUNT * 2;
    if stats_end > n {
        return None;
    }

    let mut stats16 = [0u16; HERO_STAT_COUNT];
    for (slot, pair) in stats16.iter_mut().zip(data[stats_off..stats_end].chunks_exact(2)) {
        *slot = u16::from_le_bytes([pair[0], pair[1]]);
    }

    let hero = Hero {
        name,
        image,
        stats16,
        stats16_offset: Some(stats_off),
    };
    Some((hero, stats_end + STATS_TO_NEXT_GAP))
}

/// Reads the declared hero count at `count_off` and then at most
/// [`MAX_HEROES`] hero blocks. A hero that fails any step is dropped and
/// stops the loop; heroes already collected are kept.
pub fn parse_hero_region(
    data: &[u8],
    count_off: usize,
    min_run: usize,
    max_run: Option<usize>,
    window: usize,
) -> HeroRegion {
    if count_off >= data.len() {
        return HeroRegion {
            heroes: Vec::new(),
            declared: 0,
            end: count_off,
        };
    }

    let declared = data[count_off];
    let target = (declared as usize).min(MAX_HEROES);
    if target == 0 {
        // No hero blocks follow; the next boundary search starts right
        // after the count byte.
        return HeroRegion {
            heroes: Vec::new(),
            declared,
            end: count_off + 1,
        };
    }

    let mut i = count_off + COUNT_TO_FIRST_GAP;
    let mut heroes = Vec::new();
    for _ in 0..target {
        match parse_one_hero(data, i, min_run, max_run, window) {
            Some((hero, next)) => {
                heroes.push(hero);
                i = next;
            }
            // unexpected shape: stop cleanly with what we have
            None => break,
        }
    }

    HeroRegion {
        heroes,
        declared,
        end: i,
    }
}
