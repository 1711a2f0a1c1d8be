use std::fmt::Write as _;

use pzsav_core::fields::{FieldSpec, HERO_FIELDS, UNIT_FIELDS};
use pzsav_core::hero::Hero;
use pzsav_core::patcher::PatchChange;
use pzsav_core::probe::{Compression, ProbeReport};
use pzsav_core::scanner::ScanOutcome;
use pzsav_core::text::history_preview;
use pzsav_core::unit::UnitRecord;
use serde_json::{Map as JsonMap, Value as JsonValue};

const HEXDUMP_WIDTH: usize = 16;

/// Display knobs for the unit detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOptions {
    /// Bytes skipped at the front of the history blob before decoding.
    pub hist_offset: usize,
    /// Character cap on the history snippet.
    pub hist_snippet: usize,
    pub show_history: bool,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            hist_offset: 185,
            hist_snippet: 160,
            show_history: true,
        }
    }
}

fn named_value(unit_stats: &[u16], spec: &FieldSpec) -> Option<u16> {
    unit_stats.get(spec.index).copied()
}

/// One list line per unit: index, offsets, name, headline stats.
pub fn render_unit_line(unit: &UnitRecord) -> String {
    let strength = unit.stat(5).map_or("?".to_string(), |v| v.to_string());
    let xp = unit.stat(13).map_or("?".to_string(), |v| v.to_string());
    let mut line = format!(
        "#{:<3} 0x{:08x}  {:<28} str={:<5} xp={:<6}",
        unit.index, unit.start_offset, unit.name, strength, xp
    );
    if !unit.heroes.is_empty() {
        let _ = write!(line, " heroes={}", unit.heroes.len());
    }
    if !unit.citations.is_empty() {
        let _ = write!(line, " citations={}", unit.citations.len());
    }
    line
}

pub fn render_unit_list(outcome: &ScanOutcome) -> String {
    let mut out = String::new();
    for unit in &outcome.units {
        writeln!(&mut out, "{}", render_unit_line(unit)).expect("writing to String cannot fail");
    }
    writeln!(&mut out, "{} unit(s)", outcome.units.len()).expect("writing to String cannot fail");
    if let Some(stop) = &outcome.stop {
        writeln!(&mut out, "scan stopped at 0x{:08x}: {}", stop.offset, stop.error)
            .expect("writing to String cannot fail");
    }
    out
}

fn render_hero(out: &mut String, index: usize, hero: &Hero) {
    writeln!(out, "  hero #{index}: {} ({})", hero.name, hero.image)
        .expect("writing to String cannot fail");
    let mut stats = String::new();
    for spec in HERO_FIELDS {
        if let Some(v) = hero.stats16.get(spec.index) {
            let _ = write!(stats, "{}={} ", spec.name, v);
        }
    }
    writeln!(out, "    {}", stats.trim_end()).expect("writing to String cannot fail");
}

pub fn render_unit_detail(unit: &UnitRecord, options: &DetailOptions) -> String {
    let mut out = String::new();
    writeln!(&mut out, "unit #{}: {}", unit.index, unit.name)
        .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "  range: 0x{:08x}..0x{:08x}  stats at 0x{:08x}",
        unit.start_offset, unit.end_offset, unit.stats_offset
    )
    .expect("writing to String cannot fail");

    for spec in UNIT_FIELDS {
        if let Some(v) = named_value(&unit.stats, spec) {
            let core_field =
                matches!(spec.name, "strength" | "max_strength" | "xp" | "fuel" | "ammo");
            if v != 0 || core_field {
                writeln!(&mut out, "  {:<18} {}", spec.name, v)
                    .expect("writing to String cannot fail");
            }
        }
    }

    for (i, hero) in unit.heroes.iter().enumerate() {
        render_hero(&mut out, i + 1, hero);
    }
    for citation in &unit.citations {
        writeln!(&mut out, "  citation: {citation}").expect("writing to String cannot fail");
    }

    if options.show_history {
        let preview = history_preview(&unit.history, options.hist_offset, options.hist_snippet);
        if !preview.is_empty() {
            writeln!(&mut out, "  history: {preview}").expect("writing to String cannot fail");
        }
    }
    out
}

/// Change log for an applied patch batch, one line per write.
pub fn render_changes(changes: &[PatchChange]) -> String {
    let mut out = String::new();
    if changes.is_empty() {
        writeln!(&mut out, "no changes").expect("writing to String cannot fail");
        return out;
    }
    for change in changes {
        writeln!(
            &mut out,
            "{:<18} 0x{:08x}  {} -> {}",
            change.field, change.offset, change.old, change.new
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn render_hexdump(bytes: &[u8], base_offset: usize) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(HEXDUMP_WIDTH).enumerate() {
        let mut hex = String::with_capacity(HEXDUMP_WIDTH * 3);
        let mut ascii = String::with_capacity(HEXDUMP_WIDTH);
        for b in chunk {
            let _ = write!(hex, "{b:02x} ");
            ascii.push(if (0x20..0x7f).contains(b) { *b as char } else { '.' });
        }
        writeln!(
            &mut out,
            "0x{:08x}  {:<48} {}",
            base_offset + row * HEXDUMP_WIDTH,
            hex,
            ascii
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn compression_name(compression: Compression) -> &'static str {
    match compression {
        Compression::Plain => "plain",
        Compression::Gzip => "gzip",
        Compression::Zlib => "zlib",
    }
}

pub fn render_probe(report: &ProbeReport) -> String {
    let mut out = String::new();
    writeln!(&mut out, "probe at 0x{:08x}", report.offset).expect("writing to String cannot fail");
    writeln!(&mut out, "  first readable byte: 0x{:08x}", report.first_readable)
        .expect("writing to String cannot fail");
    match (&report.name, &report.name_error) {
        (Some(name), _) => writeln!(&mut out, "  name: {name:?}"),
        (None, Some(e)) => writeln!(&mut out, "  name: <{e}>"),
        (None, None) => writeln!(&mut out, "  name: <none>"),
    }
    .expect("writing to String cannot fail");
    for run in &report.runs {
        writeln!(&mut out, "  run: 0x{:08x} len {}", run.pos, run.len)
            .expect("writing to String cannot fail");
    }
    match (&report.unit, &report.unit_error) {
        (Some(unit), _) => writeln!(
            &mut out,
            "  record: {} ({} stats, {} heroes, {} citations), next at 0x{:08x}",
            unit.name,
            unit.stats.len(),
            unit.heroes.len(),
            unit.citations.len(),
            unit.end_offset
        ),
        (None, Some(e)) => writeln!(&mut out, "  record: <{e}>"),
        (None, None) => writeln!(&mut out, "  record: <none>"),
    }
    .expect("writing to String cannot fail");
    out
}

fn hero_to_json(hero: &Hero) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert("name".to_string(), JsonValue::String(hero.name.clone()));
    map.insert("image".to_string(), JsonValue::String(hero.image.clone()));
    let mut named = JsonMap::new();
    for spec in HERO_FIELDS {
        if let Some(v) = hero.stats16.get(spec.index) {
            named.insert(spec.name.to_string(), JsonValue::from(*v));
        }
    }
    map.insert("stats".to_string(), JsonValue::Object(named));
    map.insert(
        "stats16".to_string(),
        JsonValue::Array(hero.stats16.iter().map(|v| JsonValue::from(*v)).collect()),
    );
    map.insert(
        "stats_offset".to_string(),
        match hero.stats16_offset {
            Some(off) => JsonValue::from(off),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(map)
}

pub fn unit_to_json(unit: &UnitRecord, options: &DetailOptions) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert("index".to_string(), JsonValue::from(unit.index));
    map.insert("name".to_string(), JsonValue::String(unit.name.clone()));
    map.insert("start_offset".to_string(), JsonValue::from(unit.start_offset));
    map.insert("end_offset".to_string(), JsonValue::from(unit.end_offset));
    map.insert("stats_offset".to_string(), JsonValue::from(unit.stats_offset));

    let mut named = JsonMap::new();
    for spec in UNIT_FIELDS {
        if let Some(v) = named_value(&unit.stats, spec) {
            named.insert(spec.name.to_string(), JsonValue::from(v));
        }
    }
    map.insert("stats".to_string(), JsonValue::Object(named));
    map.insert(
        "heroes".to_string(),
        JsonValue::Array(unit.heroes.iter().map(hero_to_json).collect()),
    );
    map.insert(
        "citations".to_string(),
        JsonValue::Array(
            unit.citations
                .iter()
                .map(|c| JsonValue::String(c.clone()))
                .collect(),
        ),
    );
    map.insert(
        "history_preview".to_string(),
        JsonValue::String(history_preview(
            &unit.history,
            options.hist_offset,
            options.hist_snippet,
        )),
    );
    JsonValue::Object(map)
}

pub fn outcome_to_json(outcome: &ScanOutcome, options: &DetailOptions) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert(
        "units".to_string(),
        JsonValue::Array(
            outcome
                .units
                .iter()
                .map(|u| unit_to_json(u, options))
                .collect(),
        ),
    );
    map.insert(
        "stop".to_string(),
        match &outcome.stop {
            Some(stop) => {
                let mut s = JsonMap::new();
                s.insert("offset".to_string(), JsonValue::from(stop.offset));
                s.insert("error".to_string(), JsonValue::String(stop.error.to_string()));
                JsonValue::Object(s)
            }
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(map)
}

pub fn changes_to_json(changes: &[PatchChange]) -> JsonValue {
    JsonValue::Array(
        changes
            .iter()
            .map(|change| {
                let mut map = JsonMap::new();
                map.insert("field".to_string(), JsonValue::String(change.field.clone()));
                map.insert("offset".to_string(), JsonValue::from(change.offset));
                map.insert("old".to_string(), JsonValue::from(change.old));
                map.insert("new".to_string(), JsonValue::from(change.new));
                JsonValue::Object(map)
            })
            .collect(),
    )
}

pub fn probe_to_json(report: &ProbeReport, compression: Compression) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert("offset".to_string(), JsonValue::from(report.offset));
    map.insert(
        "compression".to_string(),
        JsonValue::String(compression_name(compression).to_string()),
    );
    map.insert(
        "first_readable".to_string(),
        JsonValue::from(report.first_readable),
    );
    map.insert(
        "name".to_string(),
        match &report.name {
            Some(name) => JsonValue::String(name.clone()),
            None => JsonValue::Null,
        },
    );
    map.insert(
        "runs".to_string(),
        JsonValue::Array(
            report
                .runs
                .iter()
                .map(|run| {
                    let mut r = JsonMap::new();
                    r.insert("pos".to_string(), JsonValue::from(run.pos));
                    r.insert("len".to_string(), JsonValue::from(run.len));
                    JsonValue::Object(r)
                })
                .collect(),
        ),
    );
    map.insert(
        "record".to_string(),
        match &report.unit {
            Some(unit) => unit_to_json(unit, &DetailOptions::default()),
            None => JsonValue::Null,
        },
    );
    map.insert(
        "error".to_string(),
        match &report.unit_error {
            Some(e) => JsonValue::String(e.to_string()),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(map)
}
