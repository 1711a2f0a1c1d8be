use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use pzsav_core::document::SaveDocument;
use pzsav_core::pattern::{find_all, wide_pattern};
use pzsav_core::probe::{probe_offset, sniff_compression};
use pzsav_core::scanner::ScanOutcome;
use pzsav_core::unit::{ScanParams, UnitRecord};
use pzsav_render::{
    DetailOptions, changes_to_json, compression_name, outcome_to_json, probe_to_json,
    render_changes, render_hexdump, render_probe, render_unit_detail, render_unit_list,
    unit_to_json,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Parser)]
#[command(author, version, about = "Scan and edit unit stats in Panzer Corps .pzsav files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the units found at the given stream offset
    List(ListArgs),
    /// Show one unit in detail
    Show(ShowArgs),
    /// Find every occurrence of a wide-encoded name in the file
    Find(FindArgs),
    /// Update unit or hero stats (dry run unless --write is given)
    Set(SetArgs),
    /// Inspect the bytes at an offset through the parser's eyes
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    #[arg(value_name = "SAVE.pzsav")]
    path: PathBuf,
    /// Offset where the unit stream starts (decimal or 0x hex)
    #[arg(long, visible_alias = "units-offset", value_parser = parse_offset)]
    offset: usize,
    /// Upper bound on records per scan
    #[arg(long, default_value_t = 100)]
    max_units: usize,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Debug, Args)]
struct SelectArgs {
    /// Select the unit by its exact name
    #[arg(long, conflicts_with = "unit_index")]
    unit_name: Option<String>,
    /// Select the unit by its 1-based scan index
    #[arg(long)]
    unit_index: Option<usize>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    scan: ScanArgs,
    #[command(flatten)]
    select: SelectArgs,
    /// Bytes skipped at the front of the history blob before decoding
    #[arg(long, default_value_t = 185)]
    hist_offset: usize,
    /// Character cap on the history snippet
    #[arg(long, default_value_t = 160)]
    hist_snippet: usize,
}

#[derive(Debug, Args)]
struct FindArgs {
    #[arg(value_name = "SAVE.pzsav")]
    path: PathBuf,
    /// Name to search for, matched in its wide on-disk form
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 50)]
    limit: usize,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct SetArgs {
    #[command(flatten)]
    scan: ScanArgs,
    #[command(flatten)]
    select: SelectArgs,
    /// Patch this hero (1-based) instead of the unit itself
    #[arg(long)]
    hero_index: Option<usize>,
    /// Updates as field=value (decimal or 0x hex), repeatable
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true, num_args = 1..)]
    updates: Vec<String>,
    /// Actually write the file (with a .bak backup); default is a dry run
    #[arg(long)]
    write: bool,
}

#[derive(Debug, Args)]
struct ProbeArgs {
    #[arg(value_name = "SAVE.pzsav")]
    path: PathBuf,
    /// Offset to probe (decimal or 0x hex)
    #[arg(long, value_parser = parse_offset)]
    offset: usize,
    /// Bytes of context to hexdump from the offset
    #[arg(long, default_value_t = 64)]
    dump: usize,
    #[arg(long)]
    json: bool,
}

fn parse_offset(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("expected a decimal or 0x-prefixed offset, got: {s}"))
}

fn parse_updates(pairs: &[String]) -> Result<Vec<(String, u32)>, String> {
    let mut out = Vec::new();
    for item in pairs {
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got: {item}"))?;
        let key = key.trim().to_lowercase();
        let value = value.trim();
        let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse(),
        }
        .map_err(|_| format!("value must be decimal or 0x hex, got: {value}"))?;
        out.push((key, parsed));
    }
    Ok(out)
}

fn open_document(path: &PathBuf, max_units: usize) -> SaveDocument {
    let doc = match SaveDocument::open_path(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    let params = ScanParams {
        max_units,
        ..ScanParams::default()
    };
    doc.with_params(params)
}

fn select_unit<'a>(outcome: &'a ScanOutcome, select: &SelectArgs) -> &'a UnitRecord {
    let found = match (&select.unit_name, select.unit_index) {
        (Some(name), _) => outcome.find_by_name(name),
        (None, Some(index)) => outcome.by_index(index),
        (None, None) => {
            eprintln!("one of --unit-name or --unit-index is required");
            process::exit(2);
        }
    };
    match found {
        Some(unit) => unit,
        None => {
            eprintln!(
                "no matching unit among the {} scanned record(s)",
                outcome.units.len()
            );
            process::exit(1);
        }
    }
}

fn cmd_list(args: &ListArgs) {
    let doc = open_document(&args.scan.path, args.scan.max_units);
    let outcome = doc.scan(args.scan.offset);
    if args.scan.json {
        let json = outcome_to_json(&outcome, &DetailOptions::default());
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else {
        print!("{}", render_unit_list(&outcome));
    }
}

fn cmd_show(args: &ShowArgs) {
    let doc = open_document(&args.scan.path, args.scan.max_units);
    let outcome = doc.scan(args.scan.offset);
    let unit = select_unit(&outcome, &args.select);
    let options = DetailOptions {
        hist_offset: args.hist_offset,
        hist_snippet: args.hist_snippet,
        show_history: true,
    };
    if args.scan.json {
        let json = unit_to_json(unit, &options);
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else {
        print!("{}", render_unit_detail(unit, &options));
    }
}

fn cmd_find(args: &FindArgs) {
    let data = match fs::read(&args.path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading {}: {e}", args.path.display());
            process::exit(1);
        }
    };
    let needle = wide_pattern(&args.name);
    let offsets = find_all(&data, &needle, args.limit);
    if args.json {
        let mut map = JsonMap::new();
        map.insert("name".to_string(), JsonValue::String(args.name.clone()));
        map.insert(
            "offsets".to_string(),
            JsonValue::Array(offsets.iter().map(|o| JsonValue::from(*o)).collect()),
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonValue::Object(map)).unwrap_or_default()
        );
    } else {
        for offset in &offsets {
            println!("0x{offset:08x}");
        }
        println!("{} match(es)", offsets.len());
    }
}

fn cmd_set(args: &SetArgs) {
    let updates = match parse_updates(&args.updates) {
        Ok(updates) => updates,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let mut doc = open_document(&args.scan.path, args.scan.max_units);
    let outcome = doc.scan(args.scan.offset);
    let unit = select_unit(&outcome, &args.select).clone();

    let result = match args.hero_index {
        Some(hero_index) => doc.patch_hero(&unit, hero_index, &updates),
        None => doc.patch_unit(&unit, &updates),
    };
    let changes = match result {
        Ok(changes) => changes,
        Err(e) => {
            eprintln!("Error applying update: {e}");
            process::exit(1);
        }
    };

    if args.scan.json {
        let json = changes_to_json(&changes);
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else {
        print!("{}", render_changes(&changes));
    }

    if !args.write {
        println!("dry run, file not modified (pass --write to apply)");
        return;
    }
    match doc.write_with_backup(&args.scan.path) {
        Ok(Some(backup)) => println!("written, backup at {}", backup.display()),
        Ok(None) => println!("written"),
        Err(e) => {
            eprintln!("Error writing {}: {e}", args.scan.path.display());
            process::exit(1);
        }
    }
}

fn cmd_probe(args: &ProbeArgs) {
    let raw = match fs::read(&args.path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading {}: {e}", args.path.display());
            process::exit(1);
        }
    };
    let compression = sniff_compression(&raw);
    let doc = match SaveDocument::from_bytes(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error unpacking {}: {e}", args.path.display());
            process::exit(1);
        }
    };

    let report = probe_offset(doc.bytes(), args.offset, doc.params());
    if args.json {
        let json = probe_to_json(&report, compression);
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else {
        println!("container: {}", compression_name(compression));
        print!("{}", render_probe(&report));
        let end = doc.bytes().len().min(args.offset.saturating_add(args.dump));
        if args.offset < end {
            print!("{}", render_hexdump(&doc.bytes()[args.offset..end], args.offset));
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match &cli.command {
        Command::List(args) => cmd_list(args),
        Command::Show(args) => cmd_show(args),
        Command::Find(args) => cmd_find(args),
        Command::Set(args) => cmd_set(args),
        Command::Probe(args) => cmd_probe(args),
    }
}
