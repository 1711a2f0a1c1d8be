use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pzsav-se"))
        .args(args)
        .output()
        .expect("failed to run pzsav-se CLI")
}

fn temp_save_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.pzsav", std::process::id(), nanos))
}

fn wide_cstr(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for ch in s.bytes() {
        out.push(ch);
        out.push(0x00);
    }
    out.extend_from_slice(&[0x00, 0x00]);
    out
}

/// One well-formed record: name, empty stats head, a hero, no citations.
fn record(name: &str, strength: u16, hero: Option<(&str, &str, u16)>) -> Vec<u8> {
    let mut out = wide_cstr(name);
    out.extend_from_slice(&[0xFF; 4]);
    let mut head = vec![0u8; 132];
    head[10..12].copy_from_slice(&strength.to_le_bytes()); // index 5
    out.extend(head);
    out.extend_from_slice(&[0xFF; 4]);
    match hero {
        Some((hero_name, image, attack)) => {
            out.push(1);
            out.extend_from_slice(&[0u8; 7]);
            out.extend(wide_cstr(hero_name));
            out.extend_from_slice(&1u32.to_le_bytes());
            out.extend(wide_cstr(image));
            out.extend_from_slice(&[0xFF; 4]);
            let mut stats = [0u16; 16];
            stats[3] = attack;
            for v in stats {
                out.extend_from_slice(&v.to_le_bytes());
            }
            out.extend_from_slice(&[0x00, 0x00]);
        }
        None => out.push(0),
    }
    out.extend_from_slice(&[0xFF; 4]);
    out.extend_from_slice(&[0u8; 4]);
    out
}

fn write_sample(prefix: &str) -> PathBuf {
    let mut data = record("Panzer IV", 10, None);
    data.extend(record("Grossdeutschland", 13, Some(("Hans Gruber", "hero_inf.png", 11))));
    let path = temp_save_path(prefix);
    fs::write(&path, &data).unwrap();
    path
}

#[test]
fn list_prints_units_in_order() {
    let path = write_sample("pzsav_cli_list");
    let output = run_cli(&["list", path.to_str().unwrap(), "--offset", "0"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Panzer IV"));
    assert!(stdout.contains("Grossdeutschland"));
    assert!(stdout.contains("2 unit(s)"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn show_json_exposes_named_stats() {
    let path = write_sample("pzsav_cli_show");
    let output = run_cli(&[
        "show",
        path.to_str().unwrap(),
        "--offset",
        "0x0",
        "--unit-name",
        "Grossdeutschland",
        "--json",
    ]);
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["name"], Value::from("Grossdeutschland"));
    assert_eq!(json["stats"]["strength"], Value::from(13));
    assert_eq!(json["heroes"][0]["name"], Value::from("Hans Gruber"));
    assert_eq!(json["heroes"][0]["stats"]["attack"], Value::from(11));
    fs::remove_file(&path).unwrap();
}

#[test]
fn find_reports_name_offsets() {
    let path = write_sample("pzsav_cli_find");
    let output = run_cli(&["find", path.to_str().unwrap(), "--name", "Panzer IV"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0x00000000"));
    assert!(stdout.contains("1 match(es)"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn set_is_a_dry_run_by_default() {
    let path = write_sample("pzsav_cli_dry");
    let before = fs::read(&path).unwrap();
    let output = run_cli(&[
        "set",
        path.to_str().unwrap(),
        "--offset",
        "0",
        "--unit-index",
        "1",
        "--set",
        "strength=22",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("10 -> 22"));
    assert!(stdout.contains("dry run"));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!path.with_extension("pzsav.bak").exists());
    fs::remove_file(&path).unwrap();
}

#[test]
fn set_with_write_patches_file_and_makes_backup() {
    let path = write_sample("pzsav_cli_write");
    let before = fs::read(&path).unwrap();
    let output = run_cli(&[
        "set",
        path.to_str().unwrap(),
        "--offset",
        "0",
        "--unit-name",
        "Grossdeutschland",
        "--hero-index",
        "1",
        "--set",
        "attack=0x16",
        "--write",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("11 -> 22"));
    assert!(stdout.contains("backup"));

    let backup = PathBuf::from(format!("{}.bak", path.display()));
    assert_eq!(fs::read(&backup).unwrap(), before);
    assert_ne!(fs::read(&path).unwrap(), before);

    // the patched value is visible on a fresh scan
    let output = run_cli(&[
        "show",
        path.to_str().unwrap(),
        "--offset",
        "0",
        "--unit-name",
        "Grossdeutschland",
        "--json",
    ]);
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["heroes"][0]["stats"]["attack"], Value::from(22));

    fs::remove_file(&path).unwrap();
    fs::remove_file(&backup).unwrap();
}

#[test]
fn set_rejects_unknown_field_without_touching_the_file() {
    let path = write_sample("pzsav_cli_badfield");
    let before = fs::read(&path).unwrap();
    let output = run_cli(&[
        "set",
        path.to_str().unwrap(),
        "--offset",
        "0",
        "--unit-index",
        "1",
        "--set",
        "charisma=5",
        "--write",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown stat field"));
    assert_eq!(fs::read(&path).unwrap(), before);
    fs::remove_file(&path).unwrap();
}

#[test]
fn probe_reports_record_shape() {
    let path = write_sample("pzsav_cli_probe");
    let output = run_cli(&[
        "probe",
        path.to_str().unwrap(),
        "--offset",
        "0",
        "--json",
    ]);
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["compression"], Value::from("plain"));
    assert_eq!(json["name"], Value::from("Panzer IV"));
    assert_eq!(json["record"]["name"], Value::from("Panzer IV"));
    assert!(json["error"].is_null());
    fs::remove_file(&path).unwrap();
}
