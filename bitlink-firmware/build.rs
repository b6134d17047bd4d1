//! Build script for bitlink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest banner the firmware's config buffer holds
const MAX_BANNER_LEN: usize = 32;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
///
/// The firmware parses the same file at boot with a much smaller parser, so
/// everything it would reject is caught here with a readable message.
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        fail("device.toml not found", &["The firmware embeds device.toml from the crate root."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &[&e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in device.toml", &lines)
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_serial(&config, &mut errors);
    validate_telemetry(&config, &mut errors);
    validate_display(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid configuration in device.toml", &lines);
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Abort the build with a boxed error message
fn fail(title: &str, details: &[&str]) -> ! {
    let body = details
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Only the sections the boot parser knows are allowed, and no top-level keys
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !value.is_table() {
            errors.push(format!("'{}' must be inside a section", name));
        } else if !["serial", "telemetry", "display"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        }
    }
}

fn check_keys(section: &str, table: &toml::value::Table, known: &[&str], errors: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

fn check_int(
    section: &str,
    table: &toml::value::Table,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if range.contains(v) => {}
        Some(toml::Value::Integer(_)) => errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(serial) = config.get("serial").and_then(|s| s.as_table()) else {
        return;
    };
    check_keys("serial", serial, &["baudrate"], errors);
    check_int("serial", serial, "baudrate", 1_200..=921_600, errors);
}

fn validate_telemetry(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(telemetry) = config.get("telemetry").and_then(|t| t.as_table()) else {
        return;
    };
    check_keys("telemetry", telemetry, &["rate_hz", "window_secs"], errors);
    check_int("telemetry", telemetry, "rate_hz", 1..=100, errors);
    check_int("telemetry", telemetry, "window_secs", 0..=255, errors);
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display").and_then(|d| d.as_table()) else {
        return;
    };
    check_keys("display", display, &["banner", "banner_delay_ms", "brightness"], errors);
    check_int("display", display, "banner_delay_ms", 0..=65_535, errors);
    check_int("display", display, "brightness", 0..=255, errors);

    match display.get("banner") {
        None => {}
        Some(toml::Value::String(banner)) => {
            if banner.len() > MAX_BANNER_LEN {
                errors.push(format!("[display] banner longer than {} bytes", MAX_BANNER_LEN));
            }
            if banner.contains('"') || !banner.is_ascii() {
                errors.push("[display] banner must be plain ASCII without quotes".to_string());
            }
        }
        Some(_) => errors.push("[display] banner must be a string".to_string()),
    }
}
