//! Build script for jolt-firmware
//!
//! - Sets up linker search paths and arguments for memory.x
//! - Validates device.toml at compile time
//! - Generates `device_config.rs` constants from device.toml

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Board defaults after validation
struct DeviceConfig {
    baudrate: u32,
    target_color: [u8; 3],
    idle_color: [u8; 3],
    threshold_milli: u32,
    report_interval_ms: u32,
}

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    let config = validate_config();
    generate_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
fn validate_config() -> DeviceConfig {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the jolt-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let serial = section(&config, "serial", &mut errors);
    let indicator = section(&config, "indicator", &mut errors);

    let baudrate = serial
        .and_then(|s| integer(s, "serial", "baudrate", 300, 1_000_000, &mut errors))
        .unwrap_or(0) as u32;

    let target_color = indicator
        .and_then(|s| color(s, "target_color", &mut errors))
        .unwrap_or_default();
    let idle_color = indicator
        .and_then(|s| color(s, "idle_color", &mut errors))
        .unwrap_or_default();

    let threshold_milli = indicator
        .and_then(|s| threshold(s, &mut errors))
        .unwrap_or(0);

    let report_interval_ms = indicator
        .and_then(|s| {
            integer(s, "indicator", "report_interval_ms", 1, 3_600_000, &mut errors)
        })
        .unwrap_or(0) as u32;

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in device.toml                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");

    DeviceConfig {
        baudrate,
        target_color,
        idle_color,
        threshold_milli,
        report_interval_ms,
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

fn integer(
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn color(table: &toml::Table, key: &str, errors: &mut Vec<String>) -> Option<[u8; 3]> {
    let invalid = || format!("[indicator] {} must be [r, g, b] with values 0-255", key);

    let Some(value) = table.get(key) else {
        errors.push(format!("[indicator] missing '{}'", key));
        return None;
    };
    let Some(items) = value.as_array().filter(|a| a.len() == 3) else {
        errors.push(invalid());
        return None;
    };

    let mut rgb = [0u8; 3];
    for (slot, item) in rgb.iter_mut().zip(items) {
        match item.as_integer().map(u8::try_from) {
            Some(Ok(v)) => *slot = v,
            _ => {
                errors.push(invalid());
                return None;
            }
        }
    }
    Some(rgb)
}

/// Threshold in m/s^2 as milli-m/s^2
fn threshold(table: &toml::Table, errors: &mut Vec<String>) -> Option<u32> {
    let value = match table.get("threshold") {
        Some(toml::Value::Float(f)) => *f,
        Some(toml::Value::Integer(i)) => *i as f64,
        Some(_) => {
            errors.push("[indicator] threshold must be a number".to_string());
            return None;
        }
        None => {
            errors.push("[indicator] missing 'threshold'".to_string());
            return None;
        }
    };

    if !value.is_finite() || !(0.0..=1_000_000.0).contains(&value) {
        errors.push("[indicator] threshold must be 0-1000000 m/s^2".to_string());
        return None;
    }
    Some((value * 1000.0).round() as u32)
}

/// Write `device_config.rs` for inclusion by `src/config.rs`
fn generate_config(out_dir: &Path, config: &DeviceConfig) {
    let [tr, tg, tb] = config.target_color;
    let [ir, ig, ib] = config.idle_color;

    let source = format!(
        "// Generated from device.toml by build.rs\n\
         pub const BAUDRATE: u32 = {};\n\
         pub const TARGET_COLOR: Rgb = Rgb::new({}, {}, {});\n\
         pub const IDLE_COLOR: Rgb = Rgb::new({}, {}, {});\n\
         pub const THRESHOLD: Acceleration = Acceleration::from_milli({});\n\
         pub const REPORT_INTERVAL_MS: u32 = {};\n",
        config.baudrate,
        tr,
        tg,
        tb,
        ir,
        ig,
        ib,
        config.threshold_milli,
        config.report_interval_ms,
    );

    fs::write(out_dir.join("device_config.rs"), source).unwrap();
}
