//! Build script
//! Generates the firmware's compile-time settings from `buttons.toml` and
//! `PICO_BUTTONS_*` environment overrides, and sets up RP2040 linking.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

const KEYS: [&str; 4] = ["scan_interval_us", "scan_alarm_id", "scan_skip", "poll_interval_ms"];

fn main() -> Result<(), Box<dyn Error>> {
    let out = PathBuf::from(env::var("OUT_DIR")?);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=buttons.toml");
    println!("cargo:rerun-if-changed=memory.x");
    for key in KEYS {
        println!("cargo:rerun-if-env-changed=PICO_BUTTONS_{}", key.to_uppercase());
    }

    let settings = config::Config::builder()
        .set_default("scan_interval_us", 50_000_i64)?
        .set_default("scan_alarm_id", 1_i64)?
        .set_default("scan_skip", 0_i64)?
        .set_default("poll_interval_ms", 100_i64)?
        .add_source(config::File::with_name("buttons").required(false))
        .add_source(config::Environment::with_prefix("PICO_BUTTONS").try_parsing(true))
        .build()?;

    let scan_interval_us: u32 = settings.get("scan_interval_us")?;
    let scan_alarm_id: u8 = settings.get("scan_alarm_id")?;
    let scan_skip: u8 = settings.get("scan_skip")?;
    let poll_interval_ms: u64 = settings.get("poll_interval_ms")?;

    // Channel 0 drives the embassy time driver
    if !(1..=3).contains(&scan_alarm_id) {
        return Err(format!("scan_alarm_id must be 1, 2 or 3, got {scan_alarm_id}").into());
    }
    if scan_interval_us < 2 {
        return Err(format!("scan_interval_us must be at least 2, got {scan_interval_us}").into());
    }

    let generated = format!(
        "/// Period of the button scan alarm\n\
         pub const SCAN_INTERVAL_US: u32 = {scan_interval_us};\n\
         /// Comparator channel running the button scan\n\
         pub const SCAN_ALARM_ID: u8 = {scan_alarm_id};\n\
         /// Scans ignored after boot\n\
         pub const SCAN_SKIP: u8 = {scan_skip};\n\
         /// Event poll period of the reporter task\n\
         pub const POLL_INTERVAL_MS: u64 = {poll_interval_ms};\n"
    );
    fs::write(out.join("config_generated.rs"), generated)?;

    if env::var("TARGET")?.starts_with("thumbv6m") {
        fs::copy("memory.x", out.join("memory.x"))?;
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    Ok(())
}
