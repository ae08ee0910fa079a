//! Board configuration
//!
//! Constants are generated by build.rs from device.toml.

use jolt_core::config::Settings;
use jolt_core::traits::{Acceleration, Rgb};
use jolt_hal::UartConfig;

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));

/// Startup indicator settings
pub fn settings() -> Settings {
    Settings {
        target: TARGET_COLOR,
        idle: IDLE_COLOR,
        threshold: THRESHOLD,
        report_interval_ms: REPORT_INTERVAL_MS,
        print_enabled: false,
    }
}

/// Console UART line settings (8N2 at the configured baud rate)
pub fn uart() -> UartConfig {
    UartConfig {
        baudrate: BAUDRATE,
        ..UartConfig::default()
    }
}
