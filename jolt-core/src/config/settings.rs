//! Indicator settings

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::{Acceleration, Rgb};

/// Default interval between periodic acceleration reports
pub const DEFAULT_REPORT_INTERVAL_MS: u32 = 1000;

/// Runtime indicator settings
///
/// Mutated by console commands, read by the foreground loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Colour shown while acceleration is at or above the threshold
    pub target: Rgb,
    /// Colour shown otherwise
    pub idle: Rgb,
    /// Acceleration threshold
    pub threshold: Acceleration,
    /// Interval between periodic acceleration reports
    pub report_interval_ms: u32,
    /// Periodic acceleration reporting active
    pub print_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: Rgb::GREEN,
            idle: Rgb::WHITE,
            threshold: Acceleration::from_meters_per_s2(10),
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            print_enabled: false,
        }
    }
}
