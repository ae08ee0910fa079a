//! Threshold detection and report pacing

use jolt_hal::elapsed_ms;

use crate::config::Settings;
use crate::traits::{Acceleration, Rgb};

/// Colour to show for a measured acceleration
///
/// Reaching the threshold exactly counts as reaching it.
pub fn select_color(acceleration: Acceleration, settings: &Settings) -> Rgb {
    if acceleration >= settings.threshold {
        settings.target
    } else {
        settings.idle
    }
}

/// Paces periodic reports against a millisecond clock
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportTimer {
    last_ms: u32,
}

impl ReportTimer {
    pub const fn new(now_ms: u32) -> Self {
        Self { last_ms: now_ms }
    }

    /// Restart the interval at `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }

    /// Check if at least `interval_ms` passed since the last reset
    pub fn is_due(&self, now_ms: u32, interval_ms: u32) -> bool {
        elapsed_ms(self.last_ms, now_ms) >= interval_ms
    }
}
