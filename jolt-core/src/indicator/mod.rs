//! Motion indicator
//!
//! The foreground side of the firmware: sample the accelerometer, drive the
//! LED, run the console and print periodic reports.

pub mod app;
pub mod detector;

pub use app::{Indicator, IndicatorError};
pub use detector::{select_color, ReportTimer};
