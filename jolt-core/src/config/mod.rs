//! Configuration types
//!
//! Runtime-adjustable indicator settings. Board defaults are generated at
//! build time by the firmware and passed in at startup.

pub mod settings;

pub use settings::*;
