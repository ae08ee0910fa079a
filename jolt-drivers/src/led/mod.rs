//! LED drivers

pub mod rgb;

pub use rgb::{Polarity, RgbLed};
