//! Hardware abstraction traits
//!
//! These traits define the interface between the indicator logic and the
//! sensor and LED drivers.

pub mod accelerometer;
pub mod color;

pub use accelerometer::{Acceleration, Accelerometer};
pub use color::{ColorOutput, Rgb};
