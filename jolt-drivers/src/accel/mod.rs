//! Accelerometer drivers

pub mod mma8451q;

pub use mma8451q::{Mma8451q, Mma8451qError};
