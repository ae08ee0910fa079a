//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in jolt-core, written against the `embedded-hal` 1.0 bus and PWM traits:
//!
//! - Accelerometers (NXP MMA8451Q over I2C)
//! - RGB LEDs (three PWM channels)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod accel;
pub mod led;
