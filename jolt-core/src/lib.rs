//! Board-agnostic core logic for the motion indicator firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Interrupt-safe circular byte buffers and the serial transport built on them
//! - Line editing and command dispatch for the serial console
//! - Indicator settings, threshold detection and the foreground loop
//! - Hardware abstraction traits (accelerometer, colour output)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod indicator;
pub mod traits;
pub mod transport;
