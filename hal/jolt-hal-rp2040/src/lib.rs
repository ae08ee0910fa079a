//! RP2040-specific HAL for the motion indicator firmware
//!
//! This crate provides RP2040 implementations of the shared `jolt-hal`
//! traits:
//!
//! - PL011 UART register view for interrupt-driven serial
//!   (implements `SerialPeripheral` and `TxInterruptControl`)
//! - SysTick millisecond clock (implements `Clock`)

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod uart;

pub use clock::SysTickClock;
pub use uart::Pl011;
