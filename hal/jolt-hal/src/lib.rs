//! Jolt Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The core transport and application logic only
//! talk to hardware through these traits, which keeps them testable on the
//! host with mock peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (jolt-firmware)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  jolt-core (transport, console, loop)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  jolt-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  jolt-hal-    │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialPeripheral`] - Interrupt-side view of a UART
//! - [`serial::TxInterruptControl`] - Foreground switch for the TX interrupt
//! - [`serial::UartTx`], [`serial::UartRx`] - Blocking serial streams
//! - [`time::Clock`] - Millisecond tick counter

#![no_std]
#![deny(unsafe_code)]

pub mod serial;
pub mod time;

// Re-export key traits at crate root for convenience
pub use serial::{
    LineErrors, LineStatus, SerialPeripheral, TxInterruptControl, UartConfig, UartRx, UartTx,
};
pub use time::{elapsed_ms, Clock};
