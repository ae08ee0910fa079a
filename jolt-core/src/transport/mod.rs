//! Interrupt-driven serial byte transport
//!
//! Moves bytes between a UART's interrupt handler and the foreground loop
//! through two fixed-capacity circular buffers (inbound and outbound).

pub mod fifo;
pub mod serial;

pub use fifo::{CircularBuffer, Consumer, Producer};
pub use serial::{
    SerialTransport, TransportError, TransportHandle, TransportIrq, TransportStats,
    SERIAL_BUFFER_CAPACITY,
};
