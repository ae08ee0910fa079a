//! Duplex serial transport
//!
//! [`SerialTransport`] owns one inbound and one outbound [`CircularBuffer`].
//! At startup it is split into two role handles:
//!
//! - [`TransportHandle`] for the foreground: `write` (blocking, all or
//!   nothing) and `read_one` (non-blocking).
//! - [`TransportIrq`] for the UART interrupt handler: receive path and
//!   transmit path.
//!
//! Outbound state machine:
//!
//! ```text
//!            write() enables TX interrupt
//!   ┌──────┐ ──────────────────────────► ┌──────────┐
//!   │ Idle │                             │ Draining │ one byte per interrupt
//!   └──────┘ ◄────────────────────────── └──────────┘
//!            handler finds buffer empty,
//!            disables TX interrupt
//! ```
//!
//! Inbound bytes that arrive while the inbound buffer is full are dropped,
//! and bytes received with a line error are discarded. Neither is reported
//! to the foreground; both only bump diagnostic counters.

use core::fmt;

use jolt_hal::{SerialPeripheral, TxInterruptControl, UartRx, UartTx};
use portable_atomic::{AtomicU32, Ordering};

use super::fifo::{CircularBuffer, Consumer, Producer};

/// Capacity of each direction's buffer
pub const SERIAL_BUFFER_CAPACITY: usize = 256;

/// Errors from foreground transport operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Payload is larger than the outbound buffer and can never be queued whole
    PayloadTooLarge,
}

/// Receive-side diagnostic counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportStats {
    /// Bytes dropped because the inbound buffer was full
    pub rx_dropped: u32,
    /// Bytes discarded because of a framing/parity/overrun/noise error
    pub rx_line_errors: u32,
}

/// Counters written only from the interrupt handler
struct StatCounters {
    rx_dropped: AtomicU32,
    rx_line_errors: AtomicU32,
}

impl StatCounters {
    const fn new() -> Self {
        Self {
            rx_dropped: AtomicU32::new(0),
            rx_line_errors: AtomicU32::new(0),
        }
    }

    fn reset(&mut self) {
        self.rx_dropped.store(0, Ordering::Relaxed);
        self.rx_line_errors.store(0, Ordering::Relaxed);
    }

    // Single writer, so a plain load/store pair is enough
    fn bump(counter: &AtomicU32) {
        counter.store(
            counter.load(Ordering::Relaxed).wrapping_add(1),
            Ordering::Relaxed,
        );
    }

    fn snapshot(&self) -> TransportStats {
        TransportStats {
            rx_dropped: self.rx_dropped.load(Ordering::Relaxed),
            rx_line_errors: self.rx_line_errors.load(Ordering::Relaxed),
        }
    }
}

/// Inbound and outbound buffers for one UART
///
/// Intended to live in a `static` (for example behind a `StaticCell`) so both
/// halves returned by [`SerialTransport::split`] are `'static`.
pub struct SerialTransport<const N: usize = SERIAL_BUFFER_CAPACITY> {
    inbound: CircularBuffer<N>,
    outbound: CircularBuffer<N>,
    stats: StatCounters,
}

impl<const N: usize> Default for SerialTransport<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SerialTransport<N> {
    /// Create a transport with both buffers empty
    pub const fn new() -> Self {
        Self {
            inbound: CircularBuffer::new(),
            outbound: CircularBuffer::new(),
            stats: StatCounters::new(),
        }
    }

    /// Reset both buffers and the counters to their initial state
    pub fn init(&mut self) {
        self.inbound.init();
        self.outbound.init();
        self.stats.reset();
    }

    /// Split into the foreground handle and the interrupt-side handle
    ///
    /// `tx_control` is the foreground's view of the transmit interrupt
    /// enable bit.
    pub fn split<C: TxInterruptControl>(
        &mut self,
        tx_control: C,
    ) -> (TransportHandle<'_, C, N>, TransportIrq<'_, N>) {
        let (rx_producer, rx_consumer) = self.inbound.split();
        let (tx_producer, tx_consumer) = self.outbound.split();
        let stats = &self.stats;

        (
            TransportHandle {
                rx: rx_consumer,
                tx: tx_producer,
                tx_control,
                stats,
            },
            TransportIrq {
                rx: rx_producer,
                tx: tx_consumer,
                stats,
            },
        )
    }
}

/// Foreground side of the transport
pub struct TransportHandle<'a, C, const N: usize = SERIAL_BUFFER_CAPACITY> {
    rx: Consumer<'a, N>,
    tx: Producer<'a, N>,
    tx_control: C,
    stats: &'a StatCounters,
}

impl<'a, C: TxInterruptControl, const N: usize> TransportHandle<'a, C, N> {
    /// Queue `bytes` for transmission
    ///
    /// Spins until the outbound buffer has room for the whole payload, queues
    /// it in one go and starts the transmitter if it is idle. There is no
    /// timeout: if the UART never drains, this never returns.
    ///
    /// Payloads larger than the buffer capacity are rejected.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if bytes.len() > N {
            return Err(TransportError::PayloadTooLarge);
        }
        if bytes.is_empty() {
            return Ok(());
        }

        while self.tx.free() < bytes.len() {
            core::hint::spin_loop();
        }

        // Only the interrupt handler runs concurrently, and it only frees space
        let accepted = self.tx.enqueue(bytes);
        debug_assert_eq!(accepted, bytes.len());

        if !self.tx_control.tx_interrupt_enabled() {
            self.tx_control.enable_tx_interrupt();
        }

        Ok(())
    }

    /// Take one received byte, if any
    pub fn read_one(&mut self) -> Option<u8> {
        self.rx.dequeue_byte()
    }

    /// Check if received bytes are waiting
    pub fn has_input(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Number of bytes still waiting to be transmitted
    pub fn pending_output(&self) -> usize {
        self.tx.len()
    }

    /// Receive-side diagnostic counters
    pub fn stats(&self) -> TransportStats {
        self.stats.snapshot()
    }
}

impl<'a, C: TxInterruptControl, const N: usize> UartTx for TransportHandle<'a, C, N> {
    type Error = TransportError;

    /// Write data of any length, one buffer-sized chunk at a time
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for chunk in data.chunks(N) {
            self.write(chunk)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        while !self.tx.is_empty() {
            core::hint::spin_loop();
        }
        Ok(())
    }
}

impl<'a, C: TxInterruptControl, const N: usize> UartRx for TransportHandle<'a, C, N> {
    type Error = TransportError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        for slot in buf.iter_mut() {
            *slot = loop {
                if let Some(byte) = self.rx.dequeue_byte() {
                    break byte;
                }
                core::hint::spin_loop();
            };
        }
        Ok(buf.len())
    }
}

impl<'a, C: TxInterruptControl, const N: usize> fmt::Write for TransportHandle<'a, C, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_blocking(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Interrupt-handler side of the transport
pub struct TransportIrq<'a, const N: usize = SERIAL_BUFFER_CAPACITY> {
    rx: Producer<'a, N>,
    tx: Consumer<'a, N>,
    stats: &'a StatCounters,
}

impl<'a, const N: usize> TransportIrq<'a, N> {
    /// Handle a "receive data ready" (or receive error) interrupt
    ///
    /// The data register is always read so the hardware ready flag clears.
    pub fn on_receive<P: SerialPeripheral>(&mut self, uart: &mut P) {
        let byte = uart.read_data();

        if uart.line_status().errors.any() {
            uart.clear_errors();
            StatCounters::bump(&self.stats.rx_line_errors);
            return;
        }

        if !self.rx.enqueue_byte(byte) {
            StatCounters::bump(&self.stats.rx_dropped);
        }
    }

    /// Handle a "transmit register empty" interrupt
    ///
    /// Sends the next queued byte, or switches the interrupt off once the
    /// outbound buffer is empty.
    pub fn on_transmit_ready<P: SerialPeripheral>(&mut self, uart: &mut P) {
        match self.tx.dequeue_byte() {
            Some(byte) => uart.write_data(byte),
            None => uart.set_tx_interrupt(false),
        }
    }

    /// Service a shared UART interrupt vector
    ///
    /// Runs the receive path and/or the transmit path depending on which
    /// conditions the peripheral reports.
    pub fn service<P: SerialPeripheral>(&mut self, uart: &mut P) {
        let status = uart.line_status();

        if status.rx_ready || status.errors.any() {
            self.on_receive(uart);
        }

        if status.tx_empty && uart.tx_interrupt_enabled() {
            self.on_transmit_ready(uart);
        }
    }

    /// Number of bytes waiting in the inbound buffer
    pub fn pending_input(&self) -> usize {
        self.rx.len()
    }
}
