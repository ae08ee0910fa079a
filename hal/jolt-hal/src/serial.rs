//! Serial communication abstractions
//!
//! Two layers live here:
//!
//! - A register-level view of a UART ([`SerialPeripheral`]) used from the
//!   UART interrupt handler, plus the narrow [`TxInterruptControl`] switch the
//!   foreground needs to start transmission.
//! - Stream traits ([`UartTx`], [`UartRx`]) implemented by buffered
//!   transports on top of those registers.

/// Receive error conditions reported by the peripheral
///
/// Any set flag means the byte currently in the data register is not
/// trustworthy and must be discarded after the flags are acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineErrors {
    /// A byte arrived before the previous one was read
    pub overrun: bool,
    /// Noise detected on the line while sampling
    pub noise: bool,
    /// Stop bit missing
    pub framing: bool,
    /// Parity mismatch
    pub parity: bool,
}

impl LineErrors {
    /// No error flags set
    pub const NONE: Self = Self {
        overrun: false,
        noise: false,
        framing: false,
        parity: false,
    };

    /// Check if any error flag is set
    pub fn any(&self) -> bool {
        self.overrun || self.noise || self.framing || self.parity
    }
}

/// Snapshot of the peripheral status register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineStatus {
    /// Receive data register holds a byte
    pub rx_ready: bool,
    /// Transmit data register can accept a byte
    pub tx_empty: bool,
    /// Receive error flags
    pub errors: LineErrors,
}

/// Register-level UART access from interrupt context
///
/// Implementations map these calls onto the data, status and control
/// registers of a specific chip. Reading the data register is expected to
/// clear the hardware "receive ready" condition.
pub trait SerialPeripheral {
    /// Read the current status flags
    fn line_status(&mut self) -> LineStatus;

    /// Read one byte from the receive data register
    fn read_data(&mut self) -> u8;

    /// Write one byte to the transmit data register
    fn write_data(&mut self, byte: u8);

    /// Acknowledge all receive error flags
    fn clear_errors(&mut self);

    /// Check if the "transmit register empty" interrupt is enabled
    fn tx_interrupt_enabled(&mut self) -> bool;

    /// Enable or disable the "transmit register empty" interrupt
    fn set_tx_interrupt(&mut self, enabled: bool);
}

/// Foreground control of the transmit interrupt
///
/// The foreground only ever needs to know whether transmission is running
/// and to start it. Stopping is left to the interrupt handler.
pub trait TxInterruptControl {
    /// Check if the "transmit register empty" interrupt is enabled
    fn tx_interrupt_enabled(&mut self) -> bool;

    /// Enable the "transmit register empty" interrupt
    fn enable_tx_interrupt(&mut self);
}

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been accepted or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until every queued byte has been handed to the hardware
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Blocks until the buffer is filled or an error occurs.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_blocking(&mut buf)?;
        Ok(buf[0])
    }
}

/// UART line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 38_400,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::Two,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
