//! PL011 UART register view
//!
//! The RP2040 UARTs are ARM PL011 cells. For byte-at-a-time interrupt
//! operation the FIFOs are disabled, so:
//!
//! - RX interrupt: the single receive holding register is full
//! - TX interrupt: the single transmit holding register is empty
//!
//! The PL011 raises its TX interrupt on the empty *transition* only. If the
//! holding register is already empty when TXIM is enabled no interrupt
//! arrives, so enabling from the foreground also pends the NVIC line to get
//! the first byte out.
//!
//! Receive errors are latched in UARTRSR when the data register is read and
//! are cleared by writing UARTRSR plus the matching UARTICR bits.

use embassy_rp::interrupt::{Interrupt, InterruptExt};
use embassy_rp::pac;
use jolt_hal::{LineErrors, LineStatus, SerialPeripheral, TxInterruptControl};

/// Register-level handle to one PL011 UART
///
/// Cheap to copy: both the interrupt handler and the foreground hold one.
#[derive(Clone, Copy)]
pub struct Pl011 {
    regs: pac::uart::Uart,
    irq: Interrupt,
}

impl Pl011 {
    /// UART0 (interrupt `UART0_IRQ`)
    pub fn uart0() -> Self {
        Self {
            regs: pac::UART0,
            irq: Interrupt::UART0_IRQ,
        }
    }

    /// Switch to single-byte operation and unmask the receive interrupts
    ///
    /// Call after the UART has been configured (baud rate, framing) and
    /// before the NVIC line is enabled.
    pub fn configure_interrupts(&mut self) {
        self.regs.uartlcr_h().modify(|w| w.set_fen(false));
        self.clear_errors();
        self.regs.uarticr().write(|w| {
            w.set_rxic(true);
            w.set_txic(true);
            w.set_rtic(true);
        });
        self.regs.uartimsc().write(|w| {
            w.set_rxim(true);
            w.set_oeim(true);
            w.set_beim(true);
            w.set_peim(true);
            w.set_feim(true);
        });
    }
}

impl SerialPeripheral for Pl011 {
    fn line_status(&mut self) -> LineStatus {
        let fr = self.regs.uartfr().read();
        let rsr = self.regs.uartrsr().read();

        LineStatus {
            rx_ready: !fr.rxfe(),
            tx_empty: !fr.txff(),
            errors: LineErrors {
                overrun: rsr.oe(),
                // PL011 has no noise flag; a break is the closest line fault
                noise: rsr.be(),
                framing: rsr.fe(),
                parity: rsr.pe(),
            },
        }
    }

    fn read_data(&mut self) -> u8 {
        self.regs.uartdr().read().data()
    }

    fn write_data(&mut self, byte: u8) {
        self.regs.uartdr().write(|w| w.set_data(byte));
    }

    fn clear_errors(&mut self) {
        self.regs.uartrsr().write(|_| ());
        self.regs.uarticr().write(|w| {
            w.set_oeic(true);
            w.set_beic(true);
            w.set_peic(true);
            w.set_feic(true);
        });
    }

    fn tx_interrupt_enabled(&mut self) -> bool {
        self.regs.uartimsc().read().txim()
    }

    fn set_tx_interrupt(&mut self, enabled: bool) {
        self.regs.uartimsc().modify(|w| w.set_txim(enabled));
    }
}

impl TxInterruptControl for Pl011 {
    fn tx_interrupt_enabled(&mut self) -> bool {
        SerialPeripheral::tx_interrupt_enabled(self)
    }

    fn enable_tx_interrupt(&mut self) {
        self.set_tx_interrupt(true);
        self.irq.pend();
    }
}
