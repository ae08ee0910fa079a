//! Jolt - Motion Indicator Firmware
//!
//! Main firmware binary for RP2040 boards with an MMA8451Q accelerometer
//! and an RGB LED. The LED switches to the target colour while the planar
//! acceleration is at or above the threshold; both can be changed over the
//! serial console on UART0.
//!
//! Execution model: one foreground loop plus two interrupt handlers
//! (UART0 for the serial transport, SysTick for the millisecond clock).
//! There is no executor.

#![no_std]
#![no_main]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::*;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt::typelevel::{Handler, Interrupt, UART0_IRQ};
use embassy_rp::interrupt::Priority;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{self, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use jolt_core::indicator::{Indicator, IndicatorError};
use jolt_core::transport::{SerialTransport, TransportIrq};
use jolt_drivers::accel::Mma8451q;
use jolt_drivers::led::{Polarity, RgbLed};
use jolt_hal::serial::{DataBits, Parity, StopBits};
use jolt_hal_rp2040::{Pl011, SysTickClock};

mod config;

bind_interrupts!(struct Irqs {
    UART0_IRQ => UartIrqHandler;
});

// Serial transport buffers (must live forever, shared with the UART handler)
static TRANSPORT: StaticCell<SerialTransport> = StaticCell::new();

/// Interrupt half of the transport, handed to the UART handler at startup
static UART_ISR: Mutex<RefCell<Option<(TransportIrq<'static>, Pl011)>>> =
    Mutex::new(RefCell::new(None));

/// UART0 interrupt: receive, transmit and line errors share one vector
struct UartIrqHandler;

impl Handler<UART0_IRQ> for UartIrqHandler {
    unsafe fn on_interrupt() {
        critical_section::with(|cs| {
            if let Some((irq, uart)) = UART_ISR.borrow_ref_mut(cs).as_mut() {
                irq.service(uart);
            }
        });
    }
}

#[cortex_m_rt::exception]
fn SysTick() {
    SysTickClock::on_tick();
}

/// Main entry point
#[cortex_m_rt::entry]
fn main() -> ! {
    info!("Jolt firmware starting...");

    let p = embassy_rp::init(Default::default());
    let core = unwrap!(cortex_m::Peripherals::take());
    info!("Peripherals initialized");

    let settings = config::settings();
    let line = config::uart();

    // Millisecond clock
    let clock = SysTickClock::start(core.SYST, embassy_rp::clocks::clk_sys_freq());

    // Console UART: embassy-rp sets up pins, baud rate and framing, the
    // transport then drives the PL011 registers from the interrupt handler
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = line.baudrate;
    uart_config.data_bits = match line.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    uart_config.parity = match line.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    uart_config.stop_bits = match line.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    let _uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    info!("UART0 configured: {} baud", line.baudrate);

    let mut pl011 = Pl011::uart0();
    pl011.configure_interrupts();

    let transport = TRANSPORT.init(SerialTransport::new());
    let (mut console, isr_half) = transport.split(pl011);
    critical_section::with(|cs| {
        UART_ISR.borrow_ref_mut(cs).replace((isr_half, pl011));
    });

    UART0_IRQ::set_priority(Priority::P2);
    UART0_IRQ::unpend();
    unsafe { UART0_IRQ::enable() };

    // Accelerometer on I2C0 (SDA GPIO4, SCL GPIO5)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let mut accel = Mma8451q::new(i2c);
    if let Err(e) = accel.init() {
        error!("MMA8451Q init failed: {}", e);
    } else {
        info!("MMA8451Q active");
    }

    // RGB LED (common anode) on GPIO16/17/18
    let (red, green) =
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_16, p.PIN_17, pwm::Config::default()).split();
    let (blue, _) = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, pwm::Config::default()).split();
    let led = unwrap!(RgbLed::new(
        unwrap!(red),
        unwrap!(green),
        unwrap!(blue),
        Polarity::ActiveLow,
    )
    .ok());

    let mut indicator = Indicator::new(accel, led, settings);
    if indicator.start(&clock).is_err() {
        warn!("LED init failed");
    }
    if indicator.print_banner(&mut console).is_err() {
        warn!("Banner not sent");
    }

    info!(
        "Indicator running: threshold {} milli-m/s^2",
        settings.threshold.as_milli()
    );

    let mut reported = console.stats();
    loop {
        match indicator.poll(&mut console, &clock) {
            Ok(()) => {}
            Err(IndicatorError::Sensor(e)) => warn!("Accelerometer read failed: {}", e),
            Err(IndicatorError::Led(_)) => warn!("LED update failed"),
            Err(IndicatorError::Output) => warn!("Console write failed"),
        }

        let stats = console.stats();
        if stats != reported {
            debug!("UART rx stats: {}", stats);
            reported = stats;
        }
    }
}
