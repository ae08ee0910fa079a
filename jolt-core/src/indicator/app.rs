//! Foreground loop of the indicator
//!
//! Each [`Indicator::poll`] does one of two things:
//!
//! - a byte is waiting on the console: feed it to the line editor
//! - otherwise: sample the accelerometer, update the LED and, when periodic
//!   reporting is on and due, print the reading

use core::fmt::{self, Write};

use jolt_hal::{Clock, TxInterruptControl};

use super::detector::{select_color, ReportTimer};
use crate::config::Settings;
use crate::console::{Console, PROMPT};
use crate::traits::{Acceleration, Accelerometer, ColorOutput, Rgb};
use crate::transport::TransportHandle;

const RULE: &str = "------------------------------------------------\n\r";

/// Errors surfaced by one foreground iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorError<SE, LE> {
    /// Accelerometer read failed
    Sensor(SE),
    /// LED update failed
    Led(LE),
    /// Console output could not be written
    Output,
}

impl<SE, LE> From<fmt::Error> for IndicatorError<SE, LE> {
    fn from(_: fmt::Error) -> Self {
        IndicatorError::Output
    }
}

/// Accelerometer-driven colour indicator with a serial console
pub struct Indicator<A, L> {
    sensor: A,
    led: L,
    settings: Settings,
    console: Console,
    report: ReportTimer,
    /// Colour currently on the LED, `None` before the first update
    shown: Option<Rgb>,
    last_reading: Acceleration,
}

impl<A, L> Indicator<A, L>
where
    A: Accelerometer,
    L: ColorOutput,
{
    /// Create an indicator with the given startup settings
    pub fn new(sensor: A, led: L, settings: Settings) -> Self {
        Self {
            sensor,
            led,
            settings,
            console: Console::new(),
            report: ReportTimer::default(),
            shown: None,
            last_reading: Acceleration::ZERO,
        }
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Most recent accelerometer reading
    pub fn last_reading(&self) -> Acceleration {
        self.last_reading
    }

    /// Write the startup banner followed by the first prompt
    pub fn print_banner<W: Write>(&self, out: &mut W) -> fmt::Result {
        let Rgb { r, g, b } = self.settings.target;

        out.write_str("\n\r")?;
        out.write_str(RULE)?;
        out.write_str("Acceleration Detector Command Terminal\n\r")?;
        out.write_str(RULE)?;
        out.write_str("GENERAL INFO\n\r")?;
        out.write_str("Place the board flat on a surface. Move the board while keeping it flat.\n\r")?;
        out.write_str("If you reach the target acceleration, then the RGB LED will change colors!\n\r")?;
        out.write_str("Keep the board flat and not rotated, otherwise gravity will distort\n\r")?;
        out.write_str("the acceleration measurements.\n\r")?;
        out.write_str("COMMAND INFO\n\r")?;
        out.write_str("Command to set target color         : color <r> <g> <b>\n\r")?;
        out.write_str("Command to set target acceleration  : acceleration <target acceleration>\n\r")?;
        out.write_str("Command to print acceleration values: print\n\r")?;
        out.write_str("DEFAULT VALUES\n\r")?;
        write!(out, "Default target color r={}, g={}, b={}\n\r", r, g, b)?;
        write!(
            out,
            "Default target acceleration = {} m/s^2\n\r",
            self.settings.threshold
        )?;
        out.write_str(RULE)?;
        out.write_str("\n\r")?;
        out.write_str(PROMPT)
    }

    /// Show the idle colour and start the report interval
    pub fn start<K: Clock>(&mut self, clock: &K) -> Result<(), IndicatorError<A::Error, L::Error>> {
        self.report.reset(clock.now_ms());
        self.show(self.settings.idle)
    }

    /// Run one foreground iteration against the serial transport
    pub fn poll<C, K, const N: usize>(
        &mut self,
        io: &mut TransportHandle<'_, C, N>,
        clock: &K,
    ) -> Result<(), IndicatorError<A::Error, L::Error>>
    where
        C: TxInterruptControl,
        K: Clock,
    {
        let input = io.read_one();
        self.step(input, io, clock.now_ms())
    }

    /// Run one foreground iteration with an already-read input byte
    pub fn step<W: Write>(
        &mut self,
        input: Option<u8>,
        out: &mut W,
        now_ms: u32,
    ) -> Result<(), IndicatorError<A::Error, L::Error>> {
        if let Some(byte) = input {
            self.console.feed(byte, &mut self.settings, out)?;
            return Ok(());
        }

        let reading = self
            .sensor
            .read_acceleration()
            .map_err(IndicatorError::Sensor)?;
        self.last_reading = reading;

        if self.settings.print_enabled
            && self.report.is_due(now_ms, self.settings.report_interval_ms)
        {
            write!(out, "acceleration = {} m/s^2\n\r", reading)?;
            self.report.reset(now_ms);
        }

        self.show(select_color(reading, &self.settings))
    }

    fn show(&mut self, color: Rgb) -> Result<(), IndicatorError<A::Error, L::Error>> {
        if self.shown != Some(color) {
            self.led.set_color(color).map_err(IndicatorError::Led)?;
            self.shown = Some(color);
        }
        Ok(())
    }
}
