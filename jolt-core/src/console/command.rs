//! Console command parsing
//!
//! A command line is split on whitespace; the first token selects the
//! command (case-insensitive), the rest are its arguments.
//!
//! | Command                  | Effect                               |
//! |--------------------------|--------------------------------------|
//! | `color <r> <g> <b>`      | Set the target colour (0..=255 each) |
//! | `acceleration <m/s^2>`   | Set the acceleration threshold       |
//! | `print`                  | Start periodic acceleration reports  |

use core::fmt;

use heapless::Vec;

use crate::config::Settings;
use crate::traits::{Acceleration, Rgb};

/// Maximum number of tokens considered on one line
pub const MAX_TOKENS: usize = 10;

/// Largest whole threshold in m/s^2 that fits the milli-m/s^2 representation
const MAX_THRESHOLD_M_S2: u32 = u32::MAX / 1000;

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set the colour shown when the threshold is reached
    Color(Rgb),
    /// Set the acceleration threshold
    Acceleration(Acceleration),
    /// Enable periodic acceleration printing
    Print,
}

/// Colour channel named in a colour argument error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    R,
    G,
    B,
}

impl Channel {
    fn name(self) -> char {
        match self {
            Channel::R => 'r',
            Channel::G => 'g',
            Channel::B => 'b',
        }
    }
}

/// Reasons a command line is rejected
///
/// `Display` renders the user-facing diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError<'a> {
    /// First token is not a known command
    Unknown(&'a str),
    /// `color` without exactly three arguments
    ColorArgCount,
    /// Colour argument is not an integer
    ColorNotNumber(Channel),
    /// Colour argument outside 0..=255
    ColorOutOfRange(Channel),
    /// `acceleration` without exactly one argument
    AccelerationArgCount,
    /// Acceleration argument is not a number
    AccelerationNotNumber,
    /// Acceleration argument is negative
    AccelerationNegative,
    /// Acceleration argument does not fit the fixed-point threshold
    AccelerationOutOfRange,
    /// `print` with arguments
    PrintArgCount,
}

impl fmt::Display for CommandError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "Unknown command: {}", name),
            CommandError::ColorArgCount => f.write_str(
                "Invalid input: The color command requires r, g, and b arguments\n\r\
                 E.g. color 0 255 150",
            ),
            CommandError::ColorNotNumber(channel) => write!(
                f,
                "Invalid argument: Check for correctness of the {} argument\n\r\
                 Example: color 0 255 150",
                channel.name()
            ),
            CommandError::ColorOutOfRange(channel) => write!(
                f,
                "Invalid argument: The {} argument must be greater than or equal to zero \
                 and less than or equal to 255",
                channel.name()
            ),
            CommandError::AccelerationArgCount => f.write_str(
                "Invalid argument: The acceleration command requires target acceleration argument\n\r\
                 E.g. acceleration <target acceleration value in m/s^2>",
            ),
            CommandError::AccelerationNotNumber => f.write_str(
                "Invalid argument: Check for correctness of the target acceleration argument\n\r\
                 Example: acceleration 10.2",
            ),
            CommandError::AccelerationNegative => f.write_str(
                "Invalid argument: The target acceleration argument must be greater than or equal to zero",
            ),
            CommandError::AccelerationOutOfRange => write!(
                f,
                "Invalid argument: The target acceleration argument must be less than or equal to {}",
                MAX_THRESHOLD_M_S2
            ),
            CommandError::PrintArgCount => {
                f.write_str("Invalid argument: The print command does not take any arguments")
            }
        }
    }
}

impl Command {
    /// Parse one command line
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError<'_>> {
        let mut tokens: Vec<&str, MAX_TOKENS> = Vec::new();
        let mut argc = 0usize;
        for token in line.split_whitespace() {
            // Tokens past the limit still count toward the argument count
            let _ = tokens.push(token);
            argc += 1;
        }

        let Some(&name) = tokens.first() else {
            return Ok(None);
        };
        let args = &tokens[1..];

        if name.eq_ignore_ascii_case("color") {
            if argc != 4 {
                return Err(CommandError::ColorArgCount);
            }
            let r = parse_channel(args[0], Channel::R)?;
            let g = parse_channel(args[1], Channel::G)?;
            let b = parse_channel(args[2], Channel::B)?;
            Ok(Some(Command::Color(Rgb::new(r, g, b))))
        } else if name.eq_ignore_ascii_case("acceleration") {
            if argc != 2 {
                return Err(CommandError::AccelerationArgCount);
            }
            let value: f32 = args[0]
                .parse()
                .map_err(|_| CommandError::AccelerationNotNumber)?;
            // `inf` and `nan` parse as floats but are not numbers here
            if !value.is_finite() && is_named_float(args[0]) {
                return Err(CommandError::AccelerationNotNumber);
            }
            if value < 0.0 {
                return Err(CommandError::AccelerationNegative);
            }
            let threshold =
                Acceleration::parse(args[0]).ok_or(CommandError::AccelerationOutOfRange)?;
            Ok(Some(Command::Acceleration(threshold)))
        } else if name.eq_ignore_ascii_case("print") {
            if argc != 1 {
                return Err(CommandError::PrintArgCount);
            }
            Ok(Some(Command::Print))
        } else {
            Err(CommandError::Unknown(name))
        }
    }

    /// Apply the command to the settings
    pub fn apply(&self, settings: &mut Settings) {
        match *self {
            Command::Color(color) => settings.target = color,
            Command::Acceleration(threshold) => settings.threshold = threshold,
            Command::Print => settings.print_enabled = true,
        }
    }

    /// Write the acknowledgement for an applied command
    pub fn write_reply<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match *self {
            Command::Color(Rgb { r, g, b }) => {
                write!(out, "Target color set to r={}, g={}, b={}\n\r", r, g, b)
            }
            Command::Acceleration(threshold) => {
                write!(out, "Target acceleration set to {} m/s^2\n\r", threshold)
            }
            Command::Print => Ok(()),
        }
    }
}

fn is_named_float(text: &str) -> bool {
    text.trim_start_matches(['+', '-'])
        .starts_with(|c: char| c.is_ascii_alphabetic())
}

fn parse_channel(text: &str, channel: Channel) -> Result<u8, CommandError<'static>> {
    let value: i32 = text
        .parse()
        .map_err(|_| CommandError::ColorNotNumber(channel))?;
    u8::try_from(value).map_err(|_| CommandError::ColorOutOfRange(channel))
}
