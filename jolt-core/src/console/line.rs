//! Line accumulation with echo

use core::fmt;

use heapless::String;

/// Longest line the editor will hold
pub const MAX_LINE_LEN: usize = 255;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// Accumulates received bytes into a command line
///
/// Echoes accepted characters back to the terminal and handles backspace.
#[derive(Debug, Default)]
pub struct LineEditor {
    line: String<MAX_LINE_LEN>,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            line: String::new(),
        }
    }

    /// Feed one received byte
    ///
    /// Returns the completed line when `byte` is a carriage return.
    pub fn feed<W: fmt::Write>(
        &mut self,
        byte: u8,
        echo: &mut W,
    ) -> Result<Option<String<MAX_LINE_LEN>>, fmt::Error> {
        match byte {
            b'\r' => {
                echo.write_str("\n\r")?;
                Ok(Some(core::mem::take(&mut self.line)))
            }
            BACKSPACE | DELETE => {
                if self.line.pop().is_some() {
                    echo.write_str("\x08 \x08")?;
                }
                Ok(None)
            }
            _ if byte.is_ascii() => {
                let c = byte as char;
                if self.line.push(c).is_ok() {
                    echo.write_char(c)?;
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Characters accumulated so far
    pub fn as_str(&self) -> &str {
        &self.line
    }
}
