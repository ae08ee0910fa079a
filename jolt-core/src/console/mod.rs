//! Serial command console
//!
//! Turns the inbound byte stream into commands and writes echo, replies and
//! diagnostics to the outbound stream. Everything runs in the foreground.

pub mod command;
pub mod line;

use core::fmt;

pub use command::{Channel, Command, CommandError, MAX_TOKENS};
pub use line::{LineEditor, MAX_LINE_LEN};

use crate::config::Settings;

/// Prompt printed before each command line
pub const PROMPT: &str = "> ";

/// Line editor plus command dispatch
#[derive(Debug, Default)]
pub struct Console {
    editor: LineEditor,
}

impl Console {
    pub const fn new() -> Self {
        Self {
            editor: LineEditor::new(),
        }
    }

    /// Handle one received byte
    ///
    /// While periodic printing is active the byte only stops it and a fresh
    /// prompt is shown.
    pub fn feed<W: fmt::Write>(
        &mut self,
        byte: u8,
        settings: &mut Settings,
        out: &mut W,
    ) -> fmt::Result {
        if settings.print_enabled {
            settings.print_enabled = false;
            out.write_str("\n\r")?;
            return out.write_str(PROMPT);
        }

        if let Some(line) = self.editor.feed(byte, out)? {
            execute(&line, settings, out)?;
            out.write_str(PROMPT)?;
        }
        Ok(())
    }
}

/// Parse and run one command line, writing the reply or diagnostic
pub fn execute<W: fmt::Write>(line: &str, settings: &mut Settings, out: &mut W) -> fmt::Result {
    match Command::parse(line) {
        Ok(Some(command)) => {
            command.apply(settings);
            command.write_reply(out)
        }
        Ok(None) => Ok(()),
        Err(err) => write!(out, "{}\n\r", err),
    }
}
