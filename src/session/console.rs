use std::io::{BufRead, Write};
use std::num::IntErrorKind;

use crate::error::{Error, Result};

/// Line-oriented prompt/response over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }

    /// Print `prompt` and read one line without its terminator.
    /// `None` means the input is closed.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt)?.ok_or(Error::InputClosed)
    }

    /// Ask for an integer. Anything that is not an integer is fatal.
    ///
    /// Integers too large for `i64` come back as `None`.
    pub fn ask_number(&mut self, prompt: &str) -> Result<Option<i64>> {
        let answer = self.ask(prompt)?;
        match answer.trim().parse::<i64>() {
            Ok(number) => Ok(Some(number)),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Ok(None)
            }
            Err(_) => {
                tracing::warn!(input = %answer, "Unparsable number");
                Err(Error::InvalidNumber { input: answer })
            }
        }
    }

    /// Ask for a 1-based position in a list of `len` items.
    /// Returns the 0-based index, or `None` when out of range.
    pub fn ask_position(&mut self, prompt: &str, len: usize) -> Result<Option<usize>> {
        let number = self.ask_number(prompt)?;
        Ok(number
            .and_then(|n| usize::try_from(n).ok())
            .and_then(|n| n.checked_sub(1))
            .filter(|index| *index < len))
    }
}
