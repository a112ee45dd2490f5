use crate::workflow::input::{StepInput, TleAnswer};
use anyhow::{bail, Context};
use launchcore::mission::{AltitudeField, OrbitType, RocketOption, TimestampWindow};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Interactive terminal prompts. A rejected answer asks the same step again.
pub struct PromptInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("reading answer from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.writer, "{prompt}: ")?;
        self.writer.flush()?;
        match self.read_line()? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("input closed while waiting for {prompt}"),
        }
    }

    /// Reads pasted lines up to the first blank line or end of input.
    fn read_block(&mut self) -> anyhow::Result<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

impl<R: BufRead, W: Write> StepInput for PromptInput<R, W> {
    fn tle(&mut self) -> anyhow::Result<TleAnswer> {
        let source = self.ask("TLE source ([f]ile or [p]aste)")?;
        if source.eq_ignore_ascii_case("p") || source.eq_ignore_ascii_case("paste") {
            writeln!(self.writer, "Paste TLE lines, finish with an empty line:")?;
            return Ok(TleAnswer::Text(self.read_block()?));
        }
        let path = self.ask("Path to TLE .txt file")?;
        Ok(TleAnswer::File(PathBuf::from(path)))
    }

    fn timestamp(&mut self, window: &TimestampWindow) -> anyhow::Result<String> {
        writeln!(self.writer, "Valid range: {window}")?;
        self.ask("Launch timestamp (YYYY/MM/DD HH:MM:SS)")
    }

    fn orbit(&mut self) -> anyhow::Result<String> {
        writeln!(self.writer, "Orbit types:")?;
        for orbit in OrbitType::ALL {
            let field = AltitudeField::for_orbit(orbit);
            writeln!(self.writer, "  {} - {} ({})", orbit, orbit.name(), field.hint())?;
        }
        self.ask("Orbit type")
    }

    fn altitude(&mut self, field: &AltitudeField) -> anyhow::Result<String> {
        writeln!(self.writer, "{}", field.hint())?;
        self.ask("Target altitude (km)")
    }

    fn rocket(&mut self, options: &[RocketOption]) -> anyhow::Result<String> {
        writeln!(self.writer, "Available rockets:")?;
        for (idx, rocket) in options.iter().enumerate() {
            writeln!(self.writer, "  [{idx}] {}", rocket.label())?;
        }
        self.ask("Rocket #")
    }

    fn debris_count(&mut self) -> anyhow::Result<String> {
        self.ask("Debris objects to generate (5-100)")
    }

    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.writer, "!! {message}");
    }

    fn retries(&self) -> bool {
        true
    }
}
