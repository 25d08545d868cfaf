use crate::error::Error;
use crate::sink::Sink;
use std::io::Write;

/// Write the rendered output to stdout
///
/// In either plain text mode or structured (e.g. JSON).
#[derive(Default)]
pub struct Writer {
    is_structured: bool,
}

impl Writer {
    pub fn new(is_structured: bool) -> Self {
        Writer { is_structured }
    }

    /// Output plain text
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in structured mode.
    pub fn text(&self, output: &str) -> Result<(), Error> {
        if self.is_structured {
            log::warn!("Skipping output (not structured data): {output}");
            return Ok(());
        }

        self.stdout(output)
    }

    /// Output serialized JSON, one value per line
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in plain text mode.
    pub fn json(&self, output: serde_json::Value) -> Result<(), Error> {
        if !self.is_structured {
            log::warn!("Skipping output (not plain text): {output}");
            return Ok(());
        }

        self.stdout(&format!("{output}\n"))
    }

    fn stdout(&self, output: &str) -> Result<(), Error> {
        std::io::stdout()
            .write_all(output.as_bytes())
            .map_err(|e| {
                log::error!("Error while writing to stdout: {e:?}");
                Error::new("Output error", Some("Check that stdout is not closed."))
            })
    }
}

/// The terminal can't replace what it printed, every write is a new line
impl Sink for Writer {
    fn write(&mut self, text: &str) -> eyre::Result<()> {
        if self.is_structured {
            self.json(serde_json::json!({ "text": text }))?;
        } else {
            self.text(&format!("{text}\n"))?;
        }

        Ok(())
    }
}
