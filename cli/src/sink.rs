use crate::date::LastUpdated;

/// A place the rendered text is written to
///
/// Every write replaces whatever the sink showed before, so writing the same text twice
/// leaves it in the same state as writing it once.
pub trait Sink {
    fn write(&mut self, text: &str) -> eyre::Result<()>;

    /// Format the date and write it
    fn render(&mut self, date: &LastUpdated) -> eyre::Result<()> {
        self.write(&date.to_string())
    }
}

/// Any closure taking the text is a sink
impl<F> Sink for F
where
    F: FnMut(&str) -> eyre::Result<()>,
{
    fn write(&mut self, text: &str) -> eyre::Result<()> {
        self(text)
    }
}
