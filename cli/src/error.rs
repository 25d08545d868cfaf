/// Display global error message in unified format
#[derive(Debug, PartialEq)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.1 {
            Some(details) => write!(f, "{}\n\n{}", self.0, console::style(details).dim()),
            None => write!(f, "{}", self.0),
        }
    }
}

impl std::error::Error for Error {}

/// Keep the user facing error if the report wraps one, otherwise use the report message
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        log::error!("{error:?}");

        error
            .downcast::<Error>()
            .unwrap_or_else(|err| Error::new(&err.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn report_keeps_wrapped_user_error() {
        let report = Err::<(), _>(eyre::eyre!("socket closed"))
            .wrap_err(Error::new("Network request failed", Some("Try again.")))
            .unwrap_err();

        assert_eq!(
            Error::from(report),
            Error::new("Network request failed", Some("Try again."))
        );
    }

    #[test]
    fn plain_report_becomes_message() {
        let error = Error::from(eyre::eyre!("Could not parse"));
        assert_eq!(error.message(), "Could not parse");
        assert_eq!(error.to_string(), "Could not parse");
    }
}
