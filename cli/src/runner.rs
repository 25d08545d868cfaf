use crate::api::client::Client;
use crate::error::Error;
use std::error::Error as StdError;

pub(crate) trait Runner {
    /// Construct the API client instance
    ///
    /// Requests are anonymous so this only fails if the HTTP stack can't be set up.
    /// Without a base the public API is used.
    fn api_client(&self, api_base: Option<&str>) -> Result<Client, Error> {
        api_base.map_or_else(Client::public, Client::new).map_err(|e| {
            self.error(
                Some("Could not initialize HTTP client"),
                Some("Check the TLS setup of this machine."),
                Some(e.into()),
            )
        })
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    async fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new(
                "Failed to run the command",
                Some("Run again with RUST_LOG=info to see what happened."),
            )
        }
    }

    /// A shortcut to display a failed API call
    fn server_error(&self, origin: Option<Box<dyn StdError>>) -> Error {
        self.error(Some("Server error"), Some("Try again later."), origin)
    }
}

/// Return a runner for a command
///
/// Ideally this should be a macro
pub(crate) trait Runnable {
    fn runner(&self) -> impl Runner;
}
