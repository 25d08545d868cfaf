use crate::config::build_config;
use crate::error::Error;
use crate::fetcher::{DuplicatePolicy, FetchError, RepositoryDateFetcher};
use crate::html::{HtmlDocument, Selector};
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use crate::sink::Sink;
use crate::writer::Writer;
use reqwest::StatusCode;
use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug, Default)]
pub struct RenderCommand {
    /// Account whose repositories are listed
    #[arg(short, long)]
    user: Option<String>,

    /// Repository to report the date for
    #[arg(short, long)]
    repo: Option<String>,

    /// HTML page to write the date into, instead of stdout
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Elements of the page receiving the date: `.class`, `#id` or a tag name
    #[arg(short, long, requires = "html")]
    selector: Option<String>,

    /// Print `{"text": ...}` instead of plain text
    #[arg(long, conflicts_with = "html")]
    json: bool,

    /// Fail if several repositories carry the name instead of using the last one
    #[arg(long)]
    strict: bool,

    #[arg(long, hide = true)]
    api_base: Option<String>,
}

/// Flags with the built-in defaults filled in
#[derive(Debug, PartialEq)]
pub(crate) struct Settings<'a> {
    pub(crate) user: &'a str,
    pub(crate) repository: &'a str,
    pub(crate) selector: &'a str,

    /// `None` means the public API
    pub(crate) api_base: Option<&'a str>,

    pub(crate) policy: DuplicatePolicy,
}

impl RenderCommand {
    pub(crate) fn settings(&self) -> Settings<'_> {
        let config = build_config();

        Settings {
            user: self.user.as_deref().unwrap_or(config.user),
            repository: self.repo.as_deref().unwrap_or(config.repository),
            selector: self.selector.as_deref().unwrap_or(config.selector),
            api_base: self.api_base.as_deref(),
            policy: if self.strict {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::LastWins
            },
        }
    }
}

impl Runnable for RenderCommand {
    fn runner(&self) -> impl Runner {
        RenderRunner {
            command: self.clone(),
        }
    }
}

struct RenderRunner {
    command: RenderCommand,
}

impl RenderRunner {
    /// Resolve where the date goes, failing before any request is made
    fn sink(&self) -> Result<Box<dyn Sink>, Error> {
        let Some(path) = &self.command.html else {
            return Ok(Box::new(Writer::new(self.command.json)));
        };

        let selector = self
            .command
            .settings()
            .selector
            .parse::<Selector>()
            .map_err(|e| {
                self.error(
                    Some("Invalid selector"),
                    Some("Use .class, #id or a tag name."),
                    Some(e.into()),
                )
            })?;

        if !path.is_file() {
            return Err(self.error(
                Some("Page not found"),
                Some(&format!("{} is not a file.", path.display())),
                None,
            ));
        }

        Ok(Box::new(HtmlDocument::new(path, selector)))
    }

    /// The error shown to the user for a failed fetch
    fn fetch_error(&self, error: FetchError, user: &str) -> Error {
        match error {
            FetchError::Status(status) if status == StatusCode::NOT_FOUND => self.error(
                Some("User not found"),
                Some(&format!("There is no account named {user}.")),
                None,
            ),

            FetchError::Ambiguous { name, count } => self.error(
                Some(&format!("{count} repositories are named {name}")),
                Some("Run without --strict to use the last one."),
                None,
            ),

            e @ (FetchError::Status(_) | FetchError::Transport { .. }) => {
                self.server_error(Some(Box::new(e)))
            }

            e => self.error(
                Some("Invalid response from server"),
                Some("Try again later."),
                Some(Box::new(e)),
            ),
        }
    }
}

impl Runner for RenderRunner {
    /// Fetches the listing and writes the date of the repository into the target
    ///
    /// The target is left as is when the repository is not in the listing.
    async fn run(&mut self) -> Result<(), Error> {
        let settings = self.command.settings();
        let mut sink = self.sink()?;

        let fetcher = RepositoryDateFetcher::new(
            self.api_client(settings.api_base)?,
            settings.user,
            settings.repository,
        )
        .with_policy(settings.policy);

        let spinner = Logger::spinner(&format!("Fetching repositories of {}", settings.user));
        let rendered = fetcher.render(&mut *sink).await;
        spinner.finish_and_clear();

        match rendered {
            Ok(true) => Ok(()),

            Ok(false) => {
                log::info!(
                    "{} is not listed for {}, nothing to render",
                    settings.repository,
                    settings.user
                );

                Ok(())
            }

            Err(report) => Err(match report.downcast::<FetchError>() {
                Ok(error) => self.fetch_error(error, settings.user),
                Err(report) => {
                    self.error(Some("Could not write the date"), None, Some(report.into()))
                }
            }),
        }
    }
}
