use crate::api::client::Client;
use crate::api::repos::{self, RepositoryRecord};
use crate::date::LastUpdated;
use crate::sink::Sink;
use reqwest::StatusCode;

/// Why no date could be obtained
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Repository listing returned status {0}")]
    Status(StatusCode),

    #[error("Could not parse repository listing")]
    Parse(#[from] serde_json::Error),

    #[error("Repository {name} has invalid updated_at {value:?}")]
    Timestamp {
        name: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{count} repositories are named {name}")]
    Ambiguous { name: String, count: usize },
}

/// What to do when several records carry the target name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The last record in listing order is used, a warning is logged
    #[default]
    LastWins,

    /// Fail with [`FetchError::Ambiguous`]
    Reject,
}

/// Fetches the repository listing of a user and finds the update date of one repository
pub struct RepositoryDateFetcher {
    client: Client,
    user: String,
    repository: String,
    policy: DuplicatePolicy,
}

impl RepositoryDateFetcher {
    pub fn new(client: Client, user: &str, repository: &str) -> Self {
        Self {
            client,
            user: user.to_string(),
            repository: repository.to_string(),
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Request the first page of the listing
    ///
    /// Anything but 200 is a failure, the body is not looked at in that case.
    pub async fn listing(&self) -> Result<repos::Response, FetchError> {
        let path = repos::path(&self.user);
        let url = self.client.url(&path);

        let transport = |source| FetchError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&path)
            .send()
            .await
            .inspect_err(|e| log::error!("Request to {url} failed: {e:?}"))
            .map_err(transport)?;

        let status = response.status();
        log::info!("Got status from {path}: {status}");

        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let text = response.text().await.map_err(transport)?;
        log::debug!("Got response from {path}: {text}");

        Ok(serde_json::from_str(&text)
            .inspect_err(|e| log::error!("Could not parse repository listing: {e:?}"))?)
    }

    /// Pick the record of the target repository out of a listing
    ///
    /// `Ok(None)` when there is no such repository.
    pub fn select<'a>(
        &self,
        records: &'a [RepositoryRecord],
    ) -> Result<Option<&'a RepositoryRecord>, FetchError> {
        let matches: Vec<&RepositoryRecord> = records
            .iter()
            .filter(|record| record.name == self.repository)
            .collect();

        if matches.len() > 1 {
            if self.policy == DuplicatePolicy::Reject {
                return Err(FetchError::Ambiguous {
                    name: self.repository.clone(),
                    count: matches.len(),
                });
            }

            log::warn!(
                "{} repositories named {}, using the last one",
                matches.len(),
                self.repository
            );
        }

        Ok(matches.last().copied())
    }

    /// The date of the selected record
    pub fn date(&self, records: &[RepositoryRecord]) -> Result<Option<LastUpdated>, FetchError> {
        let Some(record) = self.select(records)? else {
            log::info!("No repository named {} in the listing", self.repository);
            return Ok(None);
        };

        LastUpdated::parse(&record.updated_at)
            .map(Some)
            .map_err(|source| FetchError::Timestamp {
                name: record.name.clone(),
                value: record.updated_at.clone(),
                source,
            })
    }

    /// Fetch the listing and find the date of the target repository
    pub async fn fetch(&self) -> Result<Option<LastUpdated>, FetchError> {
        let records = self.listing().await?;
        self.date(&records)
    }

    /// Fetch and write the date into the sink
    ///
    /// Nothing is written on failure or when the repository is not listed.
    /// Returns whether the sink was written to.
    pub async fn render<S>(&self, sink: &mut S) -> eyre::Result<bool>
    where
        S: Sink + ?Sized,
    {
        match self.fetch().await? {
            Some(date) => {
                sink.render(&date)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
