use crate::config::build_config;
use eyre::WrapErr;

/// HTTP client bound to one API base
///
/// Requests are anonymous, the only header added is the user agent.
#[derive(Clone)]
pub struct Client {
    api_base: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(api_base: &str) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(build_config().user_agent)
            .build()
            .inspect_err(|e| log::error!("Failed to build HTTP client: {e:?}"))
            .wrap_err("Could not initialize HTTP client")?;

        Ok(Client {
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Client for the public API configured at build time
    pub fn public() -> eyre::Result<Self> {
        Self::new(build_config().api_base)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// A plain GET request, no query and no auth
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }
}
