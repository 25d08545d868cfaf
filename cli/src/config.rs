/// Built-in settings of the tool
///
/// Nothing is read from the environment or from disk, every value here can only be
/// overridden with a command line flag.
#[derive(Debug)]
pub struct Config<'a> {
    /// Base URL of the repository-listing API, without trailing slash
    pub api_base: &'a str,

    /// The account whose repositories are listed
    pub user: &'a str,

    /// Name of the repository to report the date for
    pub repository: &'a str,

    /// Where the rendered date goes when writing into an HTML page
    pub selector: &'a str,

    /// GitHub rejects requests without a user agent
    pub user_agent: &'a str,
}

static CONFIG: Config<'static> = Config {
    api_base: "https://api.github.com",
    user: "dclu",
    repository: "dclu.github.io",
    selector: ".date",
    user_agent: concat!("repo-date/", env!("CARGO_PKG_VERSION")),
};

pub fn build_config() -> &'static Config<'static> {
    &CONFIG
}
