use serde::Deserialize;

/// Path of the repository listing of a user
pub fn path(user: &str) -> String {
    format!("/users/{user}/repos")
}

/// The listing is a bare JSON array, only the first page is ever requested
pub type Response = Vec<RepositoryRecord>;

/// One entry of the listing, all other fields of the payload are ignored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,

    /// The date and time the repository was last updated
    /// in ISO-8601 format (YYYY-MM-DDThh:mm:ssZ).
    pub updated_at: String,
}
