use serde::{Deserialize, Serialize};

/// A stored blog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub url: String,
    #[serde(default)]
    pub likes: u64,
    /// Id of the user who created the entry
    pub user: String,
}

/// Payload for `POST /api/blogs`.
///
/// Every field is optional at the wire level so that a missing title or url
/// is reported by [`crate::validation::check_new_blog`] rather than by the
/// JSON decoder. `likes` is signed for the same reason.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Payload for `PUT /api/blogs/:id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Payload for `POST /api/users`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}
