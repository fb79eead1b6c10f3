//! Bloglist domain crate
//!
//! Blog and user records, the statistics computed over a blog list, and the
//! input checks that run before anything reaches the store. Nothing in here
//! performs I/O.

pub mod error;
pub mod models;
pub mod stats;
pub mod validation;

pub use error::{EmptyInputError, ValidationError};
pub use models::{BlogRecord, BlogUpdate, NewBlog, SignupRequest};
pub use stats::{
    favorite_blog, group_by, most_blogs, most_likes, summarize, total_likes, AuthorBlogs,
    AuthorLikes, Ranking, StatsSummary,
};
