use chrono::{DateTime, Utc};

/// A submission returned by a subreddit search.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub num_comments: u64,
    pub url: String,
    pub created: DateTime<Utc>,
}

/// A single comment with the text it replies to.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Trimmed body, never empty
    pub text: String,
    /// Parent comment body, the post title for top-level comments, or empty
    /// when the parent is gone
    pub parent_text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>, parent_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parent_text: parent_text.into(),
        }
    }
}
