pub mod client;
pub mod expand;
pub mod listing;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;

pub use client::RedditClient;
pub use types::{Comment, Post};

/// Subreddit used when the user leaves the field blank.
pub const ALL_SUBREDDITS: &str = "all";

/// Read-only view of the forum the dashboard analyzes.
#[async_trait]
pub trait ForumClient: Send + Sync {
    /// Searches `subreddit` for `topic`, sorted by relevance.
    async fn search(&self, topic: &str, subreddit: &str) -> Result<Vec<Post>>;

    /// Returns every usable comment of a post with its parent text resolved.
    async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>>;
}

/// Normalizes user input into a subreddit name: trims, drops an `r/`
/// prefix and falls back to `all` when blank.
pub fn resolve_subreddit(input: &str) -> String {
    let name = input.trim().trim_start_matches('/');
    let name = name
        .strip_prefix("r/")
        .or_else(|| name.strip_prefix("R/"))
        .unwrap_or(name)
        .trim_matches('/');

    if name.is_empty() {
        ALL_SUBREDDITS.to_string()
    } else {
        name.to_string()
    }
}
