//! In-memory stand-ins for the forum and the model.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::analysis::{Classification, Sentiment, SentimentClassifier};
use crate::reddit::{Comment, ForumClient, Post};

/// "hate" → Negative, "love" → Positive, anything else → Neutral.
#[derive(Default)]
pub struct KeywordClassifier {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    fail: bool,
}

impl KeywordClassifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("model unavailable");
        }
        self.seen.lock().unwrap().extend(texts.iter().cloned());

        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                let label = if t.contains("hate") {
                    Sentiment::Negative
                } else if t.contains("love") {
                    Sentiment::Positive
                } else {
                    Sentiment::Neutral
                };
                Classification { label, score: 0.9 }
            })
            .collect())
    }
}

pub fn post(id: &str, title: &str, num_comments: u64) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        subreddit: "technology".to_string(),
        num_comments,
        url: format!("https://www.reddit.com/comments/{}", id),
        created: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

/// Fixed posts and comment threads; counts calls so cache hits are visible.
#[derive(Default)]
pub struct StaticForum {
    pub posts: Vec<Post>,
    pub threads: HashMap<String, Vec<Comment>>,
    searches: AtomicUsize,
    fetches: AtomicUsize,
}

impl StaticForum {
    pub fn new(posts: Vec<Post>, threads: Vec<(&str, Vec<Comment>)>) -> Self {
        Self {
            posts,
            threads: threads
                .into_iter()
                .map(|(id, comments)| (id.to_string(), comments))
                .collect(),
            ..Self::default()
        }
    }

    /// Three posts: two with discussion, one without comments.
    pub fn sample() -> Self {
        Self::new(
            vec![
                post("p1", "Should AI models be audited?", 3),
                post("p2", "Ethics boards at tech companies", 2),
                post("p3", "Quiet thread", 0),
            ],
            vec![
                (
                    "p1",
                    vec![
                        Comment::new("I love that this is finally discussed", "Should AI models be audited?"),
                        Comment::new("I hate how slow regulators are", "I love that this is finally discussed"),
                        Comment::new("Audits will fix everything /s", "Should AI models be audited?"),
                    ],
                ),
                (
                    "p2",
                    vec![
                        Comment::new("They publish reports", "Ethics boards at tech companies"),
                        Comment::new("love this take", ""),
                    ],
                ),
                ("p3", Vec::new()),
            ],
        )
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForumClient for StaticForum {
    async fn search(&self, topic: &str, _subreddit: &str) -> Result<Vec<Post>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if topic == "nothing matches" {
            return Ok(Vec::new());
        }
        Ok(self.posts.clone())
    }

    async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.threads.get(post_id) {
            Some(comments) => Ok(comments.clone()),
            None => anyhow::bail!("post {} not found", post_id),
        }
    }
}
