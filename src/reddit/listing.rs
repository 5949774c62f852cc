//! Wire types for Reddit's listing JSON and the comment tree walk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::{HashMap, VecDeque};

use super::types::{Comment, Post};

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    #[serde(rename = "t1")]
    Comment(RawComment),
    #[serde(rename = "t3")]
    Link(RawLink),
    #[serde(rename = "more")]
    More(RawMore),
}

#[derive(Debug, Deserialize)]
pub struct RawComment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub parent_id: String,
    #[serde(default, deserialize_with = "replies")]
    pub replies: Option<Listing>,
}

#[derive(Debug, Deserialize)]
pub struct RawLink {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_utc: f64,
}

/// Collapsed replies. An empty `children` list is a "continue this thread"
/// link whose replies live on the parent comment's own page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMore {
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Body of `/api/morechildren?api_type=json`.
#[derive(Debug, Deserialize)]
pub struct MoreChildrenResponse {
    pub json: MoreChildrenJson,
}

#[derive(Debug, Deserialize)]
pub struct MoreChildrenJson {
    #[serde(default)]
    pub data: MoreChildrenData,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<Thing>,
}

// Reddit sends `"replies": ""` for leaf comments.
fn replies<'de, D>(deserializer: D) -> Result<Option<Listing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Listing(Listing),
        Other(serde_json::Value),
    }

    Ok(match Replies::deserialize(deserializer)? {
        Replies::Listing(listing) => Some(listing),
        Replies::Other(_) => None,
    })
}

impl From<RawLink> for Post {
    fn from(link: RawLink) -> Self {
        Post {
            id: link.id,
            title: link.title,
            subreddit: link.subreddit,
            num_comments: link.num_comments,
            url: link.url,
            created: DateTime::from_timestamp(link.created_utc as i64, 0).unwrap_or_default(),
        }
    }
}

/// Replies of comment `parent_id` from its `/comments/{post}/_/{parent}`
/// page. The page repeats the parent itself, which is already in the tree.
pub fn thread_replies(mut listings: Vec<Listing>, parent_id: &str) -> Vec<Thing> {
    if listings.len() < 2 {
        return Vec::new();
    }
    listings
        .swap_remove(1)
        .data
        .children
        .into_iter()
        .find_map(|thing| match thing {
            Thing::Comment(c) if c.id == parent_id => c.replies,
            _ => None,
        })
        .map(|replies| replies.data.children)
        .unwrap_or_default()
}

fn is_deleted(body: &str) -> bool {
    matches!(body.trim(), "" | "[deleted]" | "[removed]")
}

struct Node {
    id: String,
    body: String,
    parent_id: String,
}

/// Flattens a comment tree breadth-first and remembers collapsed
/// "more comments" stubs for later expansion.
pub struct CommentTree {
    title: String,
    nodes: Vec<Node>,
    pending: VecDeque<RawMore>,
}

impl CommentTree {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn extend(&mut self, things: Vec<Thing>) {
        let mut queue: VecDeque<Thing> = things.into();

        while let Some(thing) = queue.pop_front() {
            match thing {
                Thing::Comment(c) => {
                    if let Some(replies) = c.replies {
                        queue.extend(replies.data.children);
                    }
                    self.nodes.push(Node {
                        id: c.id,
                        body: c.body,
                        parent_id: c.parent_id,
                    });
                }
                Thing::More(more) => self.pending.push_back(more),
                Thing::Link(_) => {}
            }
        }
    }

    pub fn next_more(&mut self) -> Option<RawMore> {
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Resolves parent text and drops deleted or blank comments.
    pub fn into_comments(self) -> Vec<Comment> {
        let bodies: HashMap<&str, &str> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.body.as_str()))
            .collect();

        self.nodes
            .iter()
            .filter(|n| !is_deleted(&n.body))
            .map(|n| {
                let parent_text = if n.parent_id.starts_with("t3_") {
                    self.title.as_str()
                } else {
                    n.parent_id
                        .strip_prefix("t1_")
                        .and_then(|id| bodies.get(id).copied())
                        .filter(|body| !is_deleted(body))
                        .unwrap_or("")
                };
                Comment::new(n.body.trim(), parent_text)
            })
            .collect()
    }
}
