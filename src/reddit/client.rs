use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::RedditConfig;
use super::expand::{expand_more, MoreSource};
use super::listing::{thread_replies, CommentTree, Listing, MoreChildrenResponse, Thing};
use super::types::{Comment, Post};
use super::{ForumClient, ALL_SUBREDDITS};

/// Application-only, read-only Reddit API client.
pub struct RedditClient {
    http: Client,
    config: RedditConfig,
    token: RwLock<AccessToken>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Utc::now() + Duration::seconds(60) < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
}

impl RedditClient {
    /// Builds the client and performs the initial token exchange, so bad
    /// credentials fail here rather than on the first search.
    pub async fn connect(config: &RedditConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        let token = Self::authenticate(&http, config)
            .await
            .context("Reddit rejected the configured credentials")?;

        info!("Reddit client authorized (read-only)");

        Ok(Self {
            http,
            config: config.clone(),
            token: RwLock::new(token),
        })
    }

    async fn authenticate(http: &Client, config: &RedditConfig) -> Result<AccessToken> {
        let url = format!("{}/api/v1/access_token", config.auth_url);

        let response = http
            .post(&url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Reddit token request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit token endpoint returned {}: {}", status, body);
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Reddit token response")?;

        if let Some(error) = parsed.error {
            anyhow::bail!("Reddit token endpoint returned error: {}", error);
        }

        let value = parsed.access_token.context("Reddit token response had no access_token")?;
        let expires_in = parsed.expires_in.unwrap_or(3600);

        Ok(AccessToken {
            value,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }

    async fn bearer(&self) -> Result<String> {
        {
            let token = self.token.read().await;
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let mut token = self.token.write().await;
        if !token.is_fresh() {
            debug!("Refreshing Reddit access token");
            *token = Self::authenticate(&self.http, &self.config).await?;
        }
        Ok(token.value.clone())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.config.api_url, path);
        let bearer = self.bearer().await?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(bearer)
            .query(query)
            .query(&[("raw_json", "1")])
            .send()
            .await
            .with_context(|| format!("Reddit request to {} failed", path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit API returned {} for {}: {}", status, path, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse Reddit response for {}", path))
    }
}

#[async_trait]
impl ForumClient for RedditClient {
    async fn search(&self, topic: &str, subreddit: &str) -> Result<Vec<Post>> {
        info!("Searching r/{} for {:?}", subreddit, topic);

        let listing: Listing = self
            .get_json(
                &format!("/r/{}/search", subreddit),
                &search_params(topic, subreddit, self.config.search_limit),
            )
            .await?;

        let posts: Vec<Post> = listing
            .data
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Link(link) => Some(Post::from(link)),
                _ => None,
            })
            .take(self.config.search_limit as usize)
            .collect();

        info!("Found {} posts", posts.len());
        Ok(posts)
    }

    async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let post_id = post_id.strip_prefix("t3_").unwrap_or(post_id);

        let mut listings: Vec<Listing> = self
            .get_json(&format!("/comments/{}", post_id), &[("limit", "500".to_string())])
            .await?;

        if listings.len() != 2 {
            anyhow::bail!(
                "Unexpected comment page shape for post {}: {} listings",
                post_id,
                listings.len()
            );
        }

        let comment_things = listings.pop().map(|l| l.data.children).unwrap_or_default();
        let title = listings
            .pop()
            .into_iter()
            .flat_map(|l| l.data.children)
            .find_map(|thing| match thing {
                Thing::Link(link) => Some(link.title),
                _ => None,
            })
            .unwrap_or_else(|| {
                warn!("Post {} came back without its submission", post_id);
                String::new()
            });

        let mut tree = CommentTree::new(title);
        tree.extend(comment_things);
        expand_more(self, &mut tree, post_id, self.config.more_expansions).await?;

        let fetched = tree.len();
        let comments = tree.into_comments();
        debug!("Post {}: {} usable comments of {} fetched", post_id, comments.len(), fetched);
        Ok(comments)
    }
}

#[async_trait]
impl MoreSource for RedditClient {
    async fn more_children(&self, post_id: &str, ids: &[String]) -> Result<Vec<Thing>> {
        let response: MoreChildrenResponse = self
            .get_json(
                "/api/morechildren",
                &[
                    ("api_type", "json".to_string()),
                    ("link_id", format!("t3_{}", post_id)),
                    ("children", ids.join(",")),
                ],
            )
            .await?;
        Ok(response.json.data.things)
    }

    async fn continue_thread(&self, post_id: &str, parent_id: &str) -> Result<Vec<Thing>> {
        let listings: Vec<Listing> = self
            .get_json(
                &format!("/comments/{}/_/{}", post_id, parent_id),
                &[("limit", "500".to_string())],
            )
            .await?;
        Ok(thread_replies(listings, parent_id))
    }
}

/// Query for `/r/{subreddit}/search`. `all` is searched site-wide.
fn search_params(topic: &str, subreddit: &str, limit: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", topic.to_string()),
        ("sort", "relevance".to_string()),
        ("limit", limit.to_string()),
        ("type", "link".to_string()),
    ];
    if !subreddit.eq_ignore_ascii_case(ALL_SUBREDDITS) {
        params.push(("restrict_sr", "true".to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn named_subreddit_is_restricted() {
        let params = search_params("AI ethics", "technology", 15);
        assert_eq!(param(&params, "q"), Some("AI ethics"));
        assert_eq!(param(&params, "sort"), Some("relevance"));
        assert_eq!(param(&params, "limit"), Some("15"));
        assert_eq!(param(&params, "restrict_sr"), Some("true"));
    }

    #[test]
    fn all_is_searched_site_wide() {
        assert_eq!(param(&search_params("AI ethics", "all", 15), "restrict_sr"), None);
        assert_eq!(param(&search_params("AI ethics", "All", 15), "restrict_sr"), None);
    }

    #[test]
    fn expired_token_is_refreshed() {
        let stale = AccessToken {
            value: "t".to_string(),
            expires_at: Utc::now() + Duration::seconds(30),
        };
        let fresh = AccessToken {
            value: "t".to_string(),
            expires_at: Utc::now() + Duration::seconds(3600),
        };
        assert!(!stale.is_fresh());
        assert!(fresh.is_fresh());
    }
}
