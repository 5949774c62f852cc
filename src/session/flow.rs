use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::analysis::Analyzer;
use crate::reddit::{resolve_subreddit, ForumClient};
use super::state::{AnalysisOutcome, Notice, PostSetKey, SearchKey, Session, EMPTY_TOPIC};

/// Drives a session through search and analysis.
pub struct Orchestrator {
    forum: Arc<dyn ForumClient>,
    analyzer: Arc<Analyzer>,
}

impl Orchestrator {
    pub fn new(forum: Arc<dyn ForumClient>, analyzer: Arc<Analyzer>) -> Self {
        Self { forum, analyzer }
    }

    /// Runs a search and replaces the session's post list. Identical inputs
    /// are answered from the session's search cache.
    pub async fn search(&self, session: &mut Session, topic: &str, subreddit_input: &str) -> Result<()> {
        let topic = topic.trim();
        if topic.is_empty() {
            session.notify(Notice::warning(EMPTY_TOPIC));
            return Ok(());
        }

        let subreddit = resolve_subreddit(subreddit_input);
        let key = SearchKey::new(topic, &subreddit);

        let cached = session.search_cache.get(&key).cloned();
        let posts = match cached {
            Some(posts) => {
                debug!("Search cache hit for {:?} in r/{}", topic, subreddit);
                posts
            }
            None => {
                let posts = match self.forum.search(topic, &subreddit).await {
                    Ok(posts) => posts,
                    Err(e) => {
                        let e = e.context(format!("Search for {:?} in r/{} failed", topic, subreddit));
                        session.notify(Notice::error(format!("{:#}", e)));
                        return Err(e);
                    }
                };
                session.search_cache.insert(key, posts.clone());
                posts
            }
        };

        session.posts_loaded(topic, subreddit_input.trim(), posts);
        Ok(())
    }

    /// Analyzes the selected posts. Without a usable selection only a warning
    /// is recorded. On failure the session falls back to its post list.
    pub async fn analyze(&self, session: &mut Session, requested: &[String]) -> Result<()> {
        let Some(ids) = session.begin_analysis(requested) else {
            return Ok(());
        };

        match self.run(session, &ids).await {
            Ok(outcome) => {
                session.finish_analysis(outcome);
                Ok(())
            }
            Err(e) => {
                session.abort_analysis(format!("Analysis failed: {:#}", e));
                Err(e)
            }
        }
    }

    async fn run(&self, session: &mut Session, ids: &[String]) -> Result<AnalysisOutcome> {
        let key = PostSetKey::new(ids);
        if let Some(outcome) = session.analysis_cache.get(&key).cloned() {
            debug!("Analysis cache hit for {} posts", ids.len());
            return Ok(outcome);
        }

        info!("Analyzing {} posts", ids.len());
        let mut comments = Vec::new();
        for id in ids {
            let fetched = self
                .forum
                .fetch_comments(id)
                .await
                .with_context(|| format!("Fetching comments for post {} failed", id))?;
            comments.extend(fetched);
        }

        let outcome = self.analyzer.analyze(comments).await?;
        session.analysis_cache.insert(key, outcome.clone());
        Ok(outcome)
    }
}
