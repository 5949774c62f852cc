use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::cache::LruCache;
use crate::config::{CacheConfig, WebConfig};
use super::state::Session;

/// A session is locked for the whole of an action, so actions within one
/// session never overlap.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Bounded table of live sessions keyed by the id stored in the browser
/// cookie. The least recently seen session is dropped when full.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<LruCache<String, SessionHandle>>>,
    cache: CacheConfig,
    default_topic: String,
    default_subreddit: String,
}

impl SessionStore {
    pub fn new(web: &WebConfig, cache: &CacheConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(LruCache::new(web.max_sessions))),
            cache: cache.clone(),
            default_topic: web.default_topic.clone(),
            default_subreddit: web.default_subreddit.clone(),
        }
    }

    /// Returns the session for `id`, or a fresh one under a new id when the
    /// id is missing or unknown.
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle) {
        let mut sessions = self.sessions.lock().await;

        if let Some(id) = id {
            if let Some(handle) = sessions.get(id) {
                return (id.to_string(), handle.clone());
            }
        }

        let id = Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Session::new(
            &self.default_topic,
            &self.default_subreddit,
            &self.cache,
        )));
        if let Some((evicted, _)) = sessions.insert(id.clone(), handle.clone()) {
            debug!("Session table full, dropped session {}", evicted);
        }
        debug!("Created session {} ({} live)", id, sessions.len());

        (id, handle)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
