use std::collections::HashSet;

use crate::analysis::{AnalysisResult, Filter};
use crate::cache::LruCache;
use crate::config::CacheConfig;
use crate::reddit::Post;

/// What an analysis run produced. `None` means no comment could be
/// extracted from the selected posts.
pub type AnalysisOutcome = Option<AnalysisResult>;

#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    PostsLoaded,
    AnalysisRunning,
    ResultsReady(AnalysisOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Warning => "notice-warning",
            NoticeLevel::Error => "notice-error",
        }
    }
}

/// One-shot message for the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    topic: String,
    subreddit: String,
}

impl SearchKey {
    pub fn new(topic: &str, subreddit: &str) -> Self {
        Self {
            topic: topic.trim().to_string(),
            subreddit: subreddit.to_ascii_lowercase(),
        }
    }
}

/// Sorted, de-duplicated post ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostSetKey(Vec<String>);

impl PostSetKey {
    pub fn new(ids: &[String]) -> Self {
        let mut ids = ids.to_vec();
        ids.sort();
        ids.dedup();
        Self(ids)
    }
}

pub const NO_POSTS_FOUND: &str = "No posts found for this topic.";
pub const NO_SELECTION: &str = "Please select at least one post to analyze.";
pub const EMPTY_TOPIC: &str = "Enter a topic to search for.";
pub const SEARCH_FIRST: &str = "Search for posts before analyzing.";

/// Everything one browser session remembers between requests.
pub struct Session {
    phase: Phase,
    pub topic: String,
    pub subreddit: String,
    posts: Vec<Post>,
    selected: HashSet<String>,
    filter: Filter,
    notice: Option<Notice>,
    pub(crate) search_cache: LruCache<SearchKey, Vec<Post>>,
    pub(crate) analysis_cache: LruCache<PostSetKey, AnalysisOutcome>,
}

impl Session {
    pub fn new(topic: &str, subreddit: &str, cache: &CacheConfig) -> Self {
        Self {
            phase: Phase::Idle,
            topic: topic.to_string(),
            subreddit: subreddit.to_string(),
            posts: Vec::new(),
            selected: HashSet::new(),
            filter: Filter::All,
            notice: None,
            search_cache: LruCache::new(cache.search_capacity),
            analysis_cache: LruCache::new(cache.analysis_capacity),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_selected(&self, post_id: &str) -> bool {
        self.selected.contains(post_id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// `Some` once an analysis has finished; the inner `None` is the empty
    /// marker.
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match &self.phase {
            Phase::ResultsReady(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Stores a fresh post list. Always lands in `PostsLoaded` and drops any
    /// previous analysis. Selections survive for posts that are listed again.
    pub fn posts_loaded(&mut self, topic: &str, subreddit: &str, posts: Vec<Post>) {
        self.topic = topic.to_string();
        self.subreddit = subreddit.to_string();
        self.selected
            .retain(|id| posts.iter().any(|p| &p.id == id));
        self.notice = posts.is_empty().then(|| Notice::warning(NO_POSTS_FOUND));
        self.posts = posts;
        self.filter = Filter::All;
        self.phase = Phase::PostsLoaded;
    }

    /// Records the checkbox selection and, if anything usable was picked,
    /// enters `AnalysisRunning`. Returns the picked ids in listing order.
    ///
    /// Callers hold the session lock for a whole run, so `AnalysisRunning`
    /// seen here is left over from a run whose request was dropped and is
    /// treated like `PostsLoaded`.
    pub fn begin_analysis(&mut self, requested: &[String]) -> Option<Vec<String>> {
        match self.phase {
            Phase::PostsLoaded | Phase::AnalysisRunning | Phase::ResultsReady(_) => {}
            Phase::Idle => {
                self.notice = Some(Notice::warning(SEARCH_FIRST));
                return None;
            }
        }

        let ids: Vec<String> = self
            .posts
            .iter()
            .filter(|p| requested.iter().any(|r| r == &p.id))
            .map(|p| p.id.clone())
            .collect();

        self.selected = ids.iter().cloned().collect();

        if ids.is_empty() {
            self.notice = Some(Notice::warning(NO_SELECTION));
            return None;
        }

        self.notice = None;
        self.phase = Phase::AnalysisRunning;
        Some(ids)
    }

    pub fn finish_analysis(&mut self, outcome: AnalysisOutcome) {
        debug_assert!(matches!(self.phase, Phase::AnalysisRunning));
        self.phase = Phase::ResultsReady(outcome);
    }

    /// Returns to `PostsLoaded` after a failed run.
    pub fn abort_analysis(&mut self, message: impl Into<String>) {
        self.phase = Phase::PostsLoaded;
        self.notice = Some(Notice::error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzedComment, Category, Sentiment};
    use crate::testing::post;

    fn cache_config() -> CacheConfig {
        CacheConfig {
            search_capacity: 4,
            analysis_capacity: 4,
        }
    }

    fn session_with_posts() -> Session {
        let mut session = Session::new("AI ethics", "technology", &cache_config());
        session.posts_loaded(
            "AI ethics",
            "technology",
            vec![post("a", "first", 1), post("b", "second", 2)],
        );
        session
    }

    fn some_result() -> AnalysisOutcome {
        Some(AnalysisResult::new(vec![AnalyzedComment::plain(
            "love it",
            Sentiment::Positive,
            "",
        )]))
    }

    #[test]
    fn starts_idle() {
        let session = Session::new("t", "s", &cache_config());
        assert!(matches!(session.phase(), Phase::Idle));
        assert!(session.outcome().is_none());
        assert!(session.posts().is_empty());
    }

    #[test]
    fn empty_search_warns_but_loads() {
        let mut session = Session::new("t", "s", &cache_config());
        session.posts_loaded("t", "s", Vec::new());
        assert!(matches!(session.phase(), Phase::PostsLoaded));
        assert_eq!(session.take_notice(), Some(Notice::warning(NO_POSTS_FOUND)));
        assert_eq!(session.take_notice(), None);
    }

    #[test]
    fn analyze_without_selection_stays_put() {
        let mut session = session_with_posts();
        assert!(session.begin_analysis(&[]).is_none());
        assert!(matches!(session.phase(), Phase::PostsLoaded));
        assert_eq!(session.take_notice(), Some(Notice::warning(NO_SELECTION)));

        // ids that are not on the current list count as no selection
        assert!(session.begin_analysis(&["zzz".to_string()]).is_none());
        assert!(matches!(session.phase(), Phase::PostsLoaded));
    }

    #[test]
    fn analyze_before_search_is_refused() {
        let mut session = Session::new("t", "s", &cache_config());
        assert!(session.begin_analysis(&["a".to_string()]).is_none());
        assert!(matches!(session.phase(), Phase::Idle));
        assert_eq!(session.take_notice(), Some(Notice::warning(SEARCH_FIRST)));
    }

    #[test]
    fn selection_comes_back_in_listing_order() {
        let mut session = session_with_posts();
        let ids = session
            .begin_analysis(&["b".to_string(), "a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(matches!(session.phase(), Phase::AnalysisRunning));
        assert!(session.is_selected("a") && session.is_selected("b"));
    }

    #[test]
    fn research_clears_results() {
        let mut session = session_with_posts();
        session.begin_analysis(&["a".to_string()]).unwrap();
        session.finish_analysis(some_result());
        session.set_filter(Filter::Only(Category::Positive));
        assert!(session.outcome().is_some());

        session.posts_loaded("other", "", vec![post("a", "first", 1), post("c", "third", 0)]);
        assert!(matches!(session.phase(), Phase::PostsLoaded));
        assert!(session.outcome().is_none());
        assert_eq!(session.filter(), Filter::All);
        // "a" is listed again and keeps its checkbox
        assert!(session.is_selected("a"));
        assert!(!session.is_selected("c"));
    }

    #[test]
    fn stale_running_phase_accepts_a_new_run() {
        let mut session = session_with_posts();
        session.begin_analysis(&["a".to_string()]).unwrap();
        assert!(matches!(session.phase(), Phase::AnalysisRunning));

        // the first run never finished
        let ids = session.begin_analysis(&["b".to_string()]).unwrap();
        assert_eq!(ids, vec!["b"]);
        assert!(matches!(session.phase(), Phase::AnalysisRunning));
        assert_eq!(session.take_notice(), None);
    }

    #[test]
    fn empty_marker_is_kept_distinct() {
        let mut session = session_with_posts();
        session.begin_analysis(&["a".to_string()]).unwrap();
        session.finish_analysis(None);

        assert!(matches!(session.phase(), Phase::ResultsReady(None)));
        assert!(matches!(session.outcome(), Some(None)));
    }

    #[test]
    fn abort_returns_to_posts_loaded() {
        let mut session = session_with_posts();
        session.begin_analysis(&["a".to_string()]).unwrap();
        session.abort_analysis("boom");

        assert!(matches!(session.phase(), Phase::PostsLoaded));
        assert_eq!(session.take_notice().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn post_set_key_ignores_order_and_duplicates() {
        let a = PostSetKey::new(&["b".to_string(), "a".to_string()]);
        let b = PostSetKey::new(&["a".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(a, b);
    }

    #[test]
    fn search_key_normalizes_inputs() {
        assert_eq!(SearchKey::new(" AI ethics ", "Technology"), SearchKey::new("AI ethics", "technology"));
    }
}
