//! Flattens session state into the plain fields the dashboard template reads.

use askama::Template;

use crate::analysis::{filter_comments, AnalysisResult, Category, Filter};
use crate::session::Session;

/// Characters of parent text shown above a reply.
pub const PARENT_EXCERPT_CHARS: usize = 200;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub topic: String,
    pub subreddit: String,
    pub has_notice: bool,
    pub notice_class: String,
    pub notice_message: String,
    pub show_posts: bool,
    pub posts: Vec<PostView>,
    pub has_results: bool,
    pub results_empty: bool,
    pub analyzed_at: String,
    pub metrics: Vec<MetricView>,
    pub bars: Vec<BarView>,
    pub filters: Vec<FilterOption>,
    pub shown: usize,
    pub total: usize,
    pub comments: Vec<CommentView>,
}

pub struct PostView {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub num_comments: u64,
    pub url: String,
    pub date: String,
    pub checked: bool,
}

pub struct MetricView {
    pub label: String,
    pub value: usize,
}

pub struct BarView {
    pub label: String,
    pub count: usize,
    pub percent: usize,
    pub css_class: String,
}

pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

pub struct CommentView {
    pub index: usize,
    pub has_parent: bool,
    pub parent_excerpt: String,
    pub emoji: String,
    pub color: String,
    pub css_class: String,
    pub display_label: String,
    pub text: String,
}

pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

impl DashboardTemplate {
    /// Consumes the session's pending notice.
    pub fn from_session(session: &mut Session) -> Self {
        let notice = session.take_notice();
        let filter = session.filter();

        let posts = session
            .posts()
            .iter()
            .map(|p| PostView {
                id: p.id.clone(),
                title: p.title.clone(),
                subreddit: p.subreddit.clone(),
                num_comments: p.num_comments,
                url: p.url.clone(),
                date: p.created.format("%Y-%m-%d").to_string(),
                checked: session.is_selected(&p.id),
            })
            .collect();

        let mut template = DashboardTemplate {
            topic: session.topic.clone(),
            subreddit: session.subreddit.clone(),
            has_notice: notice.is_some(),
            notice_class: notice
                .as_ref()
                .map(|n| n.level.css_class().to_string())
                .unwrap_or_default(),
            notice_message: notice.map(|n| n.message).unwrap_or_default(),
            show_posts: !matches!(session.phase(), crate::session::Phase::Idle),
            posts,
            has_results: false,
            results_empty: false,
            analyzed_at: String::new(),
            metrics: Vec::new(),
            bars: Vec::new(),
            filters: Vec::new(),
            shown: 0,
            total: 0,
            comments: Vec::new(),
        };

        match session.outcome() {
            Some(Some(result)) => template.fill_results(result, filter),
            Some(None) => {
                template.has_results = true;
                template.results_empty = true;
            }
            None => {}
        }

        template
    }

    fn fill_results(&mut self, result: &AnalysisResult, filter: Filter) {
        let counts = &result.counts;

        self.has_results = true;
        self.analyzed_at = result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

        self.metrics = std::iter::once(MetricView {
            label: "Total Comments".to_string(),
            value: counts.total_comments,
        })
        .chain(Category::all().iter().map(|c| MetricView {
            label: format!("{} {}", c.emoji(), c.label()),
            value: counts.get(*c),
        }))
        .collect();

        let max = Category::all()
            .iter()
            .map(|c| counts.get(*c))
            .max()
            .unwrap_or(0);
        self.bars = Category::all()
            .iter()
            .map(|c| {
                let count = counts.get(*c);
                BarView {
                    label: c.label().to_string(),
                    count,
                    percent: if max == 0 { 0 } else { count * 100 / max },
                    css_class: c.css_class().to_string(),
                }
            })
            .collect();

        self.filters = Filter::choices()
            .into_iter()
            .map(|f| FilterOption {
                value: f.to_string(),
                selected: f == filter,
            })
            .collect();

        let shown = filter_comments(&result.comments, filter);
        self.shown = shown.len();
        self.total = result.comments.len();
        self.comments = shown
            .into_iter()
            .enumerate()
            .map(|(i, c)| CommentView {
                index: i + 1,
                has_parent: !c.parent_text.is_empty(),
                parent_excerpt: excerpt(&c.parent_text, PARENT_EXCERPT_CHARS),
                emoji: c.category.emoji().to_string(),
                color: c.category.color().to_string(),
                css_class: c.category.css_class().to_string(),
                display_label: c.display_label.clone(),
                text: c.text.clone(),
            })
            .collect();
    }
}
