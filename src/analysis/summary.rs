use std::fmt;
use std::str::FromStr;

use super::sentiment::Category;
use super::types::{AnalyzedComment, SummaryCounts};

pub fn summarize(comments: &[AnalyzedComment]) -> SummaryCounts {
    let mut counts = SummaryCounts {
        total_comments: comments.len(),
        ..SummaryCounts::default()
    };

    for comment in comments {
        match comment.category {
            Category::Positive => counts.positive += 1,
            Category::Negative => counts.negative += 1,
            Category::Neutral => counts.neutral += 1,
            Category::Sarcastic => counts.sarcastic += 1,
        }
    }

    counts
}

/// Which comments the dashboard lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

impl Filter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => *wanted == category,
        }
    }

    /// Every choice in the order the filter control lists them.
    pub fn choices() -> Vec<Filter> {
        std::iter::once(Filter::All)
            .chain(Category::all().iter().copied().map(Filter::Only))
            .collect()
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    /// Unknown values select everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from_label(s).map(Filter::Only).unwrap_or(Filter::All))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("All"),
            Filter::Only(category) => f.write_str(category.label()),
        }
    }
}

pub fn filter_comments(comments: &[AnalyzedComment], filter: Filter) -> Vec<&AnalyzedComment> {
    comments.iter().filter(|c| filter.matches(c.category)).collect()
}
