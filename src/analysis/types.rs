use chrono::{DateTime, Utc};

use super::sentiment::{Category, Sentiment};
use super::sarcasm;
use super::summary::summarize;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedComment {
    /// Comment text as shown; the sarcasm marker is already stripped
    pub text: String,
    pub category: Category,
    /// Category name, or `Sarcastic (Reversed to X)`
    pub display_label: String,
    pub parent_text: String,
}

impl AnalyzedComment {
    pub fn plain(text: impl Into<String>, sentiment: Sentiment, parent_text: impl Into<String>) -> Self {
        let category = Category::from(sentiment);
        Self {
            text: text.into(),
            category,
            display_label: category.label().to_string(),
            parent_text: parent_text.into(),
        }
    }

    /// `underlying` is what the model says about the text without the marker.
    pub fn sarcastic(text: impl Into<String>, underlying: Sentiment, parent_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: Category::Sarcastic,
            display_label: sarcasm::display_label(underlying),
            parent_text: parent_text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub total_comments: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub sarcastic: usize,
}

impl SummaryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::Neutral => self.neutral,
            Category::Sarcastic => self.sarcastic,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub counts: SummaryCounts,
    pub comments: Vec<AnalyzedComment>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn new(comments: Vec<AnalyzedComment>) -> Self {
        Self {
            counts: summarize(&comments),
            comments,
            analyzed_at: Utc::now(),
        }
    }
}
