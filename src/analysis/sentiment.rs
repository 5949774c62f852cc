use std::fmt;

/// Base label produced by the sentiment model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Maps a raw model label onto a sentiment. Handles both the named labels
    /// of the `-latest` checkpoints and the `LABEL_n` ids of older ones.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "label_2" => Some(Sentiment::Positive),
            "negative" | "neg" | "label_0" => Some(Sentiment::Negative),
            "neutral" | "neu" | "label_1" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final, display-facing classification of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Positive,
    Negative,
    Neutral,
    /// Marked with a trailing `/s`; overrides whatever the model said
    Sarcastic,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Positive => "Positive",
            Category::Negative => "Negative",
            Category::Neutral => "Neutral",
            Category::Sarcastic => "Sarcastic",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Positive => "🟢",
            Category::Negative => "🔴",
            Category::Neutral => "⚪",
            Category::Sarcastic => "🎭",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Positive => "green",
            Category::Negative => "red",
            Category::Neutral => "gray",
            Category::Sarcastic => "orange",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Category::Positive => "sentiment-positive",
            Category::Negative => "sentiment-negative",
            Category::Neutral => "sentiment-neutral",
            Category::Sarcastic => "sentiment-sarcastic",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Positive,
            Category::Negative,
            Category::Neutral,
            Category::Sarcastic,
        ]
    }
}

impl From<Sentiment> for Category {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => Category::Positive,
            Sentiment::Negative => Category::Negative,
            Sentiment::Neutral => Category::Neutral,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
