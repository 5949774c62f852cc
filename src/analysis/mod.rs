pub mod classifier;
pub mod pipeline;
pub mod sarcasm;
pub mod sentiment;
pub mod summary;
pub mod types;

pub use classifier::{Classification, HostedClassifier, SentimentClassifier};
pub use pipeline::Analyzer;
pub use sentiment::{Category, Sentiment};
pub use summary::{filter_comments, Filter};
pub use types::{AnalysisResult, AnalyzedComment};
