use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::reddit::Comment;
use super::classifier::SentimentClassifier;
use super::sarcasm;
use super::sentiment::Sentiment;
use super::types::{AnalysisResult, AnalyzedComment};

/// Classifies comments and applies the sarcasm override.
pub struct Analyzer {
    classifier: Arc<dyn SentimentClassifier>,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self { classifier }
    }

    /// Returns `None` when there is nothing to classify.
    pub async fn analyze(&self, comments: Vec<Comment>) -> Result<Option<AnalysisResult>> {
        let comments: Vec<Comment> = comments
            .into_iter()
            .filter(|c| !c.text.trim().is_empty())
            .collect();

        if comments.is_empty() {
            info!("No comments to analyze");
            return Ok(None);
        }

        let texts: Vec<String> = comments.iter().map(|c| c.text.trim().to_string()).collect();
        let predictions = self.classifier.classify(&texts).await?;
        if predictions.len() != texts.len() {
            anyhow::bail!(
                "Classifier returned {} predictions for {} comments",
                predictions.len(),
                texts.len()
            );
        }

        let mut analyzed = Vec::with_capacity(comments.len());
        let mut sarcastic = 0usize;

        for ((comment, text), prediction) in comments.into_iter().zip(texts).zip(predictions) {
            let item = match sarcasm::strip_marker(&text) {
                Some(clean) => {
                    sarcastic += 1;
                    // The batched prediction saw the marker; classify the bare
                    // text again on its own.
                    let underlying = if clean.is_empty() {
                        Sentiment::Neutral
                    } else {
                        self.classifier.classify_one(clean).await?.label
                    };
                    debug!("Sarcastic comment, underlying sentiment {}", underlying);
                    AnalyzedComment::sarcastic(clean, underlying, comment.parent_text)
                }
                None => AnalyzedComment::plain(text, prediction.label, comment.parent_text),
            };
            analyzed.push(item);
        }

        let result = AnalysisResult::new(analyzed);
        info!(
            "Analyzed {} comments ({} sarcastic)",
            result.counts.total_comments, sarcastic
        );
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Category;
    use crate::testing::KeywordClassifier;

    fn analyzer() -> (Analyzer, Arc<KeywordClassifier>) {
        let classifier = Arc::new(KeywordClassifier::default());
        (Analyzer::new(classifier.clone()), classifier)
    }

    #[tokio::test]
    async fn no_comments_yields_none() {
        let (analyzer, classifier) = analyzer();
        assert!(analyzer.analyze(Vec::new()).await.unwrap().is_none());
        assert!(analyzer
            .analyze(vec![Comment::new("   ", "title")])
            .await
            .unwrap()
            .is_none());
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn plain_comments_keep_the_batch_label() {
        let (analyzer, classifier) = analyzer();
        let result = analyzer
            .analyze(vec![
                Comment::new("I love this", "Post title"),
                Comment::new("I hate this", "I love this"),
                Comment::new("It is a thing", ""),
            ])
            .await
            .unwrap()
            .unwrap();

        let categories: Vec<_> = result.comments.iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![Category::Positive, Category::Negative, Category::Neutral]);
        assert_eq!(result.comments[1].display_label, "Negative");
        assert_eq!(result.comments[1].parent_text, "I love this");
        assert_eq!(result.counts.total_comments, 3);
        // one batched call
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn sarcastic_comments_are_reclassified_and_reversed() {
        let (analyzer, classifier) = analyzer();
        let result = analyzer
            .analyze(vec![
                Comment::new("I love mondays /s", "t"),
                Comment::new("I hate free pizza /S", "t"),
                Comment::new("It is what it is /s", "t"),
            ])
            .await
            .unwrap()
            .unwrap();

        let labels: Vec<_> = result.comments.iter().map(|c| c.display_label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Sarcastic (Reversed to Negative)",
                "Sarcastic (Reversed to Positive)",
                "Sarcastic (Reversed to Negative)",
            ]
        );
        assert!(result.comments.iter().all(|c| c.category == Category::Sarcastic));
        assert_eq!(result.comments[0].text, "I love mondays");
        assert_eq!(result.counts.sarcastic, 3);
        // batch plus one single-item call per sarcastic comment
        assert_eq!(classifier.calls(), 4);
        assert_eq!(classifier.seen().last().map(String::as_str), Some("It is what it is"));
    }

    #[tokio::test]
    async fn bare_marker_skips_the_second_call() {
        let (analyzer, classifier) = analyzer();
        let result = analyzer
            .analyze(vec![Comment::new("/s", "parent")])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.comments[0].text, "");
        assert_eq!(result.comments[0].display_label, "Sarcastic (Reversed to Negative)");
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn counts_always_sum_to_total() {
        let (analyzer, _) = analyzer();
        let result = analyzer
            .analyze(vec![
                Comment::new("love", ""),
                Comment::new("hate", ""),
                Comment::new("meh", ""),
                Comment::new("love it /s", ""),
                Comment::new("love again", ""),
            ])
            .await
            .unwrap()
            .unwrap();

        let c = result.counts;
        assert_eq!(c.total_comments, result.comments.len());
        assert_eq!(c.positive + c.negative + c.neutral + c.sarcastic, c.total_comments);
    }

    #[tokio::test]
    async fn classifier_failure_propagates() {
        let classifier = Arc::new(KeywordClassifier::failing());
        let analyzer = Analyzer::new(classifier);
        assert!(analyzer.analyze(vec![Comment::new("love", "")]).await.is_err());
    }
}
