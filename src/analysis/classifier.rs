use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use super::sentiment::Sentiment;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Sentiment,
    pub score: f32,
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// One prediction per input text, in input order.
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>>;

    async fn classify_one(&self, text: &str) -> Result<Classification> {
        let texts = [text.to_string()];
        self.classify(&texts)
            .await?
            .pop()
            .context("Classifier returned no prediction")
    }
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Text classification model served by a Hugging Face style inference
/// endpoint (`POST {base_url}/models/{model}`).
pub struct HostedClassifier {
    client: Client,
    api_token: Option<String>,
    model: String,
    base_url: String,
    max_length: usize,
    batch_size: usize,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: Vec<&'a str>,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// The endpoint returns every label's score per input, but some deployments
/// only return the top label.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    PerInput(Vec<Vec<LabelScore>>),
    TopOnly(Vec<LabelScore>),
}

impl HostedClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: Client::new(),
            api_token: config.api_token.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            max_length: config.max_length,
            batch_size: config.batch_size.max(1),
        }
    }

    /// One request body per `batch_size` texts, inputs cut to `max_length`
    /// characters.
    fn requests<'a>(&self, texts: &'a [String]) -> Vec<InferenceRequest<'a>> {
        texts
            .chunks(self.batch_size)
            .map(|chunk| InferenceRequest {
                inputs: chunk.iter().map(|t| truncate(t, self.max_length)).collect(),
                parameters: InferenceParameters {
                    truncation: true,
                    max_length: self.max_length,
                },
                options: InferenceOptions {
                    wait_for_model: true,
                },
            })
            .collect()
    }

    async fn send(&self, request: &InferenceRequest<'_>) -> Result<Vec<Classification>> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .context("Inference API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API returned {}: {}", status, body);
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .context("Failed to parse inference response")?;

        let predictions = into_classifications(parsed)?;
        if predictions.len() != request.inputs.len() {
            anyhow::bail!(
                "Inference API returned {} predictions for {} inputs",
                predictions.len(),
                request.inputs.len()
            );
        }

        Ok(predictions)
    }
}

fn into_classifications(response: InferenceResponse) -> Result<Vec<Classification>> {
    match response {
        InferenceResponse::PerInput(per_input) => per_input
            .into_iter()
            .map(|scores| {
                scores
                    .into_iter()
                    .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
                    .map(to_classification)
                    .context("Inference API returned an empty score list")
            })
            .collect(),
        InferenceResponse::TopOnly(top) => Ok(top.into_iter().map(to_classification).collect()),
    }
}

fn to_classification(raw: LabelScore) -> Classification {
    let label = Sentiment::from_model_label(&raw.label).unwrap_or_else(|| {
        warn!("Unknown model label {:?}, treating as Neutral", raw.label);
        Sentiment::Neutral
    });
    Classification {
        label,
        score: raw.score,
    }
}

#[async_trait]
impl SentimentClassifier for HostedClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>> {
        let mut predictions = Vec::with_capacity(texts.len());

        for (i, request) in self.requests(texts).iter().enumerate() {
            debug!("Classifying batch {} ({} texts) with {}", i, request.inputs.len(), self.model);
            predictions.extend(self.send(request).await?);
        }

        Ok(predictions)
    }
}
