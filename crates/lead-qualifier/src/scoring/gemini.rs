//! Gemini `generateContent` adapter for the intent classifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::{build_prompt, parse_completion, ClassifierError, IntentClassifier};
use super::domain::{Classification, Lead, Offer};
use crate::config::ClassifierConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClassifierError::Transport(err.to_string()))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, ClassifierError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ClassifierError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ClassifierError::MalformedResponse(err.without_url().to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ClassifierError::EmptyCompletion);
        }

        Ok(text)
    }
}

#[async_trait]
impl IntentClassifier for GeminiClassifier {
    async fn classify(
        &self,
        lead: &Lead,
        offer: &Offer,
    ) -> Result<Classification, ClassifierError> {
        let prompt = build_prompt(lead, offer)?;
        let completion = self.generate(&prompt).await?;
        let classification = parse_completion(&completion);
        debug!(intent = %classification.intent, "gemini classification parsed");
        Ok(classification)
    }
}
