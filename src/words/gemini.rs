use super::{choose_pair, parse_word_pairs, WordSource};
use crate::error::GameError;
use crate::game::WordPair;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generates word pairs with the Google Gemini API.
pub struct GeminiWordSource {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiWordSource {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn prompt(topic: &str) -> String {
        format!(
            "Generate 10 pairs of related but different words based on the interests: {}. \
             Each pair should be similar but distinct enough to create an interesting game dynamic. \
             Format the response as a JSON array of objects with 'common' and 'undercover' properties.",
            topic
        )
    }

    async fn request_text(&self, topic: &str) -> Result<String, reqwest::Error> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": Self::prompt(topic) }] }]
        });
        let response: GenerateContentResponse = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect())
    }
}

#[async_trait]
impl WordSource for GeminiWordSource {
    async fn generate_pair(&self, topic: &str) -> Result<WordPair, GameError> {
        let text = self.request_text(topic).await.map_err(|err| {
            log::error!("Word generation request failed: {}", err);
            GameError::GenerationFailed
        })?;
        let pairs = parse_word_pairs(&text)?;
        choose_pair(&pairs, &mut rand::thread_rng())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
