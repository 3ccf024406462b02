use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, ClientBuilder};
use serde_json::json;

use crate::config::AppConfig;
use crate::errors::{BiasEngineError, Result};
use crate::models::Sentiment;
use crate::providers::SentimentClassifier;

// FinBERT принимает 512 токенов, это примерно 2000 символов
const MAX_TEXT_CHARS: usize = 2000;

/// Клиент NLP-сервиса: POST {url}/analyze c `{"text": ...}`.
#[derive(Clone)]
pub struct HttpSentimentClassifier {
    client: Client,
    analyze_url: String,
}

impl HttpSentimentClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new().timeout(timeout).build()?;
        Ok(HttpSentimentClassifier {
            client,
            analyze_url: format!("{}/analyze", base_url.trim_end_matches('/')),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.nlp_service_url, config.classifier_timeout())
    }

    fn clean_text(&self, text: &str) -> Result<String> {
        let html_regex = Regex::new(r"<[^>]+>")?;
        let url_regex = Regex::new(r"http\S+|www\.\S+")?;
        let whitespace_regex = Regex::new(r"\s+")?;

        let cleaned = html_regex.replace_all(text, " ");
        let cleaned = url_regex.replace_all(&cleaned, " ");
        let cleaned = whitespace_regex.replace_all(&cleaned, " ");

        Ok(cleaned.trim().to_string())
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn analyze(&self, text: &str) -> Result<Sentiment> {
        let cleaned = self.clean_text(text)?;
        if cleaned.is_empty() {
            return Err(BiasEngineError::InvalidDataFormat("пустой текст статьи".to_string()));
        }

        let payload = json!({ "text": truncate_chars(&cleaned, MAX_TEXT_CHARS) });

        let response = self
            .client
            .post(&self.analyze_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BiasEngineError::ApiError(format!("NLP сервис вернул {}", status)));
        }

        let sentiment: Sentiment = response.json().await?;
        tracing::debug!(
            "Классификатор: positive={:.2}, neutral={:.2}, negative={:.2}",
            sentiment.positive,
            sentiment.neutral,
            sentiment.negative
        );
        Ok(sentiment)
    }
}
