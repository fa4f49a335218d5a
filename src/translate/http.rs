use super::{TranslateError, TranslationRequest, TranslationResponse, Translator};
use crate::config::TranslationConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Error bodies longer than this are cut before they reach logs or users.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// JSON-over-HTTP translator (reqwest).
pub struct HttpTranslator {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn from_config(config: &TranslationConfig) -> anyhow::Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        if request.is_blank() {
            return Err(TranslateError::EmptyInput);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            source = request.source_lang.as_str(),
            target = request.target_lang.as_str(),
            text_len = request.text.len(),
            "Sending translation request"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(TranslateError::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TranslateError::Transport)?;

        if !status.is_success() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let parsed: TranslationResponse =
            serde_json::from_str(&body).map_err(|e| TranslateError::Decode(e.to_string()))?;
        Ok(parsed.translated)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
