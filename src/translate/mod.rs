//! Client side of the remote translation service.
//!
//! ## Protocol
//!
//! ```text
//! POST {endpoint}
//! { "text": "...", "sourceLang": "en", "targetLang": "es" }
//!   ◂── { "translated": "..." }
//! ```
//!
//! How the service translates is its own business; this module only
//! builds requests from [`SessionSettings`] and classifies failures.

pub mod http;

use crate::language::LanguageCode;
use crate::pipeline::SessionSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpTranslator;

// ── Wire types ───────────────────────────────────────────────────

/// Body sent to the translation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: LanguageCode,
    pub target_lang: LanguageCode,
}

impl TranslationRequest {
    /// Build a request for `text` using the languages selected in `settings`.
    pub fn new(text: impl Into<String>, settings: &SessionSettings) -> Self {
        Self {
            text: text.into(),
            source_lang: settings.source,
            target_lang: settings.target,
        }
    }

    /// Whether there is anything worth sending.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Body returned by the translation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated: String,
}

// ── Errors ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("nothing to translate: input text is empty")]
    EmptyInput,

    #[error("translation service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("translation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("translation service sent an unreadable response: {0}")]
    Decode(String),
}

impl TranslateError {
    /// Whether the failure came from the service rather than the caller's input.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::EmptyInput)
    }
}

// ── Translator port ──────────────────────────────────────────────

/// Anything that can turn a [`TranslationRequest`] into translated text.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
