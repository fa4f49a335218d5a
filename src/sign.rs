//! Links to the hosted sign-language animation service.
//!
//! The service renders an animated signer for a text query parameter; this
//! module only builds the URL. Rendering is the client's job.

/// Public animation endpoint used when no override is configured.
pub const DEFAULT_ANIMATION_URL: &str = "https://media.signlanguageapi.com/animate";

/// Builds sign-language animation links for translated text.
#[derive(Debug, Clone)]
pub struct SignLanguageLinker {
    base_url: String,
}

impl SignLanguageLinker {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches(['?', '/']).to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Animation URL for `text`, or `None` when there is nothing to sign.
    ///
    /// Encoded the way browsers encode a URI component: ASCII alphanumerics
    /// and `-_.!~*'()` stay as they are, everything else is percent-encoded
    /// (spaces become `%20`, not `+`).
    pub fn url_for(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        Some(format!(
            "{}?text={}",
            self.base_url,
            encode_component(text)
        ))
    }
}

/// Marks that `urlencoding` escapes but a URI component leaves alone.
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

fn encode_component(text: &str) -> String {
    UNRESERVED_MARKS
        .iter()
        .fold(urlencoding::encode(text).into_owned(), |encoded, (escaped, mark)| {
            encoded.replace(escaped, mark)
        })
}

impl Default for SignLanguageLinker {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_URL)
    }
}
