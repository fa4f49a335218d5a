//! Languages offered by the translation front-end.

use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes selectable as translation source or target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En, // English
    Es, // Spanish
    Fr, // French
    De, // German
    Hi, // Hindi
    Bn, // Bengali
}

impl LanguageCode {
    /// Default input language.
    pub const DEFAULT_SOURCE: Self = Self::En;
    /// Default output language.
    pub const DEFAULT_TARGET: Self = Self::Es;

    /// Get the ISO 639-1 code string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Hi => "hi",
            Self::Bn => "bn",
        }
    }

    /// Get the human-readable language name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::Hi => "Hindi",
            Self::Bn => "Bengali",
        }
    }

    /// Parse from string code (case-insensitive, surrounding whitespace ignored).
    pub fn from_str_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            "de" => Some(Self::De),
            "hi" => Some(Self::Hi),
            "bn" => Some(Self::Bn),
            _ => None,
        }
    }

    /// All supported languages, in selector order.
    pub fn all() -> &'static [LanguageCode] {
        &[Self::En, Self::Es, Self::Fr, Self::De, Self::Hi, Self::Bn]
    }

    /// Comma-separated list of codes, for error messages.
    pub fn supported_codes() -> String {
        Self::all()
            .iter()
            .map(|lang| lang.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_code(s).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported language '{s}'. Supported values: {}",
                Self::supported_codes()
            )
        })
    }
}
