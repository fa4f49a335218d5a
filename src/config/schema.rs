use crate::display::DisplayPreferences;
use crate::language::LanguageCode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "LINGOTOUCH_CONFIG";

// ── Top-level config ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where this config was loaded from (not serialized).
    #[serde(skip)]
    pub config_path: PathBuf,

    pub translation: TranslationConfig,
    pub languages: LanguagesConfig,
    pub speech: SpeechConfig,
    pub haptics: HapticsConfig,
    pub display: DisplayPreferences,
    pub sign_language: SignLanguageConfig,
    pub export: ExportConfig,
    pub gateway: GatewayConfig,
}

// ── Sections ─────────────────────────────────────────────────────

/// Remote translation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Endpoint accepting `{ text, sourceLang, targetLang }`.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/api/translate".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagesConfig {
    pub source: LanguageCode,
    pub target: LanguageCode,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            source: LanguageCode::DEFAULT_SOURCE,
            target: LanguageCode::DEFAULT_TARGET,
        }
    }
}

/// Speech synthesis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Synthesis program invoked by the command adapter.
    pub command: String,
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak-ng".into(),
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub enabled: bool,
    /// Alternating on/off durations in milliseconds.
    pub pattern_ms: Vec<u64>,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pattern_ms: vec![100, 50, 100],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignLanguageConfig {
    pub enabled: bool,
    pub base_url: String,
}

impl Default for SignLanguageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: crate::sign::DEFAULT_ANIMATION_URL.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory braille files are written to.
    pub dir: PathBuf,
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            filename: crate::export::DEFAULT_EXPORT_FILENAME.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Allow binding to a non-loopback address.
    pub allow_public_bind: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            allow_public_bind: false,
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

/// Default config location: `<platform config dir>/lingotouch/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "lingotouch", "lingotouch")
        .context("Could not determine a config directory for this platform")?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Resolve the config path: explicit flag, then env var, then platform default.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => default_config_path(),
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            Self::from_toml_str(&contents)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };
        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document, warning about keys this version does not know.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse_reporting_unknown(contents, |path| {
            tracing::warn!(key = %path, "Ignoring unknown config key");
        })
    }

    /// Parse `contents`, passing the dotted path of every unknown key to
    /// `on_unknown`.
    fn parse_reporting_unknown(
        contents: &str,
        mut on_unknown: impl FnMut(serde_ignored::Path<'_>),
    ) -> Result<Self> {
        let value: toml::Value = toml::from_str(contents)?;
        let config: Self = serde_ignored::deserialize(value, |path| on_unknown(path))?;
        Ok(config)
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this config to `self.config_path`, creating parent directories.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.config_path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;
        Ok(())
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        if self.translation.endpoint.trim().is_empty() {
            anyhow::bail!("translation.endpoint cannot be empty");
        }
        if self.translation.timeout_secs == 0 {
            anyhow::bail!("translation.timeout_secs must be greater than zero");
        }
        if self.export.filename.trim().is_empty() {
            anyhow::bail!("export.filename cannot be empty");
        }
        if self.sign_language.enabled && self.sign_language.base_url.trim().is_empty() {
            anyhow::bail!("sign_language.base_url cannot be empty when sign_language is enabled");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_front_end() {
        let config = Config::default();
        assert_eq!(config.languages.source, LanguageCode::En);
        assert_eq!(config.languages.target, LanguageCode::Es);
        assert!((config.speech.rate - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.haptics.pattern_ms, vec![100, 50, 100]);
        assert_eq!(config.export.filename, "braille.txt");
        assert!(!config.display.high_contrast);
        assert!(!config.display.dyslexia_font);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let toml_str = r#"
[languages]
target = "fr"

[display]
high_contrast = true
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.languages.source, LanguageCode::En);
        assert_eq!(config.languages.target, LanguageCode::Fr);
        assert!(config.display.high_contrast);
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let toml_str = r#"
mystery = 1

[speech]
enabled = false
voice = "robot"
"#;
        let mut unknown = Vec::new();
        let config =
            Config::parse_reporting_unknown(toml_str, |path| unknown.push(path.to_string()))
                .unwrap();
        assert!(!config.speech.enabled);
        unknown.sort();
        assert_eq!(unknown, vec!["mystery", "speech.voice"]);
    }

    #[test]
    fn known_keys_report_nothing_unknown() {
        let toml_str = Config::default().to_toml_string().unwrap();
        let mut unknown = Vec::new();
        Config::parse_reporting_unknown(&toml_str, |path| unknown.push(path.to_string()))
            .unwrap();
        assert!(unknown.is_empty(), "{unknown:?}");
    }

    #[test]
    fn speech_params_render_as_written() {
        let toml_str = Config::default().to_toml_string().unwrap();
        assert!(toml_str.contains("rate = 0.9\n"), "{toml_str}");
        assert!(!toml_str.contains("0.89999"), "{toml_str}");
    }

    #[test]
    fn unsupported_language_fails_to_parse() {
        let toml_str = "[languages]\nsource = \"xx\"\n";
        assert!(Config::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn validate_rejects_empty_endpoint() {
        let mut config = Config::default();
        config.translation.endpoint = "  ".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("translation.endpoint"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.translation.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_export_filename() {
        let mut config = Config::default();
        config.export.filename = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.config_path, path);
        assert_eq!(config.languages.target, LanguageCode::Es);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config {
            config_path: path.clone(),
            ..Config::default()
        };
        config.languages.target = LanguageCode::Hi;
        config.haptics.pattern_ms = vec![200, 100];
        config.save().unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.languages.target, LanguageCode::Hi);
        assert_eq!(loaded.haptics.pattern_ms, vec![200, 100]);
    }

    #[test]
    fn explicit_path_wins_resolution() {
        let path = Path::new("/tmp/custom-lingotouch.toml");
        assert_eq!(resolve_config_path(Some(path)).unwrap(), path);
    }
}
