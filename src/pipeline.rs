//! Translation pipeline: text in, translation + braille + speech + haptics out.
//!
//! ```text
//! input ──▸ Translator ──▸ translated ──┬──▸ transcode ──▸ braille
//!                                       ├──▸ SignLanguageLinker ──▸ link
//!                                       ├──▸ SpeechOutput (target language)
//!                                       └──▸ HapticFeedback
//! ```
//!
//! Speech and haptics are best-effort: their failures are logged and never
//! take away the translation or the braille result.

use crate::braille;
use crate::capability::{
    HapticFeedback, NoopHaptics, SilentSpeechOutput, SpeechInput, SpeechOutput, Utterance,
    VibrationPattern,
};
use crate::config::Config;
use crate::display::DisplayPreferences;
use crate::language::LanguageCode;
use crate::sign::SignLanguageLinker;
use crate::translate::{TranslateError, TranslationRequest, Translator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

// ── Session settings ─────────────────────────────────────────────

/// The user's current selections, captured as one immutable value.
///
/// Changing a language produces a new value; requests built from an older
/// value are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub source: LanguageCode,
    pub target: LanguageCode,
    pub display: DisplayPreferences,
}

impl SessionSettings {
    pub fn new(source: LanguageCode, target: LanguageCode) -> Self {
        Self {
            source,
            target,
            display: DisplayPreferences::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            source: config.languages.source,
            target: config.languages.target,
            display: config.display,
        }
    }

    pub fn with_source(self, source: LanguageCode) -> Self {
        Self { source, ..self }
    }

    pub fn with_target(self, target: LanguageCode) -> Self {
        Self { target, ..self }
    }

    pub fn with_display(self, display: DisplayPreferences) -> Self {
        Self { display, ..self }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(LanguageCode::DEFAULT_SOURCE, LanguageCode::DEFAULT_TARGET)
    }
}

// ── Outcome ──────────────────────────────────────────────────────

/// Everything produced for one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOutcome {
    pub source_text: String,
    pub translated: String,
    pub braille: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_language_url: Option<String>,
    pub source_lang: LanguageCode,
    pub target_lang: LanguageCode,
}

// ── Pipeline ─────────────────────────────────────────────────────

/// Runs translations and fans the result out to the output channels.
pub struct TranslationPipeline {
    translator: Arc<dyn Translator>,
    speech: Arc<dyn SpeechOutput>,
    haptics: Arc<dyn HapticFeedback>,
    sign_linker: Option<SignLanguageLinker>,
    speech_rate: f32,
    speech_pitch: f32,
    speech_volume: f32,
    vibration: VibrationPattern,
}

impl TranslationPipeline {
    /// Pipeline with silent speech, no haptics and the default sign-language service.
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            speech: Arc::new(SilentSpeechOutput),
            haptics: Arc::new(NoopHaptics),
            sign_linker: Some(SignLanguageLinker::default()),
            speech_rate: Utterance::DEFAULT_RATE,
            speech_pitch: Utterance::DEFAULT_PITCH,
            speech_volume: Utterance::DEFAULT_VOLUME,
            vibration: VibrationPattern::default(),
        }
    }

    /// Pipeline wired from config (speech/haptics adapters chosen by the caller).
    pub fn from_config(
        config: &Config,
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechOutput>,
        haptics: Arc<dyn HapticFeedback>,
    ) -> Self {
        let sign_linker = config
            .sign_language
            .enabled
            .then(|| SignLanguageLinker::new(config.sign_language.base_url.clone()));

        Self {
            translator,
            speech,
            haptics,
            sign_linker,
            speech_rate: config.speech.rate as f32,
            speech_pitch: config.speech.pitch as f32,
            speech_volume: config.speech.volume as f32,
            vibration: VibrationPattern::new(config.haptics.pattern_ms.clone()),
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechOutput>) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn HapticFeedback>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn with_sign_linker(mut self, linker: Option<SignLanguageLinker>) -> Self {
        self.sign_linker = linker;
        self
    }

    pub fn with_vibration(mut self, pattern: VibrationPattern) -> Self {
        self.vibration = pattern;
        self
    }

    /// Translate `text` without speaking or vibrating.
    pub async fn translate_only(
        &self,
        text: &str,
        settings: &SessionSettings,
    ) -> Result<TranslationOutcome, TranslateError> {
        let request = TranslationRequest::new(text, settings);
        if request.is_blank() {
            return Err(TranslateError::EmptyInput);
        }

        let started = Instant::now();
        let translated = self.translator.translate(&request).await?;
        let braille = braille::transcode(&translated);
        let sign_language_url = self
            .sign_linker
            .as_ref()
            .and_then(|linker| linker.url_for(&translated));

        tracing::info!(
            translator = self.translator.name(),
            source = settings.source.as_str(),
            target = settings.target.as_str(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            braille_cells = braille.chars().count(),
            "Translation complete"
        );

        Ok(TranslationOutcome {
            source_text: request.text,
            translated,
            braille,
            sign_language_url,
            source_lang: settings.source,
            target_lang: settings.target,
        })
    }

    /// Translate `text`, then speak the translation and play the haptic pattern.
    pub async fn run(
        &self,
        text: &str,
        settings: &SessionSettings,
    ) -> Result<TranslationOutcome, TranslateError> {
        let outcome = self.translate_only(text, settings).await?;
        self.announce(&outcome).await;
        Ok(outcome)
    }

    /// Speak and vibrate for an outcome. Failures are logged, not returned.
    pub async fn announce(&self, outcome: &TranslationOutcome) {
        let utterance = Utterance::new(outcome.translated.clone(), outcome.target_lang)
            .with_params(self.speech_rate, self.speech_pitch, self.speech_volume);

        if let Err(e) = self.speech.speak(&utterance).await {
            tracing::warn!(
                speech = self.speech.name(),
                error = %e,
                "Speech output failed"
            );
        }

        if let Err(e) = self.haptics.vibrate(&self.vibration).await {
            tracing::warn!(
                haptics = self.haptics.name(),
                error = %e,
                "Haptic feedback failed"
            );
        }
    }
}

/// Capture one utterance for the input box, in the source language.
pub async fn dictate(
    input: &dyn SpeechInput,
    settings: &SessionSettings,
) -> anyhow::Result<Option<String>> {
    let heard = input.listen(settings.source).await?;
    if heard.is_none() {
        tracing::info!(
            input = input.name(),
            lang = settings.source.as_str(),
            "Nothing recognized"
        );
    }
    Ok(heard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Upper-cases its input, tagged with the target language.
    #[derive(Default)]
    struct FakeTranslator {
        calls: AtomicUsize,
        last: Mutex<Option<TranslationRequest>>,
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(match request.target_lang {
                LanguageCode::Es => "Hola Bob".to_string(),
                _ => request.text.to_uppercase(),
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _request: &TranslationRequest) -> Result<String, TranslateError> {
            Err(TranslateError::Status {
                status: 500,
                body: "boom".into(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[derive(Default)]
    struct RecordingSpeech {
        spoken: Mutex<Vec<Utterance>>,
    }

    #[async_trait]
    impl SpeechOutput for RecordingSpeech {
        async fn speak(&self, utterance: &Utterance) -> anyhow::Result<()> {
            self.spoken.lock().unwrap().push(utterance.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct BrokenSpeech;

    #[async_trait]
    impl SpeechOutput for BrokenSpeech {
        async fn speak(&self, _utterance: &Utterance) -> anyhow::Result<()> {
            anyhow::bail!("synthesis unavailable")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[derive(Default)]
    struct CountingHaptics {
        pulses: AtomicUsize,
    }

    #[async_trait]
    impl HapticFeedback for CountingHaptics {
        async fn vibrate(&self, _pattern: &VibrationPattern) -> anyhow::Result<()> {
            self.pulses.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct BrokenHaptics;

    #[async_trait]
    impl HapticFeedback for BrokenHaptics {
        async fn vibrate(&self, _pattern: &VibrationPattern) -> anyhow::Result<()> {
            anyhow::bail!("no vibration motor")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    struct ScriptedInput(Option<&'static str>);

    #[async_trait]
    impl SpeechInput for ScriptedInput {
        async fn listen(&self, _lang: LanguageCode) -> anyhow::Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn run_produces_translation_braille_and_link() {
        let pipeline = TranslationPipeline::new(Arc::new(FakeTranslator::default()));
        let outcome = pipeline
            .run("Hi Bob", &SessionSettings::default())
            .await
            .unwrap();

        assert_eq!(outcome.source_text, "Hi Bob");
        assert_eq!(outcome.translated, "Hola Bob");
        assert_eq!(outcome.braille, "⠓⠕⠇⠁ ⠃⠕⠃");
        assert_eq!(
            outcome.sign_language_url.as_deref(),
            Some("https://media.signlanguageapi.com/animate?text=Hola%20Bob")
        );
        assert_eq!(outcome.source_lang, LanguageCode::En);
        assert_eq!(outcome.target_lang, LanguageCode::Es);
    }

    #[tokio::test]
    async fn request_uses_settings_languages() {
        let translator = Arc::new(FakeTranslator::default());
        let pipeline = TranslationPipeline::new(translator.clone());
        let settings = SessionSettings::new(LanguageCode::Fr, LanguageCode::De);

        pipeline.run("bonjour", &settings).await.unwrap();

        let last = translator.last.lock().unwrap().clone().unwrap();
        assert_eq!(last.source_lang, LanguageCode::Fr);
        assert_eq!(last.target_lang, LanguageCode::De);
        assert_eq!(last.text, "bonjour");
    }

    #[tokio::test]
    async fn speech_gets_translated_text_in_target_language() {
        let speech = Arc::new(RecordingSpeech::default());
        let haptics = Arc::new(CountingHaptics::default());
        let pipeline = TranslationPipeline::new(Arc::new(FakeTranslator::default()))
            .with_speech(speech.clone())
            .with_haptics(haptics.clone());

        pipeline
            .run("Hi Bob", &SessionSettings::default())
            .await
            .unwrap();

        let spoken = speech.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Hola Bob");
        assert_eq!(spoken[0].lang, LanguageCode::Es);
        assert_eq!(haptics.pulses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn translate_only_skips_speech_and_haptics() {
        let speech = Arc::new(RecordingSpeech::default());
        let haptics = Arc::new(CountingHaptics::default());
        let pipeline = TranslationPipeline::new(Arc::new(FakeTranslator::default()))
            .with_speech(speech.clone())
            .with_haptics(haptics.clone());

        pipeline
            .translate_only("cat", &SessionSettings::default())
            .await
            .unwrap();

        assert!(speech.spoken.lock().unwrap().is_empty());
        assert_eq!(haptics.pulses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn collaborator_failures_do_not_block_outcome() {
        let pipeline = TranslationPipeline::new(Arc::new(FakeTranslator::default()))
            .with_speech(Arc::new(BrokenSpeech))
            .with_haptics(Arc::new(BrokenHaptics));

        let outcome = pipeline
            .run("Hi Bob", &SessionSettings::default())
            .await
            .unwrap();
        assert_eq!(outcome.braille, "⠓⠕⠇⠁ ⠃⠕⠃");
    }

    #[tokio::test]
    async fn translator_failure_is_returned() {
        let speech = Arc::new(RecordingSpeech::default());
        let pipeline =
            TranslationPipeline::new(Arc::new(FailingTranslator)).with_speech(speech.clone());

        let err = pipeline
            .run("cat", &SessionSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Status { status: 500, .. }));
        assert!(speech.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_input_rejected_before_translator() {
        let translator = Arc::new(FakeTranslator::default());
        let pipeline = TranslationPipeline::new(translator.clone());

        let err = pipeline
            .run("  ", &SessionSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::EmptyInput));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn translation_without_mappable_chars_gives_empty_braille() {
        let pipeline = TranslationPipeline::new(Arc::new(FakeTranslator::default()));
        let settings = SessionSettings::new(LanguageCode::En, LanguageCode::Hi);

        let outcome = pipeline.run("123!", &settings).await.unwrap();
        assert_eq!(outcome.translated, "123!");
        assert_eq!(outcome.braille, "");
    }

    #[tokio::test]
    async fn sign_link_can_be_disabled() {
        let pipeline =
            TranslationPipeline::new(Arc::new(FakeTranslator::default())).with_sign_linker(None);
        let outcome = pipeline
            .run("cat", &SessionSettings::default())
            .await
            .unwrap();
        assert_eq!(outcome.sign_language_url, None);
    }

    #[tokio::test]
    async fn from_config_respects_sign_language_toggle() {
        let mut config = Config::default();
        config.sign_language.enabled = false;
        let pipeline = TranslationPipeline::from_config(
            &config,
            Arc::new(FakeTranslator::default()),
            Arc::new(SilentSpeechOutput),
            Arc::new(NoopHaptics),
        );
        let outcome = pipeline
            .run("cat", &SessionSettings::from_config(&config))
            .await
            .unwrap();
        assert_eq!(outcome.sign_language_url, None);
    }

    #[test]
    fn settings_updates_produce_new_values() {
        let original = SessionSettings::default();
        let changed = original.with_target(LanguageCode::Bn);

        assert_eq!(original.target, LanguageCode::Es);
        assert_eq!(changed.target, LanguageCode::Bn);
        assert_eq!(changed.source, original.source);
    }

    #[test]
    fn settings_from_config() {
        let mut config = Config::default();
        config.languages.source = LanguageCode::De;
        config.display.high_contrast = true;

        let settings = SessionSettings::from_config(&config);
        assert_eq!(settings.source, LanguageCode::De);
        assert!(settings.display.high_contrast);
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let outcome = TranslationOutcome {
            source_text: "cat".into(),
            translated: "gato".into(),
            braille: "⠛⠁⠞⠕".into(),
            sign_language_url: None,
            source_lang: LanguageCode::En,
            target_lang: LanguageCode::Es,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["sourceText"], "cat");
        assert_eq!(json["targetLang"], "es");
        assert!(json.get("signLanguageUrl").is_none());
    }

    #[tokio::test]
    async fn dictate_returns_recognized_text() {
        let settings = SessionSettings::default();
        let heard = dictate(&ScriptedInput(Some("hello")), &settings)
            .await
            .unwrap();
        assert_eq!(heard.as_deref(), Some("hello"));

        let nothing = dictate(&ScriptedInput(None), &settings).await.unwrap();
        assert_eq!(nothing, None);
    }
}
