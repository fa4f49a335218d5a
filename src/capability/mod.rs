//! Device capability ports: speech input, speech output, haptic feedback.
//!
//! Orchestration code talks only to these traits, so it runs the same under
//! a terminal, a test harness, or a future mobile bridge. Concrete adapters
//! live in [`console`].
//!
//! ## Design
//! - One async trait per capability, `Send + Sync` so they sit behind `Arc`
//! - Plain value types ([`Utterance`], [`VibrationPattern`]) carry parameters
//! - Factories pick an adapter from config; disabled capabilities get a no-op

pub mod console;

use crate::config::{HapticsConfig, SpeechConfig};
use crate::language::LanguageCode;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use console::{
    CommandSpeechOutput, NoopHaptics, PromptSpeechInput, SilentSpeechOutput, TerminalHaptics,
};

// ── Utterance ────────────────────────────────────────────────────

/// Text to be spoken, with synthesis parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: LanguageCode,
    /// Speaking rate multiplier (1.0 = normal).
    pub rate: f32,
    /// Pitch multiplier (1.0 = normal).
    pub pitch: f32,
    /// Volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Utterance {
    pub const DEFAULT_RATE: f32 = 0.9;
    pub const DEFAULT_PITCH: f32 = 1.0;
    pub const DEFAULT_VOLUME: f32 = 1.0;

    pub fn new(text: impl Into<String>, lang: LanguageCode) -> Self {
        Self {
            text: text.into(),
            lang,
            rate: Self::DEFAULT_RATE,
            pitch: Self::DEFAULT_PITCH,
            volume: Self::DEFAULT_VOLUME,
        }
    }

    /// Set synthesis parameters, clamped to rate 0.1–10, pitch 0–2, volume 0–1.
    /// Non-finite values fall back to the defaults.
    pub fn with_params(mut self, rate: f32, pitch: f32, volume: f32) -> Self {
        self.rate = finite_or(rate, Self::DEFAULT_RATE).clamp(0.1, 10.0);
        self.pitch = finite_or(pitch, Self::DEFAULT_PITCH).clamp(0.0, 2.0);
        self.volume = finite_or(volume, Self::DEFAULT_VOLUME).clamp(0.0, 1.0);
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

// ── Vibration pattern ────────────────────────────────────────────

/// Alternating vibrate/pause durations in milliseconds, starting with vibrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VibrationPattern(Vec<u64>);

impl VibrationPattern {
    pub fn new(durations_ms: Vec<u64>) -> Self {
        Self(durations_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|ms| *ms == 0)
    }

    /// `(vibrate?, duration)` steps in order.
    pub fn steps(&self) -> impl Iterator<Item = (bool, Duration)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, ms)| (i % 2 == 0, Duration::from_millis(*ms)))
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.0.iter().sum())
    }
}

impl Default for VibrationPattern {
    /// Short double pulse: 100 ms on, 50 ms off, 100 ms on.
    fn default() -> Self {
        Self(vec![100, 50, 100])
    }
}

// ── Ports ────────────────────────────────────────────────────────

/// Captures one spoken (or dictated) utterance.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Returns `None` when nothing was recognized.
    async fn listen(&self, lang: LanguageCode) -> anyhow::Result<Option<String>>;

    fn name(&self) -> &str;
}

/// Speaks text aloud.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, utterance: &Utterance) -> anyhow::Result<()>;

    fn name(&self) -> &str;
}

/// Plays a vibration pattern.
#[async_trait]
pub trait HapticFeedback: Send + Sync {
    async fn vibrate(&self, pattern: &VibrationPattern) -> anyhow::Result<()>;

    fn name(&self) -> &str;
}

// ── Factories ────────────────────────────────────────────────────

/// Speech output adapter for `config`.
pub fn create_speech_output(config: &SpeechConfig) -> Arc<dyn SpeechOutput> {
    if !config.enabled || config.command.trim().is_empty() {
        return Arc::new(SilentSpeechOutput);
    }
    Arc::new(CommandSpeechOutput::new(config.command.trim()))
}

/// Haptic adapter for `config`.
pub fn create_haptics(config: &HapticsConfig) -> Arc<dyn HapticFeedback> {
    if config.enabled {
        Arc::new(TerminalHaptics)
    } else {
        Arc::new(NoopHaptics)
    }
}
