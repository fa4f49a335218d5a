//! Terminal and desktop adapters for the capability ports.

use super::{HapticFeedback, SpeechInput, SpeechOutput, Utterance, VibrationPattern};
use crate::language::LanguageCode;
use anyhow::Context;
use async_trait::async_trait;
use std::io::Write as _;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

// ── Speech input ─────────────────────────────────────────────────

/// Dictation fallback: reads one line per utterance.
///
/// Terminals have no microphone API, so "listening" means waiting for the
/// user (or an external recognizer piping into stdin) to produce a line.
pub struct PromptSpeechInput<R> {
    reader: Mutex<R>,
    show_prompt: bool,
}

impl PromptSpeechInput<BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self {
            reader: Mutex::new(BufReader::new(tokio::io::stdin())),
            show_prompt: true,
        }
    }
}

impl<R> PromptSpeechInput<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Read from an arbitrary source without printing a prompt.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
            show_prompt: false,
        }
    }
}

#[async_trait]
impl<R> SpeechInput for PromptSpeechInput<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn listen(&self, lang: LanguageCode) -> anyhow::Result<Option<String>> {
        if self.show_prompt {
            eprint!("🎤 Speak ({}) and press Enter: ", lang.display_name());
            std::io::stderr().flush().ok();
        }

        let mut line = String::new();
        let read = self
            .reader
            .lock()
            .await
            .read_line(&mut line)
            .await
            .context("Failed to read dictated text")?;

        let transcript = line.trim();
        if read == 0 || transcript.is_empty() {
            tracing::debug!(lang = lang.as_str(), "No speech recognized");
            return Ok(None);
        }
        Ok(Some(transcript.to_string()))
    }

    fn name(&self) -> &str {
        "prompt"
    }
}

// ── Speech output ────────────────────────────────────────────────

/// Words per minute at rate 1.0 (espeak-ng default).
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speaks through an external synthesizer with an espeak-compatible CLI.
///
/// Text goes over stdin (`--stdin`) so it is never parsed as flags.
pub struct CommandSpeechOutput {
    program: String,
}

impl CommandSpeechOutput {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command-line arguments for `utterance`.
    pub fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
        // espeak pitch: 0–99, 50 = normal. amplitude: 0–200, 100 = normal.
        let pitch = ((utterance.pitch * 50.0).round() as u32).min(99);
        let amplitude = (utterance.volume * 100.0).round() as u32;

        vec![
            "-v".into(),
            utterance.lang.as_str().into(),
            "-s".into(),
            words_per_minute.to_string(),
            "-p".into(),
            pitch.to_string(),
            "-a".into(),
            amplitude.to_string(),
            "--stdin".into(),
        ]
    }
}

#[async_trait]
impl SpeechOutput for CommandSpeechOutput {
    async fn speak(&self, utterance: &Utterance) -> anyhow::Result<()> {
        if utterance.text.trim().is_empty() {
            return Ok(());
        }

        tracing::debug!(
            program = %self.program,
            lang = utterance.lang.as_str(),
            text_len = utterance.text.len(),
            "Speaking utterance"
        );

        let mut child = tokio::process::Command::new(&self.program)
            .args(self.args_for(utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start speech synthesizer '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(utterance.text.as_bytes()).await {
                // The synthesizer may exit before reading everything.
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e).context("Failed to send text to speech synthesizer");
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .context("Speech synthesizer did not finish")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Speech synthesizer '{}' failed ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Speech output that does nothing (speech disabled).
pub struct SilentSpeechOutput;

#[async_trait]
impl SpeechOutput for SilentSpeechOutput {
    async fn speak(&self, _utterance: &Utterance) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "silent"
    }
}

// ── Haptics ──────────────────────────────────────────────────────

/// Approximates vibration with the terminal bell: one BEL per pulse,
/// with the pattern's timing preserved.
pub struct TerminalHaptics;

#[async_trait]
impl HapticFeedback for TerminalHaptics {
    async fn vibrate(&self, pattern: &VibrationPattern) -> anyhow::Result<()> {
        if pattern.is_empty() {
            return Ok(());
        }

        for (pulse, duration) in pattern.steps() {
            if pulse && !duration.is_zero() {
                let mut stderr = std::io::stderr();
                stderr.write_all(b"\x07")?;
                stderr.flush()?;
            }
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Haptics that do nothing (no vibration hardware, or disabled).
pub struct NoopHaptics;

#[async_trait]
impl HapticFeedback for NoopHaptics {
    async fn vibrate(&self, _pattern: &VibrationPattern) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
