//! Terminal rendering of translation results with accessibility options.

use crate::pipeline::TranslationOutcome;
use console::Style;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Reader-facing accessibility toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    /// Dyslexia-friendly layout: extra spacing between words and sections.
    pub dyslexia_font: bool,
    /// White-on-black, bold output.
    pub high_contrast: bool,
}

impl DisplayPreferences {
    fn heading_style(self) -> Style {
        if self.high_contrast {
            Style::new().white().on_black().bold().underlined()
        } else {
            Style::new().bold()
        }
    }

    fn body_style(self) -> Style {
        if self.high_contrast {
            Style::new().white().on_black().bold()
        } else {
            Style::new()
        }
    }

    fn section_gap(self) -> &'static str {
        if self.dyslexia_font {
            "\n\n"
        } else {
            "\n"
        }
    }
}

/// Widen word gaps for dyslexia-friendly reading.
fn spaced_words(text: &str) -> String {
    text.split(' ').collect::<Vec<_>>().join("   ")
}

/// Render an outcome as terminal text.
///
/// Styling is applied through `console`, which drops escape codes when the
/// output is not a color terminal. The translated text keeps its original
/// casing; only the braille line reflects case folding.
pub fn render(outcome: &TranslationOutcome, prefs: &DisplayPreferences) -> String {
    let heading = prefs.heading_style();
    let body = prefs.body_style();
    let gap = prefs.section_gap();

    let translated = if prefs.dyslexia_font {
        spaced_words(&outcome.translated)
    } else {
        outcome.translated.clone()
    };

    let mut out = String::new();
    let _ = write!(
        out,
        "{}\n{}{gap}",
        heading.apply_to(format!(
            "Translation ({} → {}):",
            outcome.source_lang.display_name(),
            outcome.target_lang.display_name()
        )),
        body.apply_to(translated)
    );
    let _ = write!(
        out,
        "{}\n{}",
        heading.apply_to("Braille Output:"),
        body.apply_to(&outcome.braille)
    );

    if let Some(url) = &outcome.sign_language_url {
        let _ = write!(
            out,
            "{gap}{}\n{}",
            heading.apply_to("Sign Language Animation:"),
            body.apply_to(url)
        );
    }

    out
}

/// Render just a braille transcription (no translation step).
pub fn render_braille(text: &str, braille: &str, prefs: &DisplayPreferences) -> String {
    let heading = prefs.heading_style();
    let body = prefs.body_style();
    let gap = prefs.section_gap();
    let text = if prefs.dyslexia_font {
        spaced_words(text)
    } else {
        text.to_string()
    };

    format!(
        "{}\n{}{gap}{}\n{}",
        heading.apply_to("Text:"),
        body.apply_to(text),
        heading.apply_to("Braille Output:"),
        body.apply_to(braille)
    )
}
