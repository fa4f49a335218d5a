//! Interactive translation session.
//!
//! Each plain line is translated; lines starting with `:` are commands.

use crate::capability::SpeechInput;
use crate::config::ExportConfig;
use crate::display;
use crate::export;
use crate::language::LanguageCode;
use crate::pipeline::{dictate, SessionSettings, TranslationOutcome, TranslationPipeline};
use anyhow::Result;
use rustyline::error::ReadlineError;
use std::sync::Arc;

const HELP: &str = "\
Type text and press Enter to translate.
Commands:
  :speak        dictate text, then translate it
  :from <code>  set the input language
  :to <code>    set the output language
  :save         write the last braille output to a file
  :langs        list supported languages
  :help         show this help
  :quit         leave (Ctrl-D also works)";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Translate(String),
    Speak,
    From(String),
    To(String),
    Save,
    Languages,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return Self::Translate(trimmed.to_string());
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().unwrap_or_default().trim().to_string();

        match name.as_str() {
            "speak" | "mic" => Self::Speak,
            "from" => Self::From(arg),
            "to" => Self::To(arg),
            "save" | "download" => Self::Save,
            "langs" | "languages" => Self::Languages,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(name),
        }
    }
}

/// State of one interactive session.
pub struct Repl {
    pipeline: Arc<TranslationPipeline>,
    speech_input: Arc<dyn SpeechInput>,
    export: ExportConfig,
    settings: SessionSettings,
    last: Option<TranslationOutcome>,
}

impl Repl {
    pub fn new(
        pipeline: Arc<TranslationPipeline>,
        speech_input: Arc<dyn SpeechInput>,
        export: ExportConfig,
        settings: SessionSettings,
    ) -> Self {
        Self {
            pipeline,
            speech_input,
            export,
            settings,
            last: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn last_outcome(&self) -> Option<&TranslationOutcome> {
        self.last.as_ref()
    }

    /// Run the line-editing loop until `:quit`, Ctrl-D or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        let mut editor = rustyline::DefaultEditor::new()?;
        println!("LingoTouch interactive mode. Type :help for commands.");

        loop {
            let prompt = format!("[{} → {}] > ", self.settings.source, self.settings.target);
            let line = match tokio::task::block_in_place(|| editor.readline(&prompt)) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            if !line.trim().is_empty() {
                let _ = editor.add_history_entry(line.as_str());
            }

            match self.handle(ReplCommand::parse(&line)).await {
                Ok(Some(output)) => println!("{output}"),
                Ok(None) => break,
                Err(e) => eprintln!("Error: {e:#}"),
            }
        }
        Ok(())
    }

    /// Apply one command. `Ok(None)` means the session should end.
    pub async fn handle(&mut self, command: ReplCommand) -> Result<Option<String>> {
        let output = match command {
            ReplCommand::Quit => return Ok(None),
            ReplCommand::Empty => String::new(),
            ReplCommand::Help => HELP.to_string(),
            ReplCommand::Languages => LanguageCode::all()
                .iter()
                .map(|lang| format!("{}  {}", lang.as_str(), lang.display_name()))
                .collect::<Vec<_>>()
                .join("\n"),
            ReplCommand::From(code) => {
                let lang: LanguageCode = code.parse()?;
                self.settings = self.settings.with_source(lang);
                format!("Input language: {}", lang.display_name())
            }
            ReplCommand::To(code) => {
                let lang: LanguageCode = code.parse()?;
                self.settings = self.settings.with_target(lang);
                format!("Output language: {}", lang.display_name())
            }
            ReplCommand::Save => {
                let Some(last) = &self.last else {
                    anyhow::bail!("Nothing to save yet: translate something first");
                };
                let path = export::export_text(&self.export.dir, &self.export.filename, &last.braille)?;
                format!("Saved braille to {}", path.display())
            }
            ReplCommand::Speak => match dictate(self.speech_input.as_ref(), &self.settings).await? {
                Some(text) => {
                    println!("Heard: {text}");
                    self.translate(&text).await?
                }
                None => "No speech recognized.".to_string(),
            },
            ReplCommand::Translate(text) => self.translate(&text).await?,
            ReplCommand::Unknown(name) => {
                anyhow::bail!("Unknown command ':{name}'. Type :help for commands.")
            }
        };
        Ok(Some(output))
    }

    async fn translate(&mut self, text: &str) -> Result<String> {
        let outcome = self.pipeline.run(text, &self.settings).await?;
        let rendered = display::render(&outcome, &self.settings.display);
        self.last = Some(outcome);
        Ok(rendered)
    }
}
