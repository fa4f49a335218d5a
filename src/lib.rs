//! LingoTouch: accessible translation with braille, speech, haptics and
//! sign-language links.
//!
//! The braille transcoder ([`braille::transcode`]) is pure and total; the
//! rest of the crate wires it to a remote translation service and to device
//! capabilities behind trait ports.

pub mod braille;
pub mod capability;
pub mod config;
pub mod display;
pub mod export;
pub mod gateway;
pub mod language;
pub mod pipeline;
pub mod repl;
pub mod sign;
pub mod translate;

pub use braille::transcode;
pub use config::Config;
pub use language::LanguageCode;
pub use pipeline::{SessionSettings, TranslationOutcome, TranslationPipeline};
pub use translate::{TranslateError, Translator};
