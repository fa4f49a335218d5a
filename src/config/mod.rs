pub mod schema;

pub use schema::{
    default_config_path, resolve_config_path, Config, ExportConfig, GatewayConfig, HapticsConfig,
    LanguagesConfig, SignLanguageConfig, SpeechConfig, TranslationConfig, CONFIG_ENV_VAR,
};
