use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use lingotouch::capability::{
    self, HapticFeedback, NoopHaptics, PromptSpeechInput, SilentSpeechOutput, SpeechOutput,
};
use lingotouch::config::{resolve_config_path, Config};
use lingotouch::display::{self, DisplayPreferences};
use lingotouch::language::LanguageCode;
use lingotouch::pipeline::{dictate, SessionSettings, TranslationOutcome, TranslationPipeline};
use lingotouch::translate::{HttpTranslator, Translator};
use lingotouch::{braille, export, gateway, repl};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Translate text, read it in braille, hear it spoken.
#[derive(Parser, Debug)]
#[command(name = "lingotouch", version, about)]
struct Cli {
    /// Config file (default: platform config dir, or $LINGOTOUCH_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcode text to braille (offline)
    Braille {
        #[arg(required = true)]
        text: Vec<String>,
        /// Also write the braille to a file in this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Translate text, then show braille, speak and vibrate
    Translate {
        #[arg(required = true)]
        text: Vec<String>,
        #[command(flatten)]
        opts: TranslateArgs,
    },
    /// Dictate text, then translate it
    Listen {
        #[command(flatten)]
        opts: TranslateArgs,
    },
    /// Interactive session
    Repl {
        #[arg(long, value_parser = parse_language)]
        from: Option<LanguageCode>,
        #[arg(long, value_parser = parse_language)]
        to: Option<LanguageCode>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Run the HTTP gateway
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// List supported languages
    Languages,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct DisplayArgs {
    /// White-on-black, bold output
    #[arg(long)]
    high_contrast: bool,
    /// Dyslexia-friendly spacing
    #[arg(long)]
    dyslexia_font: bool,
}

impl DisplayArgs {
    fn apply(self, prefs: DisplayPreferences) -> DisplayPreferences {
        DisplayPreferences {
            high_contrast: prefs.high_contrast || self.high_contrast,
            dyslexia_font: prefs.dyslexia_font || self.dyslexia_font,
        }
    }
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input language
    #[arg(long, value_parser = parse_language)]
    from: Option<LanguageCode>,
    /// Output language
    #[arg(long, value_parser = parse_language)]
    to: Option<LanguageCode>,
    /// Do not speak the translation
    #[arg(long)]
    no_speak: bool,
    /// Do not play the vibration pattern
    #[arg(long)]
    no_haptics: bool,
    /// Save the braille output (optionally into DIR)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    download: Option<Option<PathBuf>>,
    /// Print JSON instead of formatted text
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    display: DisplayArgs,
}

fn parse_language(s: &str) -> Result<LanguageCode, String> {
    s.parse::<LanguageCode>().map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "lingotouch=info",
        1 => "lingotouch=debug",
        _ => "lingotouch=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn settings_for(
    config: &Config,
    from: Option<LanguageCode>,
    to: Option<LanguageCode>,
    display: DisplayArgs,
) -> SessionSettings {
    let mut settings = SessionSettings::from_config(config);
    if let Some(source) = from {
        settings = settings.with_source(source);
    }
    if let Some(target) = to {
        settings = settings.with_target(target);
    }
    settings.with_display(display.apply(settings.display))
}

fn build_pipeline(config: &Config, speak: bool, vibrate: bool) -> Result<TranslationPipeline> {
    let translator: Arc<dyn Translator> = Arc::new(
        HttpTranslator::from_config(&config.translation).context("Failed to build HTTP client")?,
    );
    let speech: Arc<dyn SpeechOutput> = if speak {
        capability::create_speech_output(&config.speech)
    } else {
        Arc::new(SilentSpeechOutput)
    };
    let haptics: Arc<dyn HapticFeedback> = if vibrate {
        capability::create_haptics(&config.haptics)
    } else {
        Arc::new(NoopHaptics)
    };
    Ok(TranslationPipeline::from_config(config, translator, speech, haptics))
}

async fn translate_and_report(
    config: &Config,
    text: &str,
    opts: &TranslateArgs,
    settings: &SessionSettings,
) -> Result<()> {
    let pipeline = build_pipeline(config, !opts.no_speak, !opts.no_haptics)?;

    // Show the result before speaking so the reader is not kept waiting.
    let outcome = pipeline.translate_only(text, settings).await?;
    print_outcome(&outcome, opts.json, &settings.display)?;

    if let Some(dir) = &opts.download {
        let dir = dir.clone().unwrap_or_else(|| config.export.dir.clone());
        let path = export::export_text(&dir, &config.export.filename, &outcome.braille)?;
        eprintln!("Braille saved to {}", path.display());
    }

    pipeline.announce(&outcome).await;
    Ok(())
}

fn print_outcome(outcome: &TranslationOutcome, json: bool, prefs: &DisplayPreferences) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", display::render(outcome, prefs));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let load_config = || Config::load(&config_path);

    match cli.command {
        Commands::Config { action } => run_config_action(&action, &config_path)?,
        Commands::Braille {
            text,
            out,
            json,
            display: display_args,
        } => {
            let config = load_config()?;
            let text = text.join(" ");
            let cells = braille::transcode(&text);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "text": text,
                        "braille": cells,
                    }))?
                );
            } else {
                let prefs = display_args.apply(config.display);
                println!("{}", display::render_braille(&text, &cells, &prefs));
            }
            if let Some(dir) = out {
                let path = export::export_text(&dir, &config.export.filename, &cells)?;
                eprintln!("Braille saved to {}", path.display());
            }
        }
        Commands::Translate { text, opts } => {
            let config = load_config()?;
            let settings = settings_for(&config, opts.from, opts.to, opts.display);
            translate_and_report(&config, &text.join(" "), &opts, &settings).await?;
        }
        Commands::Listen { opts } => {
            let config = load_config()?;
            let settings = settings_for(&config, opts.from, opts.to, opts.display);
            let input = PromptSpeechInput::stdin();
            match dictate(&input, &settings).await? {
                Some(text) => translate_and_report(&config, &text, &opts, &settings).await?,
                None => eprintln!("No speech recognized."),
            }
        }
        Commands::Repl {
            from,
            to,
            display: display_args,
        } => {
            let config = load_config()?;
            let settings = settings_for(&config, from, to, display_args);
            let pipeline = Arc::new(build_pipeline(&config, true, true)?);
            let mut session = repl::Repl::new(
                pipeline,
                Arc::new(PromptSpeechInput::stdin()),
                config.export.clone(),
                settings,
            );
            session.run().await?;
        }
        Commands::Serve { host, port } => {
            let config = load_config()?;
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            gateway::run_gateway(&host, port, config).await?;
        }
        Commands::Languages => {
            for lang in LanguageCode::all() {
                println!("{}  {}", lang.as_str(), lang.display_name());
            }
        }
    }

    Ok(())
}

fn run_config_action(action: &ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", config_path.display()),
        ConfigAction::Show => {
            let config = Config::load(config_path)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    config_path.display()
                );
            }
            let config = Config {
                config_path: config_path.to_path_buf(),
                ..Config::default()
            };
            config.save()?;
            println!("Wrote default config to {}", config_path.display());
        }
    }
    Ok(())
}
