//! Dicta application binary - composition root.
//!
//! Wires the dicta crates together behind a small CLI:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. `simulate` replays a recognition script (or the built-in demo)
//!    against an in-memory field through a real session registry
//! 4. `config-init` seeds a default configuration file

mod driver;
mod script;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dicta_core::{DictaConfig, ElementKind, Result, SurfaceId};
use dicta_element::surface::shared as shared_surface;
use dicta_element::{Surface, TextBox};
use dicta_session::control::shared as shared_control;
use dicta_session::{
    LoggingControl, Recognizer, RecognizerFactory, ScriptedRecognizer, SessionRegistry,
};

#[derive(Parser)]
#[command(name = "dicta", about = "Voice dictation session core")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "dicta.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recognition script against an in-memory field.
    Simulate {
        /// JSON-lines script; the built-in demo runs when omitted.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Override the configured dictation language.
        #[arg(long)]
        language: Option<String>,
        /// Hostname checked against the site allow-list.
        #[arg(long, default_value = "localhost")]
        host: String,
        /// Text already present in the field when dictation starts.
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Write the default configuration file.
    ConfigInit,
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::ConfigInit => {
            init_tracing("info");
            let config = DictaConfig::default();
            config.save(&cli.config)?;
            println!("Wrote {}", cli.config.display());
            Ok(())
        }
        Command::Simulate {
            script,
            language,
            host,
            text,
        } => {
            let mut config = DictaConfig::load_or_default(&cli.config);
            init_tracing(&config.general.log_level);
            if let Some(language) = language {
                config.dictation.language = language;
            }

            let steps = match script {
                Some(path) => script::load_script(&path)?,
                None => script::demo_script(),
            };

            let factory: RecognizerFactory = Box::new(|settings| {
                tracing::debug!(language = %settings.language, "Creating scripted recognizer");
                Ok(Box::new(ScriptedRecognizer::new()) as Box<dyn Recognizer>)
            });

            let mut registry = SessionRegistry::new(config.dictation.clone(), &host, factory);

            let surface_id = SurfaceId::new();
            let field = TextBox::with_text(&text);
            registry.attach(
                surface_id,
                ElementKind::Textarea,
                shared_surface(Surface::Value(Box::new(field.clone()))),
                shared_control(LoggingControl::new("simulated-field")),
            )?;

            let final_text = driver::run(registry, surface_id, field, steps).await?;
            println!("{}", final_text);
            Ok(())
        }
    }
}
