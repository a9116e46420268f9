use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use smartstudy::app::controller::Controller;
use smartstudy::app::run_fatal;
use smartstudy::catalog::{ClassLevel, Subject, find_subject};
use smartstudy::gemini::{ApiKeyManager, GeminiClient, GeminiError, GeminiModel};
use smartstudy::study::notes::stream_notes;
use smartstudy::study::{StreamUpdate, TopicSource, drive_stream, fetch_topics, render_html, sanitize};
use smartstudy::{App, Config};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smartstudy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model for this run: flash, lite or pro
    #[arg(long, global = true)]
    model: Option<GeminiModel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the syllabus topics for a class and subject
    Topics {
        /// Class level (S1-S4)
        #[arg(long)]
        class: ClassLevel,
        /// Subject name or id, e.g. mathematics or bio
        #[arg(long)]
        subject: String,
    },
    /// Generate revision notes for a topic
    Notes {
        /// Class level (S1-S4)
        #[arg(long)]
        class: ClassLevel,
        /// Subject name or id
        #[arg(long)]
        subject: String,
        /// Topic to study
        #[arg(long)]
        topic: String,
        /// Print HTML instead of markdown
        #[arg(long)]
        html: bool,
    },
    /// Manage the stored Gemini API key
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Store a key in the system keyring
    Set {
        /// The Gemini API key
        key: String,
    },
    /// Remove the stored key
    Clear,
    /// Show which key would be used
    Status,
}

/// Log to a file while the TUI owns the terminal, otherwise to stderr
fn init_logging(tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "smartstudy=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if tui {
        let dir = Config::data_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        let path = dir.join("smartstudy.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        registry
            .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false).with_writer(std::io::stderr)).init();
    }
    Ok(())
}

fn lookup_subject(name: &str) -> Result<&'static Subject> {
    find_subject(name).with_context(|| format!("Unknown subject: {}", name))
}

fn headless_client(config: &Config) -> Result<GeminiClient> {
    let (key, source) = ApiKeyManager::resolve()?;
    tracing::debug!("Using API key from {}", source);
    Ok(GeminiClient::new(key, config.request_timeout())?)
}

async fn print_topics(config: &Config, class: ClassLevel, subject: &Subject) -> Result<()> {
    let client = headless_client(config)?;
    let list = fetch_topics(&client, config.model, class, subject).await;
    client.shutdown();

    match list.source() {
        TopicSource::Failed => bail!("Could not load topics for {} {}", class, subject.name),
        TopicSource::Fallback => eprintln!("No syllabus topics returned; showing placeholders"),
        TopicSource::Syllabus => {}
    }
    for (i, topic) in list.topics().iter().enumerate() {
        println!("{:>2}. {}", i + 1, topic);
    }
    Ok(())
}

async fn print_notes(
    config: &Config,
    class: ClassLevel,
    subject: &Subject,
    topic: &str,
    html: bool,
) -> Result<()> {
    let client = headless_client(config)?;
    let stream = stream_notes(&client, config.model, class, subject, topic).await?;

    let mut text = String::new();
    let mut failure = None;
    drive_stream(stream, |update| {
        match update {
            StreamUpdate::Chunk(chunk) => {
                text.push_str(&chunk);
                eprint!(".");
                let _ = std::io::stderr().flush();
            }
            StreamUpdate::Finished => {}
            StreamUpdate::Failed(e) => failure = Some(e),
        }
        true
    })
    .await;
    eprintln!();
    client.shutdown();

    if let Some(e) = failure {
        if text.is_empty() {
            return Err(e.into());
        }
        eprintln!("Stream ended early ({}); notes are incomplete", e);
    }

    let notes = sanitize(&text);
    if html {
        println!("{}", render_html(&notes));
    } else {
        println!("{}", notes);
    }
    Ok(())
}

fn auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Set { key } => {
            ApiKeyManager::set_api_key(&key)?;
            println!("Stored API key {}", ApiKeyManager::mask_key(key.trim()));
        }
        AuthAction::Clear => match ApiKeyManager::delete_api_key() {
            Ok(()) => println!("Removed stored API key"),
            Err(GeminiError::ApiKeyNotFound) => println!("No stored API key"),
            Err(e) => return Err(e.into()),
        },
        AuthAction::Status => match ApiKeyManager::resolve() {
            Ok((key, source)) => println!("{} (from {})", ApiKeyManager::mask_key(&key), source),
            Err(GeminiError::ApiKeyNotFound) => println!("No API key configured"),
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

async fn run_tui(config: Config) -> Result<()> {
    let config_path = Config::config_path()?;
    let (key, source) = match ApiKeyManager::resolve() {
        Ok(found) => found,
        Err(GeminiError::ApiKeyNotFound) => {
            tracing::error!("No API key configured");
            return run_fatal("No Gemini API key found");
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Starting on {} with key from {}", config.model.display_name(), source);

    let client = Arc::new(GeminiClient::new(key.clone(), config.request_timeout())?);
    let controller = Controller::new(Arc::clone(&client), config)
        .with_config_path(config_path)
        .with_credential(format!("{} (from {})", ApiKeyManager::mask_key(&key), source));

    let result = match App::new(controller) {
        Ok(mut app) => app.run().await,
        Err(e) => Err(e),
    };
    client.shutdown();
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none())?;

    // Overrides apply to this run only and are not saved
    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        Some(Commands::Topics { class, subject }) => {
            print_topics(&config, class, lookup_subject(&subject)?).await
        }
        Some(Commands::Notes { class, subject, topic, html }) => {
            print_notes(&config, class, lookup_subject(&subject)?, &topic, html).await
        }
        Some(Commands::Auth { action }) => auth(action),
        None => run_tui(config).await,
    }
}
