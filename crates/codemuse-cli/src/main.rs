use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod commands;
mod theme;

#[derive(Parser)]
#[command(name = "codemuse")]
#[command(about = "CodeMuse - AI coding companion in your terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Open a shared link on startup
    #[arg(long)]
    link: Option<String>,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// LLM provider (claude, openai, ollama, groq, together, openrouter, lmstudio)
    #[arg(long)]
    provider: Option<String>,

    /// Color theme (dark, light, high-contrast)
    #[arg(long)]
    theme: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a file once and print its console output
    Run { path: PathBuf },
    /// Print a shareable link for a file
    Share { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = codemuse_core::Settings::load();

    if let Some(ref provider) = cli.provider {
        settings.llm.provider = provider.clone();
        if cli.model.is_none() {
            settings.llm.model = settings.provider_id().default_model().to_string();
        }
    }
    if let Some(ref model) = cli.model {
        settings.llm.model = model.clone();
    }
    if let Some(ref theme) = cli.theme {
        settings.editor.theme = theme.clone();
    }

    match cli.command {
        Some(Command::Run { path }) => app::run_file(&settings, &path).await?,
        Some(Command::Share { path }) => app::share_file(&settings, &path)?,
        None => app::run_tui(settings, cli.link).await?,
    }

    Ok(())
}
