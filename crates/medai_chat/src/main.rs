//! medai-chat: interactive terminal chat with the MedAI assistant.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use medai_chat::{repl, ChatSession, ChatView};
use medai_client::{config, Client, ImageUpload, RenderOptions};

/// Chat with the MedAI assistant: type questions, attach images with `:image <path>`.
#[derive(Parser)]
#[command(name = "medai-chat", version, about, long_about = None)]
struct Args {
    /// Config file (else MEDAI_CONFIG, else ~/.medai/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides api.base_url)
    #[arg(long, env = "MEDAI_API_URL")]
    api_url: Option<String>,

    /// Image to attach to the first question
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Backend mode hint (defaults to chat.mode or "auto")
    #[arg(long)]
    mode: Option<String>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    medai_client::logging::init();
    let args = Args::parse();

    let source = config::resolve_config_path(args.config.as_deref())?;
    let mut cfg = config::load_from(&source)
        .with_context(|| format!("failed to load config from {}", source.path().display()))?;
    if let Some(url) = args.api_url {
        cfg.api.base_url = Some(url);
    }

    let client = Client::new(cfg.base_url(), cfg.timeout()).context("failed to build HTTP client")?;
    let mode = args.mode.unwrap_or_else(|| cfg.mode().to_string());
    let mut session = ChatSession::new(client, ChatView::new().with_mode(mode));

    if let Some(path) = args.image.as_deref() {
        let upload = ImageUpload::from_path(path)?;
        session.view.select_file(Some(upload));
    }

    let opts = RenderOptions {
        color: !args.no_color && io::stdout().is_terminal(),
        max_images: cfg.max_images(),
    };

    println!("Medical Chatbot: MedAI Assistant ({})", session.client().base_url());
    let stdin = io::stdin();
    let stdout = io::stdout();
    repl::run(&mut session, stdin.lock(), &mut stdout.lock(), &opts).await?;
    Ok(())
}
