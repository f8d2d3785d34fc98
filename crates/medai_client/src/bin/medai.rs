//! medai: one-shot CLI for the MedAI assistant.
//! Reads config, sends one question (and/or image) to the backend, prints the
//! status line and the rendered reply to stdout.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use medai_client::config::{self, Config};
use medai_client::images;
use medai_client::{
    render_reply, render_status, Client, ImageUpload, MultimodalReply, MultimodalRequest,
    RenderOptions,
};

/// Ask the MedAI assistant a medical question, optionally with an image.
#[derive(Parser)]
#[command(name = "medai", version, about, long_about = None)]
struct Cli {
    /// Config file (else MEDAI_CONFIG, else ~/.medai/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides api.base_url)
    #[arg(long, global = true, env = "MEDAI_API_URL")]
    api_url: Option<String>,

    /// Write data-URL result images into this directory
    #[arg(long, global = true, value_name = "DIR")]
    save_images: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Image to upload with the question
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Backend mode hint (defaults to chat.mode or "auto")
    #[arg(long)]
    mode: Option<String>,

    /// Question text; read from stdin when omitted
    question: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Text-only answer with entities and web snippets (/chat)
    Chat {
        /// Question text; read from stdin when omitted
        question: Option<String>,
    },
    /// Web image search (/search_image_web)
    Images {
        /// Search query; read from stdin when omitted
        query: Option<String>,
    },
}

/// First non-empty line of stdin, trimmed.
fn read_stdin_question() -> Result<String> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    Ok(String::new())
}

fn question_or_stdin(question: Option<String>) -> Result<String> {
    let question = match question {
        Some(q) => q.trim().to_string(),
        None => read_stdin_question()?,
    };
    if question.is_empty() {
        bail!("no question provided (pass it as an argument or on stdin)");
    }
    Ok(question)
}

/// `--image`, `--mode` and the top-level question only apply without a subcommand.
fn check_subcommand_args(cli: &Cli) -> Result<(), clap::Error> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    let name = match command {
        Command::Chat { .. } => "chat",
        Command::Images { .. } => "images",
    };
    let stray = [
        cli.image.as_ref().map(|_| "--image"),
        cli.mode.as_ref().map(|_| "--mode"),
        cli.question.as_ref().map(|_| "QUESTION"),
    ];
    match stray.into_iter().flatten().next() {
        Some(arg) => Err(Cli::command().error(
            ErrorKind::ArgumentConflict,
            format!("{} cannot be used with the '{}' subcommand", arg, name),
        )),
        None => Ok(()),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let source = config::resolve_config_path(cli.config.as_deref())?;
    let mut cfg = config::load_from(&source)
        .with_context(|| format!("failed to load config from {}", source.path().display()))?;
    if let Some(url) = &cli.api_url {
        cfg.api.base_url = Some(url.clone());
    }
    Ok(cfg)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    medai_client::logging::init();
    let cli = Cli::parse();
    if let Err(e) = check_subcommand_args(&cli) {
        e.exit();
    }

    let cfg = load_config(&cli)?;
    let client = Client::new(cfg.base_url(), cfg.timeout()).context("failed to build HTTP client")?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    let reply: MultimodalReply = match cli.command {
        Some(Command::Chat { ref question }) => {
            let question = question_or_stdin(question.clone())?;
            client.chat(&question).await.context("chat request failed")?.into()
        }
        Some(Command::Images { ref query }) => {
            let query = question_or_stdin(query.clone())?;
            client
                .search_image_web(&query)
                .await
                .context("image search failed")?
                .into()
        }
        None => {
            let file = cli
                .image
                .as_deref()
                .map(ImageUpload::from_path)
                .transpose()?;
            // An image alone is a complete query; only fall back to stdin without one.
            let text = match (&cli.question, &file) {
                (Some(q), _) => q.clone(),
                (None, Some(_)) => String::new(),
                (None, None) => question_or_stdin(None)?,
            };
            let mode = cli.mode.clone().unwrap_or_else(|| cfg.mode().to_string());
            let request = MultimodalRequest::new(&text, file).with_mode(mode);
            if request.is_empty() {
                bail!("Please enter a question or upload an image.");
            }
            client
                .multimodal_chat(&request)
                .await
                .context("An error occurred in multimodal chat")?
        }
    };

    let opts = RenderOptions {
        color: !cli.no_color && io::stdout().is_terminal(),
        max_images: cfg.max_images(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", render_status(&reply.status_line(), &opts))?;
    writeln!(out)?;
    write!(out, "{}", render_reply(&reply, &opts))?;
    out.flush()?;

    let save_dir = cli.save_images.clone().or_else(|| cfg.chat.save_images_dir.clone());
    if let Some(dir) = save_dir {
        let written = images::save_images(&reply.images, &dir, cfg.max_images())
            .with_context(|| format!("failed to save images into {}", dir.display()))?;
        for path in written {
            writeln!(out, "Saved {}", path.display())?;
        }
    }

    Ok(())
}
