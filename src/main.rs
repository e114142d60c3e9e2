use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;

use storyshelf::github::{self, GithubClient};
use storyshelf::server::{self, AppState};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Owner of the repository holding the story files.
    #[arg(long, default_value = "AINovelist")]
    owner: String,

    /// Repository name.
    #[arg(long, default_value = "stories")]
    repo: String,

    /// Branch or ref to read from.
    #[arg(long, default_value = "main")]
    reference: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    storyshelf::logging::init().context("init logging")?;

    let args = Args::parse();
    tracing::debug!(?args, "parsed cli");

    let api_base = std::env::var("STORYSHELF_GITHUB_API")
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| github::DEFAULT_API_BASE.to_owned());

    let token = std::env::var("GITHUB_TOKEN")
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty());
    if token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; unauthenticated requests are rate limited");
    }

    let github = GithubClient::new(&api_base, token, &args.owner, &args.repo, &args.reference)
        .context("build github client")?;

    server::run(args.addr, AppState { github }).await
}
