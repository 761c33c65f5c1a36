mod ops;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use common::config::Config;
use common::contents::Router;

#[derive(Parser)]
#[command(name = "bindery", about = "Browse a virtual document namespace")]
struct Args {
    /// Path to the backend registration config
    #[arg(short, long, default_value = "bindery.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the entries under a namespace path (the root when omitted)
    Ls { path: Option<String> },
    /// Print a document's body
    Cat { path: String },
    /// List a document's checkpoints
    Checkpoints { path: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let router = Router::new(config.build_registry()?);

    match args.command {
        Command::Ls { path } => ops::ls(&router, path.as_deref().unwrap_or("")),
        Command::Cat { path } => ops::cat(&router, &path),
        Command::Checkpoints { path } => ops::checkpoints(&router, &path),
    }
}
