mod commands;

use clap::{Parser, Subcommand};
use commands::{ExportArgs, RenderArgs, SubmitArgs, export, render, submit};
use std::path::PathBuf;

/// Seatmap CLI - export, preview, and submit venue seat maps
#[derive(Parser, Debug)]
#[command(name = "seatmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Editor configuration (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a saved editor document to a seat-map file
    Export(ExportArgs),

    /// Render a seat-map file to venue-ready SVG markup
    Render(RenderArgs),

    /// POST a seat-map file to the ingestion endpoint
    Submit(SubmitArgs),
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Command::Export(args) => export(args),
            Command::Render(args) => render(args),
            Command::Submit(args) => submit(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("Error: {err:#}");
        eprintln!();
        std::process::exit(1);
    }
}
