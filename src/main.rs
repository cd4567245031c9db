use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reg_rag::Result;
use reg_rag::commands::{init_config, preview_chunks, search, show_config};
use reg_rag::retriever::DEFAULT_TOP_K;

#[derive(Parser)]
#[command(name = "reg-rag")]
#[command(about = "Structure-aware chunking and similarity search for regulatory documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Preview the structural chunks of a document without embedding
    Chunks {
        /// Plain-text document, pages separated by form feeds
        file: PathBuf,
    },
    /// Index a document and answer similarity queries interactively
    Search {
        /// Plain-text document, pages separated by form feeds
        file: PathBuf,
        /// Number of results per query
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                init_config()?;
            }
        }
        Commands::Chunks { file } => {
            preview_chunks(&file)?;
        }
        Commands::Search { file, top_k } => {
            search(&file, top_k)?;
        }
    }

    Ok(())
}
