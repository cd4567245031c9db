use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use tracing::info;

use crate::chunking::{expand_section_chunks, extract_section_chunks};
use crate::config::{Config, get_config_dir};
use crate::embeddings::ollama::OllamaEmbedder;
use crate::retriever::Retriever;
use crate::source::{PageSource, TextFile};
use crate::store::InMemoryStore;

const PREVIEW_CHARS: usize = 160;

fn load_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    Config::load(&config_dir)
}

/// Print the active configuration as TOML.
#[inline]
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;

    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("# {}", config_path.display());
    } else {
        println!("# defaults ({} not present)", config_path.display());
    }
    print!("{}", rendered);
    Ok(())
}

/// Write the default configuration file if none exists yet.
#[inline]
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    Config::default().save(&config_dir)?;
    println!("Wrote default config: {}", config_path.display());
    Ok(())
}

/// Show the structural chunks of a document without embedding anything.
#[inline]
pub fn preview_chunks(file: &Path) -> Result<()> {
    let config = load_config()?;
    let markers = config.markers.to_markers()?;

    let pages = TextFile::new(file).pages()?;
    let chunks = extract_section_chunks(&pages, &markers);

    if chunks.is_empty() {
        println!("No chunks found in {}", file.display());
        return Ok(());
    }

    println!("{} chunks from {} pages:", chunks.len(), pages.len());
    println!();
    for chunk in &chunks {
        println!(
            "{}",
            style(chunk.location(&config.markers.fallback_label)).bold()
        );
        println!("  {}", one_line_preview(&chunk.text));
    }
    Ok(())
}

/// Index a document and answer similarity queries interactively until the
/// user types `exit`.
#[inline]
pub fn search(file: &Path, top_k: usize) -> Result<()> {
    let config = load_config()?;
    let markers = config.markers.to_markers()?;
    let window = config.window.to_window_config()?;

    let pages = TextFile::new(file).pages()?;
    let chunks = extract_section_chunks(&pages, &markers);
    let documents = expand_section_chunks(&chunks, &window, &config.markers.fallback_label);

    println!(
        "{} section chunks, {} documents from {} pages",
        chunks.len(),
        documents.len(),
        pages.len()
    );

    if documents.is_empty() {
        println!("Nothing to index in {}", file.display());
        return Ok(());
    }

    let embedder =
        OllamaEmbedder::new(&config.ollama).context("Failed to create Ollama embedder")?;
    embedder
        .health_check()
        .context("Ollama server is not usable")?;

    let mut store = InMemoryStore::new();
    let mut retriever = Retriever::new(&embedder, &mut store);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").context("Invalid progress template")?,
    );
    spinner.set_message(format!("Embedding {} documents...", documents.len()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    retriever
        .add_documents(&documents)
        .context("Failed to index documents")?;

    spinner.finish_with_message(format!("Indexed {} documents", documents.len()));
    info!("Index ready for {}", file.display());

    loop {
        let query: String = Input::new()
            .with_prompt("Query (exit to quit)")
            .interact_text()
            .context("Failed to read query")?;

        if query.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        let results = retriever
            .retrieve(&query, top_k)
            .context("Retrieval failed")?;

        if results.is_empty() {
            println!("No results.");
            continue;
        }

        println!();
        for result in &results {
            println!(
                "- ({}) {}",
                style(format!("{:.3}", result.score)).cyan(),
                one_line_preview(&result.text)
            );
        }
        println!();
    }

    Ok(())
}

/// Collapse whitespace and truncate for single-line terminal output.
fn one_line_preview(text: &str) -> String {
    let flat = text.split_whitespace().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut)
}
