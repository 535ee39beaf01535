//! askdocs - Main CLI entry point

use anyhow::Result;
use askdocs::agent::{AgentConfig, AgentToolkit, ReactAgent, WikipediaClient};
use askdocs::cli::{Args, Commands};
use askdocs::config::Config;
use askdocs::index::{EmbeddingIndex, HuggingFaceEmbedder};
use askdocs::ingestion::{DocumentLoader, SourceDescriptor, TextChunker};
use askdocs::llm::GroqClient;
use askdocs::types::{Chunk, Document};
use askdocs::workflow::{PipelineConfig, RagPipeline};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Credentials are checked before any query is attempted
    let config = Config::from_env()?.with_verbose(args.verbose);

    match args.command {
        Commands::Ingest { sources } => ingest(&config, sources).await,
        Commands::Ask {
            question,
            sources,
            top_k,
        } => ask(&config, question, sources, top_k).await,
    }
}

/// Load and chunk the corpus, reporting statistics
async fn ingest(config: &Config, sources: Vec<String>) -> Result<()> {
    let (documents, chunks) = load_corpus(config, sources).await?;

    let total_chars: usize = documents.iter().map(|d| d.text.len()).sum();

    println!("{}", "Corpus ingested".green().bold());
    println!("  documents: {}", documents.len());
    println!("  chunks:    {}", chunks.len());
    println!("  characters: {}", total_chars);

    if config.verbose {
        for document in &documents {
            println!(
                "  - {} ({} chars)",
                document.metadata.label(),
                document.text.len()
            );
        }
    }

    Ok(())
}

/// Full pipeline: ingest, build the index, then retrieve → respond
async fn ask(
    config: &Config,
    question: String,
    sources: Vec<String>,
    top_k: usize,
) -> Result<()> {
    let (_documents, chunks) = load_corpus(config, sources).await?;

    let spinner = progress_spinner("Embedding corpus");
    let embedder = Arc::new(HuggingFaceEmbedder::new(config)?);
    let mut index = EmbeddingIndex::new(embedder);
    index.build(chunks).await?;
    spinner.finish_and_clear();

    let index = Arc::new(index);
    let toolkit = AgentToolkit::new(index.clone(), Arc::new(WikipediaClient::new()?));
    let model = Arc::new(GroqClient::new(config)?);
    let agent = ReactAgent::new(
        model,
        toolkit,
        AgentConfig {
            verbose: config.verbose,
            ..Default::default()
        },
    );

    let mut pipeline = RagPipeline::new(
        index,
        agent,
        PipelineConfig {
            retrieve_top_k: top_k,
            verbose: config.verbose,
        },
    );
    pipeline.build()?;

    let spinner = progress_spinner("Thinking");
    let state = pipeline.run(&question).await?;
    spinner.finish_and_clear();

    if config.verbose {
        if let Some(docs) = &state.retrieved_docs {
            println!("{}", "Retrieved chunks:".cyan().bold());
            for (i, scored) in docs.iter().enumerate() {
                println!(
                    "  [{}] {} (score {:.3})",
                    i + 1,
                    scored.chunk.metadata.label(),
                    scored.score
                );
            }
        }

        if !state.tool_trace.is_empty() {
            println!("{}", "Tool calls:".cyan().bold());
            for invocation in &state.tool_trace {
                println!(
                    "  {} ({} ms)",
                    invocation.tool, invocation.duration_ms
                );
            }
        }
    }

    let answer = state.answer.unwrap_or_default();
    println!("{}", answer.bold());

    Ok(())
}

/// Resolve sources (falling back to the configured seed URLs), load
/// documents and chunk them
async fn load_corpus(
    config: &Config,
    sources: Vec<String>,
) -> Result<(Vec<Document>, Vec<Chunk>)> {
    let raw_sources = if sources.is_empty() {
        config.default_urls.clone()
    } else {
        sources
    };

    let descriptors = SourceDescriptor::resolve_all(&raw_sources)?;

    let spinner = progress_spinner("Loading documents");
    let loader = DocumentLoader::new()?;
    let documents = loader.load(&descriptors).await?;
    spinner.finish_and_clear();

    let chunker = TextChunker::new(config.chunk_size, config.chunk_overlap);
    let chunks = chunker.chunk_documents(&documents);

    if config.verbose {
        eprintln!(
            "[INGEST] {} documents -> {} chunks",
            documents.len(),
            chunks.len()
        );
    }

    Ok((documents, chunks))
}

fn progress_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
