//! Command-line argument parsing
//!
//! Provides clap-based CLI with ingest/ask subcommands.

use clap::{Parser, Subcommand};

/// askdocs - ask questions against your own documents
#[derive(Parser, Debug)]
#[command(name = "askdocs")]
#[command(version)]
#[command(about = "Turn a pile of documents into a question-answering RAG agent", long_about = None)]
pub struct Args {
    /// Enable verbose diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and chunk sources, then report corpus statistics
    Ingest {
        /// Sources: HTTP(S) URLs, .txt files, or PDF directories.
        /// Defaults to the configured seed URLs.
        #[arg(short, long = "source", value_name = "SOURCE")]
        sources: Vec<String>,
    },

    /// Answer a question over the ingested corpus
    Ask {
        /// The question to answer
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Sources: HTTP(S) URLs, .txt files, or PDF directories.
        /// Defaults to the configured seed URLs.
        #[arg(short, long = "source", value_name = "SOURCE")]
        sources: Vec<String>,

        /// Chunks fetched by the retrieve stage
        #[arg(short = 'k', long, default_value_t = 4)]
        top_k: usize,
    },
}
