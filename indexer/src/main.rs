use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer::{build_index, index_info, resolve_queries};
use quarry_core::SearchConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a tf-idf inverted index and resolve queries against it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a corpus file or a directory of .txt corpus files
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Remove English stopwords before stemming
        #[arg(long, default_value_t = false)]
        stopwords: bool,
    },
    /// Resolve a query file against a built index
    Query {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: PathBuf,
        /// Query file, one `id<TAB>text` record per line
        #[arg(long)]
        queries: PathBuf,
        /// Result file
        #[arg(long, default_value = "result.txt")]
        output: PathBuf,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Results per query
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print index metadata as JSON
    Info {
        #[arg(long, default_value = "./index")]
        index: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    Ok(match path {
        Some(p) => SearchConfig::from_json_file(p)?,
        None => SearchConfig::default(),
    })
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, config, stopwords } => {
            let mut config = load_config(config.as_deref())?;
            config.tokenizer.stopwords |= stopwords;
            let stats = build_index(&input, &output, &config)?;
            println!(
                "indexed {} documents: {} terms kept, {} dropped, {} postings",
                stats.num_docs,
                stats.retained_terms,
                stats.dropped_terms(),
                stats.postings
            );
        }
        Commands::Query { index, queries, output, config, top_k } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(k) = top_k {
                config.ranking.top_k = k;
            }
            let n = resolve_queries(&index, &queries, &output, &config.ranking)?;
            println!("resolved {n} queries into {}", output.display());
        }
        Commands::Info { index } => {
            let info = index_info(&index)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}
