use anyhow::{bail, Context, Result};
use quarry_core::builder::BuildStats;
use quarry_core::config::{RankingConfig, SearchConfig};
use quarry_core::corpus::{load_corpus, load_queries, Corpus};
use quarry_core::persist::{load_snapshot, save_snapshot, IndexPaths, MetaFile, Snapshot};
use quarry_core::render::write_results;
use quarry_core::{IndexBuilder, QueryEngine};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Corpus files under `input`: the file itself, or every `.txt` below a
/// directory in path order.
pub fn corpus_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input {} does not exist", input.display());
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    files.sort();
    Ok(files)
}

/// Load and merge every corpus file. Later files win on duplicate ids.
pub fn load_inputs(input: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    for file in corpus_files(input)? {
        let part = load_corpus(&file).with_context(|| format!("loading {}", file.display()))?;
        tracing::info!(file = %file.display(), documents = part.len(), "loaded corpus file");
        for doc in part.documents() {
            corpus.insert(doc.id.clone(), doc.text.clone());
        }
    }
    Ok(corpus)
}

/// Build and persist an index. Nothing is written unless the build succeeds.
pub fn build_index(input: &Path, output: &Path, config: &SearchConfig) -> Result<BuildStats> {
    let corpus = load_inputs(input)?;
    let tokenizer = config.tokenizer.tokenizer();
    let mut builder = IndexBuilder::new();
    let index = builder
        .build_corpus(&tokenizer, &corpus)
        .with_context(|| format!("building index from {}", input.display()))?;

    let snapshot = Snapshot::new(index, corpus.into_texts(), config.tokenizer);
    save_snapshot(&IndexPaths::new(output), &snapshot)
        .with_context(|| format!("writing index to {}", output.display()))?;
    tracing::info!(output = %output.display(), "index build complete");
    Ok(builder.stats())
}

/// Resolve every query in `queries` and write the ranked excerpts to
/// `output`. Returns the number of queries resolved.
pub fn resolve_queries(index: &Path, queries: &Path, output: &Path, ranking: &RankingConfig) -> Result<usize> {
    ranking.validate()?;
    let snapshot = load_snapshot(&IndexPaths::new(index))
        .with_context(|| format!("loading index from {}", index.display()))?;
    let queries = load_queries(queries).with_context(|| format!("loading queries from {}", queries.display()))?;

    let tokenizer = snapshot.meta.tokenizer.tokenizer();
    let engine = QueryEngine::new(Arc::new(snapshot.index)).with_top_k(ranking.top_k);
    let pairs: Vec<(&str, &str)> = queries.iter().map(|q| (q.id.as_str(), q.text.as_str())).collect();
    let results = engine.search_batch(&tokenizer, &pairs);

    let mut out = BufWriter::new(File::create(output).with_context(|| format!("creating {}", output.display()))?);
    for (query_id, hits) in &results {
        if hits.is_empty() {
            tracing::debug!(query_id, "no matching documents");
        }
        write_results(&mut out, query_id, hits, &snapshot.docs, ranking.excerpt_chars)?;
    }
    out.flush()?;
    tracing::info!(queries = results.len(), output = %output.display(), "queries resolved");
    Ok(results.len())
}

#[derive(Debug, Serialize)]
pub struct IndexInfo {
    pub meta: MetaFile,
    pub postings: usize,
    pub documents_with_text: usize,
}

pub fn index_info(index: &Path) -> Result<IndexInfo> {
    let snapshot = load_snapshot(&IndexPaths::new(index))
        .with_context(|| format!("loading index from {}", index.display()))?;
    Ok(IndexInfo {
        postings: snapshot.index.num_postings(),
        documents_with_text: snapshot.docs.len(),
        meta: snapshot.meta,
    })
}
