//! Two-pass tf-idf index construction.
//!
//! Pass one counts document frequency, computes idf and collects each
//! retained term's raw `tf` postings. Pass two stamps `tf_idf` once every
//! posting of a term exists.

use crate::corpus::Corpus;
use crate::error::{Result, SearchError};
use crate::index::{DocId, Index, IndexEntry, Posting, Term};
use crate::tf::{corpus_term_frequencies, TermFrequencies};
use crate::tokenizer::Tokenizer;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Entry produced by pass one; postings carry `tf` only.
#[derive(Debug)]
struct PendingEntry {
    idf: f64,
    postings: BTreeMap<DocId, f64>,
}

impl PendingEntry {
    fn stamp(self) -> IndexEntry {
        let idf = self.idf;
        let postings = self
            .postings
            .into_iter()
            .map(|(doc_id, tf)| (doc_id, Posting { tf, tf_idf: tf * idf }))
            .collect();
        IndexEntry { idf, postings }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub num_docs: usize,
    pub observed_terms: usize,
    pub retained_terms: usize,
    pub postings: usize,
}

impl BuildStats {
    /// Terms present in every document, dropped for carrying zero weight.
    pub fn dropped_terms(&self) -> usize {
        self.observed_terms - self.retained_terms
    }
}

#[derive(Debug, Default)]
pub struct IndexBuilder {
    stats: BuildStats,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the most recent successful build.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Tokenize every document and build the index in one go.
    pub fn build_corpus<T: Tokenizer + ?Sized>(&mut self, tokenizer: &T, corpus: &Corpus) -> Result<Index> {
        if corpus.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }
        let doc_tfs = corpus_term_frequencies(tokenizer, corpus);
        self.build(&doc_tfs)
    }

    /// Build an index from per-document term frequencies.
    ///
    /// Fails with [`SearchError::EmptyCorpus`] when there are no documents.
    pub fn build(&mut self, doc_tfs: &HashMap<DocId, TermFrequencies>) -> Result<Index> {
        let n = doc_tfs.len();
        if n == 0 {
            return Err(SearchError::EmptyCorpus);
        }
        let num_docs = corpus_size(n)?;

        let df = document_frequencies(doc_tfs);
        let observed_terms = df.len();

        let mut pending: BTreeMap<Term, PendingEntry> = BTreeMap::new();
        for (term, count) in df {
            let idf = (n as f64 / count as f64).log10();
            if idf == 0.0 {
                debug!(term = %term, "term occurs in every document, dropping");
                continue;
            }
            pending.insert(term, PendingEntry { idf, postings: BTreeMap::new() });
        }
        for (doc_id, tfs) in doc_tfs {
            for (term, &tf) in tfs {
                if let Some(entry) = pending.get_mut(term) {
                    entry.postings.insert(doc_id.clone(), tf);
                }
            }
        }

        let entries: BTreeMap<Term, IndexEntry> = pending
            .into_par_iter()
            .map(|(term, entry)| (term, entry.stamp()))
            .collect();

        let index = Index { num_docs, entries };
        self.stats = BuildStats {
            num_docs: n,
            observed_terms,
            retained_terms: index.len(),
            postings: index.num_postings(),
        };
        info!(
            num_docs = n,
            observed_terms,
            retained_terms = self.stats.retained_terms,
            dropped_terms = self.stats.dropped_terms(),
            postings = self.stats.postings,
            "index built"
        );
        Ok(index)
    }
}

fn corpus_size(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| SearchError::CorpusTooLarge { documents: n, limit: u32::MAX })
}

fn document_frequencies(doc_tfs: &HashMap<DocId, TermFrequencies>) -> HashMap<Term, usize> {
    let mut df: HashMap<Term, usize> = HashMap::new();
    for tfs in doc_tfs.values() {
        for term in tfs.keys() {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }
    df
}
