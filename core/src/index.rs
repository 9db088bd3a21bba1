use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque document identifier taken from the corpus file.
pub type DocId = String;
/// A stemmed, case-folded token.
pub type Term = String;

/// Weight of one term within one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// occurrences / total tokens in the document, always > 0
    pub tf: f64,
    /// tf * idf of the owning entry
    pub tf_idf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// log10(N / df), never zero for a retained term
    pub idf: f64,
    /// postings keyed by document id
    pub postings: BTreeMap<DocId, Posting>,
}

impl IndexEntry {
    pub fn document_frequency(&self) -> usize {
        self.postings.len()
    }
}

/// Inverted index: term -> idf and per-document postings.
///
/// Built once per corpus by [`crate::IndexBuilder`] and never mutated
/// afterwards; share it behind an `Arc` for concurrent queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub num_docs: u32,
    pub entries: BTreeMap<Term, IndexEntry>,
}

impl Index {
    pub fn get(&self, term: &str) -> Option<&IndexEntry> {
        self.entries.get(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.entries.get(term).map(|e| e.idf)
    }

    pub fn posting(&self, term: &str, doc_id: &str) -> Option<&Posting> {
        self.entries.get(term).and_then(|e| e.postings.get(doc_id))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of retained terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn num_postings(&self) -> usize {
        self.entries.values().map(|e| e.postings.len()).sum()
    }
}
