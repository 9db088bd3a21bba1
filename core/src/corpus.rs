//! Line-oriented loaders for corpus and query files.
//!
//! Each non-blank line is one record: an identifier followed by its text,
//! separated by a TAB or, failing that, by the first run of whitespace.
//! Corpus documents must carry text; a query may be empty and simply
//! matches nothing.

use crate::error::{Result, SearchError};
use crate::index::DocId;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

/// Documents in input order, addressable by id.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    positions: HashMap<DocId, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document. A repeated id replaces the earlier text in place
    /// and returns `true`.
    pub fn insert(&mut self, id: impl Into<DocId>, text: impl Into<String>) -> bool {
        let id = id.into();
        let text = text.into();
        if let Some(&pos) = self.positions.get(&id) {
            self.documents[pos].text = text;
            return true;
        }
        self.positions.insert(id.clone(), self.documents.len());
        self.documents.push(Document { id, text });
        false
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.positions
            .get(id)
            .map(|&pos| self.documents[pos].text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Plain id -> text map, the shape the index store persists for excerpts.
    pub fn into_texts(self) -> HashMap<DocId, String> {
        self.documents.into_iter().map(|d| (d.id, d.text)).collect()
    }
}

impl<I, T> FromIterator<(I, T)> for Corpus
where
    I: Into<DocId>,
    T: Into<String>,
{
    fn from_iter<It: IntoIterator<Item = (I, T)>>(iter: It) -> Self {
        let mut corpus = Corpus::new();
        for (id, text) in iter {
            corpus.insert(id, text);
        }
        corpus
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Document,
    Query,
}

/// Split one record line into `(id, text)`. `None` for blank lines.
pub fn parse_record(line: &str, kind: RecordKind) -> std::result::Result<Option<(&str, &str)>, String> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (id, text) = match line.split_once('\t') {
        Some((id, text)) => (id.trim(), text.trim()),
        None => {
            let trimmed = line.trim_start();
            match trimmed.split_once(char::is_whitespace) {
                Some((id, text)) => (id, text.trim()),
                None => (trimmed, ""),
            }
        }
    };
    if id.is_empty() {
        return Err("missing identifier".to_string());
    }
    if text.is_empty() && kind == RecordKind::Document {
        return Err(format!("record '{id}' has no text"));
    }
    Ok(Some((id, text)))
}

/// Parse corpus documents from any reader. `path` is only used in error
/// messages.
pub fn parse_corpus<R: BufRead>(reader: R, path: &Path) -> Result<Corpus> {
    parse_records(reader, path, RecordKind::Document)
}

pub fn parse_queries<R: BufRead>(reader: R, path: &Path) -> Result<Corpus> {
    parse_records(reader, path, RecordKind::Query)
}

fn parse_records<R: BufRead>(reader: R, path: &Path, kind: RecordKind) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| SearchError::CorpusLoad {
            path: path.to_path_buf(),
            line: line_no,
            reason: e.to_string(),
        })?;
        let record = parse_record(&line, kind).map_err(|reason| SearchError::CorpusLoad {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        })?;
        if let Some((id, text)) = record {
            if corpus.insert(id, text) {
                warn!(id, line = line_no, path = %path.display(), "duplicate record id, keeping the later one");
            }
        }
    }
    Ok(corpus)
}

pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    load_records(path.as_ref(), RecordKind::Document)
}

pub fn load_queries<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    load_records(path.as_ref(), RecordKind::Query)
}

fn load_records(path: &Path, kind: RecordKind) -> Result<Corpus> {
    let f = File::open(path).map_err(|e| SearchError::CorpusLoad {
        path: path.to_path_buf(),
        line: 0,
        reason: e.to_string(),
    })?;
    parse_records(BufReader::new(f), path, kind)
}
