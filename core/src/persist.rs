//! On-disk snapshot of a built index.
//!
//! The index, the document texts and the build metadata live together in
//! `snapshot.bin` under the index root: one bincode payload followed by
//! `QIX2` and a big-endian CRC32 of the payload. The file is written to a
//! `.tmp` sibling and renamed into place, so a reader sees either the
//! previous snapshot or the new one, never a mix of both.

use crate::config::TokenizerConfig;
use crate::error::{Result, SearchError};
use crate::index::{DocId, Index};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use tracing::info;

pub const FORMAT_VERSION: u32 = 2;
const CRC_MAGIC: &[u8; 4] = b"QIX2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
    pub tokenizer: TokenizerConfig,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn snapshot(&self) -> PathBuf { self.root.join("snapshot.bin") }

    fn unavailable(&self, reason: impl Into<String>) -> SearchError {
        SearchError::IndexUnavailable { path: self.root.clone(), reason: reason.into() }
    }
}

/// Everything query resolution needs, stored and loaded in one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub meta: MetaFile,
    pub index: Index,
    pub docs: HashMap<DocId, String>,
}

impl Snapshot {
    pub fn new(index: Index, docs: HashMap<DocId, String>, tokenizer: TokenizerConfig) -> Self {
        let meta = MetaFile {
            num_docs: index.num_docs,
            num_terms: index.len(),
            created_at: now_rfc3339(),
            version: FORMAT_VERSION,
            tokenizer,
        };
        Self { meta, index, docs }
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn save_checked<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let payload = bincode::serialize(value)?;
    let crc = crc32fast::hash(&payload);
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&payload);
    out.extend_from_slice(CRC_MAGIC);
    out.extend_from_slice(&crc.to_be_bytes());
    write_atomic(path, &out)
}

fn load_checked<T: DeserializeOwned>(paths: &IndexPaths, path: &Path) -> Result<T> {
    let bytes = fs::read(path)
        .map_err(|e| paths.unavailable(format!("cannot read {}: {e}", path.display())))?;
    if bytes.len() < 8 || &bytes[bytes.len() - 8..bytes.len() - 4] != CRC_MAGIC {
        return Err(paths.unavailable(format!("{} has no checksum footer", path.display())));
    }
    let (payload, footer) = bytes.split_at(bytes.len() - 8);
    let mut stored = [0u8; 4];
    stored.copy_from_slice(&footer[4..]);
    if crc32fast::hash(payload) != u32::from_be_bytes(stored) {
        return Err(paths.unavailable(format!("{} failed checksum verification", path.display())));
    }
    bincode::deserialize(payload)
        .map_err(|e| paths.unavailable(format!("cannot decode {}: {e}", path.display())))
}

/// Write the whole snapshot as a single file.
pub fn save_snapshot(paths: &IndexPaths, snapshot: &Snapshot) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_checked(&paths.snapshot(), snapshot)?;
    info!(
        root = %paths.root.display(),
        num_docs = snapshot.meta.num_docs,
        num_terms = snapshot.meta.num_terms,
        "snapshot saved"
    );
    Ok(())
}

pub fn load_snapshot(paths: &IndexPaths) -> Result<Snapshot> {
    let snapshot: Snapshot = load_checked(paths, &paths.snapshot())?;
    let meta = &snapshot.meta;
    if meta.version != FORMAT_VERSION {
        return Err(paths.unavailable(format!(
            "format version {} not supported (expected {FORMAT_VERSION})",
            meta.version
        )));
    }
    if snapshot.index.num_docs != meta.num_docs || snapshot.index.len() != meta.num_terms {
        return Err(paths.unavailable("index does not match its metadata"));
    }
    info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "snapshot loaded");
    Ok(snapshot)
}
