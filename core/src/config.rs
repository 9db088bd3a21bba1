//! Runtime configuration, loadable from a JSON file.

use crate::error::{Result, SearchError};
use crate::tokenizer::StemmingTokenizer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub tokenizer: TokenizerConfig,
    pub ranking: RankingConfig,
}

impl SearchConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: SearchConfig = serde_json::from_str(&raw)
            .map_err(|e| SearchError::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.ranking.validate()
    }
}

/// Build-time tokenizer settings. Persisted with the index so queries are
/// tokenized the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Remove English stopwords before stemming
    pub stopwords: bool,
}

impl TokenizerConfig {
    pub fn tokenizer(&self) -> StemmingTokenizer {
        StemmingTokenizer::new().with_stopwords(self.stopwords)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Maximum number of results per query
    pub top_k: usize,
    /// Characters of document text shown per result
    pub excerpt_chars: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            excerpt_chars: 280,
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(SearchError::Config("ranking.top_k must be at least 1".into()));
        }
        if self.excerpt_chars == 0 {
            return Err(SearchError::Config("ranking.excerpt_chars must be at least 1".into()));
        }
        Ok(())
    }
}
