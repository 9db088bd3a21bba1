//! Vector-space document retrieval over a tf-idf inverted index.
//!
//! Corpus text flows through [`tf`] into [`builder`], which produces an
//! immutable [`Index`] persisted by [`persist`]. Queries go through the same
//! term-frequency calculator, are weighted by [`query`] and ranked by
//! [`rank`].

pub mod builder;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod rank;
pub mod render;
pub mod tf;
pub mod tokenizer;

pub use builder::IndexBuilder;
pub use config::SearchConfig;
pub use corpus::{Corpus, Document};
pub use error::{Result, SearchError};
pub use index::{DocId, Index, IndexEntry, Posting, Term};
pub use query::{QueryVector, QueryWeights};
pub use rank::{QueryEngine, Score, ScoredDoc};
pub use tf::TermFrequencies;
pub use tokenizer::{StemmingTokenizer, Tokenizer, WhitespaceTokenizer};
