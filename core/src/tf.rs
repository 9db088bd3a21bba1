//! Relative term frequencies, shared by documents and queries.

use crate::corpus::Corpus;
use crate::index::{DocId, Term};
use crate::tokenizer::Tokenizer;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// term -> occurrences / total tokens
pub type TermFrequencies = BTreeMap<Term, f64>;

/// Relative frequency of every stem in `text`. Text without tokens gives an
/// empty map.
pub fn term_frequencies<T: Tokenizer + ?Sized>(tokenizer: &T, text: &str) -> TermFrequencies {
    let tokens = tokenizer.tokenize(&text.to_lowercase());
    let total = tokens.len();
    let mut counts: BTreeMap<Term, u32> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(term, count)| (term, f64::from(count) / total as f64))
        .collect()
}

/// Term frequencies for every document, computed in parallel.
pub fn corpus_term_frequencies<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    corpus: &Corpus,
) -> HashMap<DocId, TermFrequencies> {
    corpus
        .documents()
        .par_iter()
        .map(|doc| (doc.id.clone(), term_frequencies(tokenizer, &doc.text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WhitespaceTokenizer;

    #[test]
    fn divides_by_total_tokens() {
        let tf = term_frequencies(&WhitespaceTokenizer, "a b a");
        assert!((tf["a"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((tf["b"] - 1.0 / 3.0).abs() < 1e-12);
        let sum: f64 = tf.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn case_folds_before_tokenizing() {
        let tf = term_frequencies(&WhitespaceTokenizer, "Wing WING wing");
        assert_eq!(tf.len(), 1);
        assert!((tf["wing"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_text_gives_empty_map() {
        assert!(term_frequencies(&WhitespaceTokenizer, "").is_empty());
        assert!(term_frequencies(&WhitespaceTokenizer, "  \t ").is_empty());
    }

    #[test]
    fn computes_every_document() {
        let corpus: Corpus = [("d1", "a b a"), ("d2", "b c")].into_iter().collect();
        let tfs = corpus_term_frequencies(&WhitespaceTokenizer, &corpus);
        assert_eq!(tfs.len(), 2);
        assert!((tfs["d2"]["c"] - 0.5).abs() < 1e-12);
    }
}
