//! Query vectors and their idf weighting against an index.

use crate::index::{Index, Term};
use crate::tf::{term_frequencies, TermFrequencies};
use crate::tokenizer::Tokenizer;
use std::collections::BTreeMap;

/// Relative term frequencies of a query, computed exactly like a document's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryVector {
    pub terms: TermFrequencies,
}

impl QueryVector {
    pub fn from_text<T: Tokenizer + ?Sized>(tokenizer: &T, text: &str) -> Self {
        Self { terms: term_frequencies(tokenizer, text) }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<TermFrequencies> for QueryVector {
    fn from(terms: TermFrequencies) -> Self {
        Self { terms }
    }
}

/// `a[t] = idf[t] * query_tf[t]` over query terms found in the index, and
/// the Euclidean norm of `a`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryWeights {
    pub weights: BTreeMap<Term, f64>,
    pub norm: f64,
}

impl QueryWeights {
    pub fn compute(query: &QueryVector, index: &Index) -> Self {
        let weights: BTreeMap<Term, f64> = query
            .terms
            .iter()
            .filter_map(|(term, &tf)| index.idf(term).map(|idf| (term.clone(), idf * tf)))
            .collect();
        let norm = weights.values().map(|a| a * a).sum::<f64>().sqrt();
        Self { weights, norm }
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    /// True when no query term is in the index.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::tokenizer::WhitespaceTokenizer;

    fn index_with(terms: &[(&str, f64)]) -> Index {
        let entries = terms
            .iter()
            .map(|&(t, idf)| (t.to_string(), IndexEntry { idf, postings: BTreeMap::new() }))
            .collect();
        Index { num_docs: 4, entries }
    }

    #[test]
    fn unknown_terms_are_excluded() {
        let index = index_with(&[("a", 0.5)]);
        let q = QueryVector::from_text(&WhitespaceTokenizer, "a zzz");
        let w = QueryWeights::compute(&q, &index);
        assert_eq!(w.weights.len(), 1);
        assert!((w.get("a").unwrap() - 0.25).abs() < 1e-12);
        assert!((w.norm - 0.25).abs() < 1e-12);
        assert_eq!(w.get("zzz"), None);
    }

    #[test]
    fn norm_over_all_matched_terms() {
        let index = index_with(&[("a", 0.3), ("b", 0.4)]);
        let q = QueryVector::from_text(&WhitespaceTokenizer, "a b");
        let w = QueryWeights::compute(&q, &index);
        let expected = ((0.15f64).powi(2) + (0.2f64).powi(2)).sqrt();
        assert!((w.norm - expected).abs() < 1e-12);
    }

    #[test]
    fn no_matches_is_empty() {
        let index = index_with(&[("a", 0.3)]);
        let q = QueryVector::from_text(&WhitespaceTokenizer, "q r");
        let w = QueryWeights::compute(&q, &index);
        assert!(w.is_empty());
        assert_eq!(w.norm, 0.0);
    }
}
