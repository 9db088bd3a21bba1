//! Candidate accumulation, scoring and top-k ranking.
//!
//! For a candidate document `d` and query weights `a`:
//!
//! ```text
//! num(d)   = sum_t a[t] * idf[t] * tf_idf(t, d)
//! B2(d)    = sqrt(sum_t tf_idf(t, d)^2)
//! score(d) = num(d) / (|a| * B2(d))
//! ```
//!
//! with `t` ranging over the query terms present in `d`. `B2` covers the
//! query's terms only, not the whole document vector, and `idf` appears
//! twice per term because `a[t]` already carries it. Both are intentional
//! and must stay as they are until the intended weighting is confirmed.

use crate::index::{DocId, Index};
use crate::query::{QueryVector, QueryWeights};
use crate::tokenizer::Tokenizer;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 10;

/// Accumulated sums for one candidate document.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub doc_id: DocId,
    /// B: sum of tf_idf over shared terms
    pub weight_sum: f64,
    /// B2: norm of tf_idf over shared terms
    pub norm: f64,
    pub numerator: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    /// Zero or non-finite denominator; the candidate is not ranked.
    Degenerate,
}

impl Score {
    pub fn value(self) -> Option<f64> {
        match self {
            Score::Value(v) => Some(v),
            Score::Degenerate => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Top hits plus the number of documents that scored at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub hits: Vec<ScoredDoc>,
    pub total_hits: usize,
}

/// Resolves queries against a shared, read-only index.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: Arc<Index>,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(index: Arc<Index>) -> Self {
        Self { index, top_k: DEFAULT_TOP_K }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Every document sharing at least one term with the query, in
    /// first-encountered order (query terms ascending, then doc id).
    pub fn candidates(&self, weights: &QueryWeights) -> Vec<Candidate> {
        let mut order: Vec<Candidate> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut sq_sums: Vec<f64> = Vec::new();

        for (term, &a) in &weights.weights {
            let Some(entry) = self.index.get(term) else { continue };
            for (doc_id, posting) in &entry.postings {
                let slot = *slots.entry(doc_id.as_str()).or_insert_with(|| {
                    order.push(Candidate {
                        doc_id: doc_id.clone(),
                        weight_sum: 0.0,
                        norm: 0.0,
                        numerator: 0.0,
                    });
                    sq_sums.push(0.0);
                    order.len() - 1
                });
                let c = &mut order[slot];
                c.weight_sum += posting.tf_idf;
                c.numerator += a * entry.idf * posting.tf_idf;
                sq_sums[slot] += posting.tf_idf * posting.tf_idf;
            }
        }
        for (c, sq) in order.iter_mut().zip(sq_sums) {
            c.norm = sq.sqrt();
        }
        order
    }

    pub fn score(weights: &QueryWeights, candidate: &Candidate) -> Score {
        let denominator = weights.norm * candidate.norm;
        if denominator == 0.0 || !denominator.is_finite() {
            return Score::Degenerate;
        }
        let score = candidate.numerator / denominator;
        if score.is_finite() {
            Score::Value(score)
        } else {
            Score::Degenerate
        }
    }

    /// Score and sort all candidates, keeping the best `k`.
    pub fn rank_top(&self, query: &QueryVector, k: usize) -> Ranking {
        let weights = QueryWeights::compute(query, &self.index);
        if weights.is_empty() {
            return Ranking::default();
        }
        let candidates = self.candidates(&weights);
        let mut scored: Vec<ScoredDoc> = Vec::with_capacity(candidates.len());
        let mut degenerate = 0usize;
        for c in candidates {
            match Self::score(&weights, &c) {
                Score::Value(score) => scored.push(ScoredDoc { doc_id: c.doc_id, score }),
                Score::Degenerate => degenerate += 1,
            }
        }
        // stable: equal scores keep candidate order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        let total_hits = scored.len();
        scored.truncate(k);
        debug!(
            matched_terms = weights.weights.len(),
            total_hits,
            degenerate,
            returned = scored.len(),
            "query ranked"
        );
        Ranking { hits: scored, total_hits }
    }

    pub fn rank(&self, query: &QueryVector) -> Vec<ScoredDoc> {
        self.rank_top(query, self.top_k).hits
    }

    pub fn search<T: Tokenizer + ?Sized>(&self, tokenizer: &T, text: &str) -> Vec<ScoredDoc> {
        self.rank(&QueryVector::from_text(tokenizer, text))
    }

    /// Resolve independent queries concurrently. Output order follows input.
    pub fn search_batch<T, S>(&self, tokenizer: &T, queries: &[(S, S)]) -> Vec<(S, Vec<ScoredDoc>)>
    where
        T: Tokenizer + ?Sized,
        S: AsRef<str> + Clone + Send + Sync,
    {
        queries
            .par_iter()
            .map(|(id, text)| (id.clone(), self.search(tokenizer, text.as_ref())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IndexBuilder;
    use crate::corpus::Corpus;
    use crate::index::{IndexEntry, Posting};
    use crate::tf::corpus_term_frequencies;
    use crate::tokenizer::WhitespaceTokenizer;
    use std::collections::BTreeMap;

    fn engine(docs: &[(&str, &str)]) -> QueryEngine {
        let corpus: Corpus = docs.iter().copied().collect();
        let tfs = corpus_term_frequencies(&WhitespaceTokenizer, &corpus);
        QueryEngine::new(Arc::new(IndexBuilder::new().build(&tfs).unwrap()))
    }

    #[test]
    fn two_document_example_scores() {
        let engine = engine(&[("d1", "a b a"), ("d2", "b c")]);
        let hits = engine.search(&WhitespaceTokenizer, "a c");
        let mut ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["d1", "d2"]);
        // each candidate shares one term: score = a[t] * idf[t] / |a| = idf / sqrt(2)
        for hit in &hits {
            assert!((hit.score - 0.2129).abs() < 1e-4, "score {}", hit.score);
        }
    }

    #[test]
    fn idf_is_applied_twice_in_numerator() {
        let engine = engine(&[("d1", "x"), ("d2", "y"), ("d3", "y"), ("d4", "w")]);
        let hits = engine.search(&WhitespaceTokenizer, "x y");
        let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
        assert!((hits[0].score - 0.5385).abs() < 1e-4, "score {}", hits[0].score);
        assert!((hits[1].score - 0.1346).abs() < 1e-4, "score {}", hits[1].score);
        assert_eq!(hits[1].score, hits[2].score);
    }

    #[test]
    fn candidate_norm_is_restricted_to_query_terms() {
        let engine = engine(&[("d1", "x y z z"), ("d2", "q"), ("d3", "q r")]);
        let weights = QueryWeights::compute(&QueryVector::from_text(&WhitespaceTokenizer, "x"), engine.index());
        let candidates = engine.candidates(&weights);
        assert_eq!(candidates.len(), 1);
        let x = engine.index().posting("x", "d1").unwrap().tf_idf;
        assert!((candidates[0].norm - x).abs() < 1e-12);
        assert!((candidates[0].weight_sum - x).abs() < 1e-12);
    }

    #[test]
    fn results_are_capped_and_sorted() {
        let mut docs: Vec<(String, String)> = (0..14)
            .map(|i| (format!("d{i:02}"), format!("k {}", "f ".repeat(i + 1))))
            .collect();
        docs.push(("other".into(), "unrelated".into()));
        let corpus: Corpus = docs.into_iter().collect();
        let tfs = corpus_term_frequencies(&WhitespaceTokenizer, &corpus);
        let engine = QueryEngine::new(Arc::new(IndexBuilder::new().build(&tfs).unwrap()));

        let ranking = engine.rank_top(&QueryVector::from_text(&WhitespaceTokenizer, "k f"), DEFAULT_TOP_K);
        assert_eq!(ranking.total_hits, 14);
        assert_eq!(ranking.hits.len(), 10);
        assert!(ranking.hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn fewer_candidates_than_k() {
        let engine = engine(&[("d1", "a b"), ("d2", "b c"), ("d3", "c d")]);
        let hits = engine.search(&WhitespaceTokenizer, "a");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, "d1");
    }

    #[test]
    fn unmatched_query_is_empty() {
        let engine = engine(&[("d1", "a b a"), ("d2", "b c")]);
        assert!(engine.search(&WhitespaceTokenizer, "nothing here").is_empty());
        assert!(engine.search(&WhitespaceTokenizer, "").is_empty());
        // b occurs everywhere, so it was never indexed
        assert!(engine.search(&WhitespaceTokenizer, "b").is_empty());
    }

    #[test]
    fn zero_norm_candidate_is_excluded() {
        let mut postings = BTreeMap::new();
        postings.insert("live".to_string(), Posting { tf: 0.5, tf_idf: 0.15 });
        postings.insert("dead".to_string(), Posting { tf: 0.5, tf_idf: 0.0 });
        let mut entries = BTreeMap::new();
        entries.insert("t".to_string(), IndexEntry { idf: 0.3, postings });
        let engine = QueryEngine::new(Arc::new(Index { num_docs: 3, entries }));

        let ranking = engine.rank_top(&QueryVector::from_text(&WhitespaceTokenizer, "t"), 10);
        assert_eq!(ranking.total_hits, 1);
        assert_eq!(ranking.hits[0].doc_id, "live");
    }

    #[test]
    fn degenerate_score_has_no_value() {
        let weights = QueryWeights { weights: BTreeMap::new(), norm: 0.0 };
        let c = Candidate { doc_id: "d".into(), weight_sum: 1.0, norm: 1.0, numerator: 1.0 };
        assert_eq!(QueryEngine::score(&weights, &c), Score::Degenerate);
        assert_eq!(QueryEngine::score(&weights, &c).value(), None);
    }

    #[test]
    fn batch_matches_sequential() {
        let engine = engine(&[("d1", "x"), ("d2", "y"), ("d3", "y"), ("d4", "w")]);
        let queries = vec![("q1", "x y"), ("q2", "w"), ("q3", "none")];
        let batch = engine.search_batch(&WhitespaceTokenizer, &queries);
        assert_eq!(batch.len(), 3);
        for ((id, hits), (qid, text)) in batch.iter().zip(&queries) {
            assert_eq!(id, qid);
            assert_eq!(hits, &engine.search(&WhitespaceTokenizer, text));
        }
    }
}
