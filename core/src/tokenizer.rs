use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Turns raw text into a sequence of normalized stems.
///
/// The index and every query must be produced by tokenizers with identical
/// settings, otherwise query stems will not line up with indexed terms.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// NFKC-normalizing, lower-casing English stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StemmingTokenizer {
    stopwords: bool,
}

impl StemmingTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop common English function words before stemming.
    pub fn with_stopwords(mut self, enabled: bool) -> Self {
        self.stopwords = enabled;
        self
    }

    pub fn removes_stopwords(&self) -> bool {
        self.stopwords
    }
}

impl Tokenizer for StemmingTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        WORD.find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|token| !(self.stopwords && STOPWORDS.contains(token)))
            .map(|token| STEMMER.stem(token).into_owned())
            .collect()
    }
}

/// Splits on whitespace only. No stemming, no punctuation handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = StemmingTokenizer::new().tokenize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn keeps_stopwords_unless_asked() {
        let kept = StemmingTokenizer::new().tokenize("the wing");
        assert_eq!(kept, vec!["the", "wing"]);
        let dropped = StemmingTokenizer::new().with_stopwords(true).tokenize("the wing");
        assert_eq!(dropped, vec!["wing"]);
    }

    #[test]
    fn whitespace_lowercases() {
        assert_eq!(WhitespaceTokenizer.tokenize("  A b\tA "), vec!["a", "b", "a"]);
    }
}
