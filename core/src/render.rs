//! Plain-text result files: a header per query, then one excerpt per hit.

use crate::index::DocId;
use crate::rank::ScoredDoc;
use std::collections::HashMap;
use std::io::{self, Write};

/// First `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

pub fn write_results<W: Write>(
    out: &mut W,
    query_id: &str,
    hits: &[ScoredDoc],
    docs: &HashMap<DocId, String>,
    excerpt_chars: usize,
) -> io::Result<()> {
    writeln!(out, "Query {query_id}")?;
    for hit in hits {
        // hits come from the same snapshot as docs; a miss means a stale docs file
        let text = docs.get(&hit.doc_id).map(String::as_str).unwrap_or("");
        writeln!(out, "{}\n", excerpt(text, excerpt_chars))?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 7), "héllo w");
        assert_eq!(excerpt("short", 280), "short");
        assert_eq!(excerpt("", 3), "");
    }

    #[test]
    fn writes_header_and_excerpts() {
        let docs = HashMap::from([
            ("1".to_string(), "first document".to_string()),
            ("2".to_string(), "second".to_string()),
        ]);
        let hits = vec![
            ScoredDoc { doc_id: "2".into(), score: 0.9 },
            ScoredDoc { doc_id: "1".into(), score: 0.4 },
        ];
        let mut buf = Vec::new();
        write_results(&mut buf, "7", &hits, &docs, 5).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Query 7\nsecon\n\nfirst\n\n\n");
    }
}
