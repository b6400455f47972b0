use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::engine::{KwicError, MatchRecord, search, search_all};

/// Source-language term → target-language equivalents, in lookup order.
pub type KeywordMap = HashMap<String, Vec<String>>;

/// A parallel-corpus row with the matches found on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusRow {
    pub jp: String,
    pub en: String,
    pub jp_kwic: Vec<MatchRecord>,
    pub en_kwic: Vec<MatchRecord>,
}

impl CorpusRow {
    fn unmatched(jp: &str, en: &str) -> Self {
        Self {
            jp: jp.to_string(),
            en: en.to_string(),
            jp_kwic: Vec::new(),
            en_kwic: Vec::new(),
        }
    }
}

/// Selects the rows where `keyword` occurs in the source text or any of its
/// mapped equivalents occurs in the target text.
///
/// An empty `keyword` lists every row with no matches attached. A keyword
/// missing from `keyword_map` only rules out target-side matches.
pub fn filter(
    rows: &[(String, String)],
    keyword: &str,
    keyword_map: &KeywordMap,
    context_size: usize,
) -> Result<Vec<CorpusRow>, KwicError> {
    if keyword.is_empty() {
        return Ok(rows
            .iter()
            .map(|(jp, en)| CorpusRow::unmatched(jp, en))
            .collect());
    }

    // Empty equivalents can never identify a row.
    let equivalents: Vec<&str> = keyword_map
        .get(keyword)
        .map(|terms| {
            terms
                .iter()
                .map(String::as_str)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if equivalents.is_empty() {
        debug!(keyword, "no target-language equivalents");
    }

    let mut corpus = Vec::new();
    for (jp, en) in rows {
        let jp_kwic = search_all(jp, keyword, context_size, false)?;

        let mut en_kwic = Vec::new();
        for term in &equivalents {
            en_kwic.extend(search(en, term, context_size, false)?);
        }

        if jp_kwic.is_empty() && en_kwic.is_empty() {
            continue;
        }

        corpus.push(CorpusRow {
            jp: jp.clone(),
            en: en.clone(),
            jp_kwic,
            en_kwic,
        });
    }

    Ok(corpus)
}
