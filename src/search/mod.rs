//! Keyword-in-context matching and bilingual corpus filtering.

pub(crate) mod bilingual;
pub(crate) mod engine;
pub(crate) mod format;

pub use bilingual::{CorpusRow, KeywordMap, filter};
pub use engine::{KwicError, MatchRecord, search};
