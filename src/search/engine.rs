use serde::Serialize;

/// Marker placed on a context side that was cut short of the line edge.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum KwicError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// One occurrence of the search term with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub left_context: String,
    pub keyword: String,
    pub right_context: String,
    pub line_number: usize,
    pub full_line: String,
}

/// Searches `text` line by line for literal, non-overlapping occurrences of `term`.
///
/// Offsets and `context_size` count Unicode scalar values, so multi-byte
/// characters are never split. Unless `case_sensitive` is set, each character
/// is case-folded before comparison; the reported `keyword` keeps the casing
/// found in the line.
///
/// The term is validated up front, so an error never follows partial output.
pub fn search<'a>(
    text: &'a str,
    term: &str,
    context_size: usize,
    case_sensitive: bool,
) -> Result<Matches<'a>, KwicError> {
    if term.is_empty() {
        return Err(KwicError::InvalidArgument(
            "search term must not be empty".into(),
        ));
    }

    Ok(Matches {
        lines: text.split('\n').enumerate(),
        needle: term.chars().map(|c| fold(c, case_sensitive)).collect(),
        context_size,
        case_sensitive,
        line: None,
    })
}

/// Eager form of [`search`].
pub fn search_all(
    text: &str,
    term: &str,
    context_size: usize,
    case_sensitive: bool,
) -> Result<Vec<MatchRecord>, KwicError> {
    search(text, term, context_size, case_sensitive).map(Iterator::collect)
}

/// Lazy sequence of [`MatchRecord`]s, in line order then left to right.
pub struct Matches<'a> {
    lines: std::iter::Enumerate<std::str::Split<'a, char>>,
    needle: Vec<char>,
    context_size: usize,
    case_sensitive: bool,
    line: Option<LineCursor>,
}

impl Iterator for Matches<'_> {
    type Item = MatchRecord;

    fn next(&mut self) -> Option<MatchRecord> {
        loop {
            if let Some(cursor) = self.line.as_mut()
                && let Some(start) = find_from(&cursor.folded, &self.needle, cursor.pos)
            {
                let end = start + self.needle.len();
                cursor.pos = end;
                return Some(cursor.record(start, end, self.context_size));
            }

            let (idx, line) = self.lines.next()?;
            self.line = Some(LineCursor::new(idx + 1, line, self.case_sensitive));
        }
    }
}

struct LineCursor {
    number: usize,
    chars: Vec<char>,
    folded: Vec<char>,
    full_line: String,
    pos: usize,
}

impl LineCursor {
    fn new(number: usize, line: &str, case_sensitive: bool) -> Self {
        let chars: Vec<char> = line.chars().collect();
        let folded = chars.iter().map(|&c| fold(c, case_sensitive)).collect();
        Self {
            number,
            chars,
            folded,
            full_line: line.trim().to_string(),
            pos: 0,
        }
    }

    fn record(&self, start: usize, end: usize, context_size: usize) -> MatchRecord {
        let len = self.chars.len();
        let left_start = start.saturating_sub(context_size);
        let right_end = end.saturating_add(context_size).min(len);

        let mut left: String = self.chars[left_start..start].iter().collect();
        if left_start > 0 {
            left.insert_str(0, ELLIPSIS);
        }

        let mut right: String = self.chars[end..right_end].iter().collect();
        if right_end < len {
            right.push_str(ELLIPSIS);
        }

        MatchRecord {
            left_context: left.trim().to_string(),
            keyword: self.chars[start..end].iter().collect(),
            right_context: right.trim().to_string(),
            line_number: self.number,
            full_line: self.full_line.clone(),
        }
    }
}

/// Simple one-to-one case folding. Characters whose lowercase form expands to
/// several code points are compared as-is so offsets stay aligned with the line.
fn fold(c: char, case_sensitive: bool) -> char {
    if case_sensitive {
        return c;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    let last = haystack.len().checked_sub(needle.len())?;
    (from..=last).find(|&i| haystack[i..].starts_with(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_markers(record: &MatchRecord) -> (String, String) {
        let left = record.left_context.strip_prefix(ELLIPSIS).unwrap_or(&record.left_context);
        let right = record
            .right_context
            .strip_suffix(ELLIPSIS)
            .unwrap_or(&record.right_context);
        (left.trim().to_string(), right.trim().to_string())
    }

    #[test]
    fn case_insensitive_by_default_keeps_original_casing() {
        let results = search_all("Foo foo FOO", "foo", 10, false).unwrap();
        let keywords: Vec<_> = results.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, ["Foo", "foo", "FOO"]);
    }

    #[test]
    fn case_sensitive_matches_exact_casing_only() {
        let results = search_all("Foo foo FOO", "foo", 10, true).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].keyword, "foo");
        assert_eq!(results[0].left_context, "Foo");
        assert_eq!(results[0].right_context, "FOO");
    }

    #[test]
    fn reports_one_based_line_number() {
        let results = search_all("a\nkeyword\nb", "keyword", 5, false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].line_number, 2);
        assert_eq!(results[0].full_line, "keyword");
        assert_eq!(results[0].left_context, "");
        assert_eq!(results[0].right_context, "");
    }

    #[test]
    fn empty_term_is_invalid_argument() {
        let err = search_all("anything", "", 5, false).unwrap_err();
        assert!(matches!(err, KwicError::InvalidArgument(_)));
    }

    #[test]
    fn empty_term_fails_even_on_empty_text() {
        assert!(search("", "", 0, false).is_err());
    }

    #[test]
    fn truncated_sides_carry_ellipsis() {
        let results = search_all("0123456789KEY0123456789", "key", 3, false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].left_context, "...789");
        assert_eq!(results[0].keyword, "KEY");
        assert_eq!(results[0].right_context, "012...");
    }

    #[test]
    fn context_reaching_line_edge_has_no_ellipsis() {
        let results = search_all("abcKEYdef", "key", 3, false).unwrap();
        assert_eq!(results[0].left_context, "abc");
        assert_eq!(results[0].right_context, "def");
    }

    #[test]
    fn zero_context_yields_bare_markers_inside_line() {
        let results = search_all("xx key yy", "key", 0, false).unwrap();
        assert_eq!(results[0].left_context, "...");
        assert_eq!(results[0].right_context, "...");

        let edge = search_all("key", "key", 0, false).unwrap();
        assert_eq!(edge[0].left_context, "");
        assert_eq!(edge[0].right_context, "");
    }

    #[test]
    fn ellipsis_is_added_before_trimming() {
        let results = search_all("long prefix   key", "key", 2, false).unwrap();
        assert_eq!(results[0].left_context, "...");

        let results = search_all("key   long suffix", "key", 2, false).unwrap();
        assert_eq!(results[0].right_context, "...");
    }

    #[test]
    fn occurrences_do_not_overlap() {
        let results = search_all("aaaa", "aa", 1, false).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].left_context, "");
        assert_eq!(results[0].right_context, "a...");
        assert_eq!(results[1].left_context, "...a");
        assert_eq!(results[1].right_context, "");

        let results = search_all("aaa", "aa", 5, false).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn results_follow_line_then_offset_order() {
        let text = "cat dog cat\nno match\ndog cat";
        let results = search_all(text, "cat", 2, false).unwrap();
        let positions: Vec<_> = results
            .iter()
            .map(|r| (r.line_number, r.left_context.as_str()))
            .collect();
        assert_eq!(positions, [(1, ""), (1, "...g"), (3, "...g")]);
    }

    #[test]
    fn term_longer_than_line_never_matches() {
        let results = search_all("ab\nabcdef", "abcd", 5, false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].line_number, 2);
    }

    #[test]
    fn matches_never_span_lines() {
        let results = search_all("foo\nbar", "o\nb", 5, false).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let results = search_all("first line\r\nsecond key here\r\n", "key", 20, false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].line_number, 2);
        assert_eq!(results[0].right_context, "here");
        assert_eq!(results[0].full_line, "second key here");
    }

    #[test]
    fn multibyte_characters_are_never_split() {
        let text = "吾輩は猫である。名前はまだ無い。";
        let results = search_all(text, "猫", 2, false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].left_context, "...輩は");
        assert_eq!(results[0].keyword, "猫");
        assert_eq!(results[0].right_context, "であ...");
    }

    #[test]
    fn context_size_counts_characters_not_bytes() {
        let results = search_all("ééé-key-ééé", "key", 4, false).unwrap();
        assert_eq!(results[0].left_context, "ééé-");
        assert_eq!(results[0].right_context, "-ééé");
    }

    #[test]
    fn folds_non_ascii_case() {
        let results = search_all("ÉCOLE école", "école", 3, false).unwrap();
        let keywords: Vec<_> = results.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, ["ÉCOLE", "école"]);
    }

    #[test]
    fn context_pieces_reconstruct_part_of_line() {
        let text = "日本語の文章で猫が鳴いた。別の行。\n英語でもcatsはcatの複数形";
        for term in ["猫", "cat", "の"] {
            for record in search_all(text, term, 4, false).unwrap() {
                let (left, right) = strip_markers(&record);
                let joined = format!("{left}{}{right}", record.keyword);
                assert!(
                    record.full_line.contains(&joined),
                    "{joined:?} not in {:?}",
                    record.full_line
                );
            }
        }
    }

    #[test]
    fn truncation_marker_matches_window_arithmetic() {
        let line = "one two three four five six seven";
        for size in 0..12 {
            for record in search_all(line, "four", size, false).unwrap() {
                let start = line.find("four").unwrap();
                let end = start + "four".len();
                assert_eq!(record.left_context.starts_with(ELLIPSIS), start > size);
                assert_eq!(
                    record.right_context.ends_with(ELLIPSIS),
                    end + size < line.len()
                );
            }
        }
    }

    #[test]
    fn search_is_lazy() {
        let text = "key\n".repeat(1000);
        let mut matches = search(&text, "key", 5, false).unwrap();
        let first = matches.next().unwrap();
        assert_eq!(first.line_number, 1);
        assert_eq!(matches.take(2).count(), 2);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(search_all("", "key", 5, false).unwrap().is_empty());
        assert!(search_all("\n\n", "key", 5, false).unwrap().is_empty());
    }

    #[test]
    fn keyword_keeps_surrounding_whitespace_in_term() {
        let results = search_all("say hello world", " hello ", 3, false).unwrap();
        assert_eq!(results[0].keyword, " hello ");
        assert_eq!(results[0].left_context, "say");
        assert_eq!(results[0].right_context, "wor...");
    }

    #[test]
    fn serializes_with_field_names() {
        let record = search_all("a key b", "key", 5, false).unwrap().remove(0);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["left_context"], "a");
        assert_eq!(value["keyword"], "key");
        assert_eq!(value["right_context"], "b");
        assert_eq!(value["line_number"], 1);
        assert_eq!(value["full_line"], "a key b");
    }
}
