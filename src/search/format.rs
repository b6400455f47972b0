use crate::samples::Sample;

use super::bilingual::CorpusRow;
use super::engine::MatchRecord;

/// Replaces line breaks so user input cannot break heading structure.
fn sanitize_heading(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

fn format_record(record: &MatchRecord) -> String {
    format!(
        "{}[{}]{}",
        record.left_context, record.keyword, record.right_context
    )
}

/// Render single-document results as a numbered concordance.
pub fn format_matches(keyword: &str, records: &[MatchRecord]) -> String {
    let mut out = format!("# KWIC: {}\n\n", sanitize_heading(keyword));
    out.push_str(&format!("matches: {}\n\n", records.len()));

    let width = records.len().to_string().len();
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}. {}\n{:>width$}  (line {})\n",
            i + 1,
            format_record(record),
            "",
            record.line_number,
        ));
    }

    out
}

/// Render parallel-corpus rows with the matches found on each side.
pub fn format_corpus(filename: &str, keyword: &str, rows: &[CorpusRow]) -> String {
    let mut out = format!("# Corpus: {}\n\n", sanitize_heading(filename));
    if keyword.is_empty() {
        out.push_str(&format!("rows: {}\n\n", rows.len()));
    } else {
        out.push_str(&format!(
            "keyword: {}\nrows: {}\n\n",
            sanitize_heading(keyword),
            rows.len()
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("{}. {}\n   {}\n", i + 1, row.jp, row.en));
        for record in &row.jp_kwic {
            out.push_str(&format!("   jp: {}\n", format_record(record)));
        }
        for record in &row.en_kwic {
            out.push_str(&format!("   en: {}\n", format_record(record)));
        }
    }

    out
}

pub fn format_samples(samples: &[Sample]) -> String {
    let mut out = format!("samples: {}\n\n", samples.len());
    for sample in samples {
        out.push_str(&format!(
            "{} ({}, {} chars)\n",
            sample.filename,
            sample.label,
            sample.content.chars().count()
        ));
    }
    out
}
