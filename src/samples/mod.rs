//! Sample documents and parallel corpora read from a local directory.

mod csv;
mod decode;

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::Glob;
use serde::Serialize;
use tracing::{debug, warn};

use crate::search::KeywordMap;

pub const DEFAULT_SAMPLES_DIR: &str = "samples";
pub const DEFAULT_CORPUS_FILE: &str = "sample_corpus.csv";
const KEYWORD_MAP_FILE: &str = "wordmap.json";
const SAMPLE_PATTERN: &str = "*.{txt,csv}";

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filename: '{0}'. Use a plain file name inside the samples directory.")]
    InvalidFilename(String),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid keyword map: {0}")]
    InvalidKeywordMap(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub filename: String,
    pub label: String,
    pub content: String,
}

/// Read-only view over the samples directory.
///
/// Directory resolution: `KWIC_SAMPLES_DIR` env → `./samples`.
#[derive(Debug, Clone)]
pub struct SampleStore {
    dir: PathBuf,
}

impl SampleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env() -> Self {
        let dir = env::var("KWIC_SAMPLES_DIR")
            .ok()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_SAMPLES_DIR.to_string());
        debug!(dir = %dir, "samples directory configured");
        Self::new(dir)
    }

    /// List `.txt` and `.csv` files with their decoded content, sorted by name.
    pub fn list(&self) -> Result<Vec<Sample>, SampleError> {
        let matcher = Glob::new(SAMPLE_PATTERN)
            .map_err(|e| SampleError::InvalidPattern(e.to_string()))?
            .compile_matcher();

        let mut samples = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if !matcher.is_match(&filename) {
                continue;
            }

            let content = read_text(&entry.path())?;
            samples.push(Sample {
                label: sample_label(&filename),
                filename,
                content,
            });
        }

        samples.sort_by(|a, b| a.filename.cmp(&b.filename));
        debug!(count = samples.len(), "samples listed");
        Ok(samples)
    }

    /// Read a two-column corpus file as `(source, target)` pairs.
    ///
    /// Records with fewer than two columns are skipped; extra columns are ignored.
    pub fn read_corpus(&self, filename: &str) -> Result<Vec<(String, String)>, SampleError> {
        let path = self.resolve(filename)?;
        let text = read_text(&path)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in csv::parse_records(&text) {
            let mut columns = record.into_iter();
            match (columns.next(), columns.next()) {
                (Some(jp), Some(en)) => rows.push((jp, en)),
                _ => skipped += 1,
            }
        }

        debug!(filename, rows = rows.len(), skipped, "corpus read");
        Ok(rows)
    }

    /// Load `wordmap.json`. A missing file is an empty map.
    pub fn load_keyword_map(&self) -> Result<KeywordMap, SampleError> {
        let path = self.dir.join(KEYWORD_MAP_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no keyword map, target-side matching disabled");
                return Ok(KeywordMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let map: KeywordMap = serde_json::from_str(&decode::decode_text(&bytes))?;
        debug!(entries = map.len(), "keyword map loaded");
        Ok(map)
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, SampleError> {
        validate_filename(filename)?;
        let path = self.dir.join(filename);
        if !path.is_file() {
            return Err(SampleError::NotFound(filename.to_string()));
        }
        Ok(path)
    }
}

/// Validate a sample file name.
///
/// Rejects empty names, path separators, `.`/`..` and control characters.
pub fn validate_filename(filename: &str) -> Result<(), SampleError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
        || filename.chars().any(char::is_control)
    {
        return Err(SampleError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

fn sample_label(filename: &str) -> String {
    filename.replace(".txt", "")
}

fn read_text(path: &Path) -> Result<String, SampleError> {
    let bytes = fs::read(path)?;
    Ok(decode::decode_text(&bytes))
}
