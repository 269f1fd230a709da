//! Score record persistence
//!
//! Features:
//! - Plain text format, one `name,kills` record per line
//! - Lenient parsing (malformed lines are skipped, negative kills floored)
//! - Full rewrite on save, no partial-write recovery
//! - File-backed and in-memory stores behind one trait

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Splits the name from the kill count on each line
pub const RECORD_SEPARATOR: char = ',';

/// A raw persisted record, before the ledger merges duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub name: String,
    pub kills: u32,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, kills: u32) -> Self {
        Self {
            name: name.into(),
            kills,
        }
    }
}

/// Errors from a score store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Backing store for the leaderboard
pub trait ScoreStore: fmt::Debug {
    /// Read every stored record (possibly with duplicate names)
    fn load(&mut self) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Replace the stored records
    fn save(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError>;
}

/// Parse the text format. Lines without a comma or with an empty name are
/// skipped; the kill count is read like C `atoi` and floored to zero.
pub fn parse_records(text: &str) -> Vec<ScoreRecord> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim_end_matches(['\r', '\n']);
            let (name, kills) = line.split_once(RECORD_SEPARATOR)?;
            if name.is_empty() {
                return None;
            }
            Some(ScoreRecord::new(name, parse_kills(kills)))
        })
        .collect()
}

/// Render records in the text format
pub fn format_records(records: &[ScoreRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}{RECORD_SEPARATOR}{}\n", r.name, r.kills))
        .collect()
}

/// Leading-integer parse: optional whitespace and sign, then digits.
/// Anything unparsable reads as 0, negatives clamp to 0.
fn parse_kills(s: &str) -> u32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return 0;
    }
    digits[..end].parse::<u32>().unwrap_or(u32::MAX)
}

/// Text file store
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> Result<Vec<ScoreRecord>, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io(e),
        })?;
        Ok(parse_records(&text))
    }

    fn save(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        fs::write(&self.path, format_records(records))?;
        Ok(())
    }
}

/// In-memory store holding the same text a file would
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub contents: Option<String>,
    /// Number of completed saves
    pub saves: usize,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
            saves: 0,
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<Vec<ScoreRecord>, StoreError> {
        match &self.contents {
            Some(text) => Ok(parse_records(text)),
            None => Err(StoreError::NotFound(PathBuf::from("<memory>"))),
        }
    }

    fn save(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        self.contents = Some(format_records(records));
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_lines() {
        let text = "ACE,12\n\nnocomma\n,5\nBOB,-3\r\nZED,abc\nAMY, 9xyz\n";
        let records = parse_records(text);
        assert_eq!(
            records,
            vec![
                ScoreRecord::new("ACE", 12),
                ScoreRecord::new("BOB", 0),
                ScoreRecord::new("ZED", 0),
                ScoreRecord::new("AMY", 9),
            ]
        );
    }

    #[test]
    fn test_format_records() {
        let records = [ScoreRecord::new("AMY", 9), ScoreRecord::new("BOB", 5)];
        assert_eq!(format_records(&records), "AMY,9\nBOB,5\n");
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let mut store = FileScoreStore::new(&path);
        assert_eq!(store.path(), path.as_path());

        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));

        let records = vec![ScoreRecord::new("AMY", 9), ScoreRecord::new("BOB", 5)];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryScoreStore::new();
        assert!(store.load().is_err());
        store.save(&[ScoreRecord::new("ACE", 1)]).unwrap();
        store.save(&[ScoreRecord::new("ACE", 2)]).unwrap();
        assert_eq!(store.saves, 2);
        assert_eq!(store.load().unwrap(), vec![ScoreRecord::new("ACE", 2)]);
    }
}
